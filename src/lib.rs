//! # TGA font converter
//!
//! Turns a font sheet stored as an uncompressed TGA image into a C or Rust
//! lookup table with one bitmask per glyph row.

pub mod cli;
