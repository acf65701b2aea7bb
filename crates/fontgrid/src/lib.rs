//! # Bitmap font tables
//!
//! Cuts a font sheet (an image with the characters laid out left to right,
//! top to bottom in a grid of equally sized cells) into 1-bit glyphs and
//! serializes them as a lookup table for embedding into a program.
#![warn(missing_docs)]

use std::io;

use thiserror::Error;

pub mod glyph;
pub mod table;

pub use glyph::{Glyph, GridParams, Glyphset};
pub use table::{emit, validate_name, TableFormat};

/// Errors of the conversion pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input or creating the output failed
    #[error("IO failed")]
    Io(#[source] io::Error),
    /// The image could not be decoded
    #[error("Invalid TGA image: {0}")]
    Tga(#[from] tga::TgaError),
    /// Writing the table failed
    #[error("Failed to write table")]
    Write(#[source] io::Error),
    /// The character cell is empty or too wide for a row value
    #[error("Invalid character cell {width}x{height} (width must be 1..=32, height at least 1)")]
    InvalidCellSize {
        /// configured character width
        width: u16,
        /// configured character height
        height: u16,
    },
    /// The threshold is not a fraction
    #[error("Threshold {0} is not within [0, 1]")]
    InvalidThreshold(f32),
    /// The font name can not be used as an identifier
    #[error("Font name {0:?} is not a valid identifier")]
    InvalidFontName(String),
}

/// Decode a TGA font sheet and extract its glyphs
pub fn convert(buffer: &[u8], params: &GridParams) -> Result<Glyphset, Error> {
    params.validate()?;
    let image = tga::decode(buffer)?;
    log::info!("Font sheet is {}x{} pixels", image.width(), image.height());
    let glyphs = Glyphset::extract(&image, params);
    log::info!(
        "Extracted {} glyphs of {}x{}",
        glyphs.len(),
        glyphs.char_width(),
        glyphs.char_height()
    );
    Ok(glyphs)
}
