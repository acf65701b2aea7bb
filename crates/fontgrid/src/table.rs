//! # Table output
//!
//! Writes a [`Glyphset`] as source code that declares the glyph count, the
//! cell size and a two-dimensional table of row values.

use std::{fmt, io, str::FromStr};

use crate::{Error, Glyphset};

/// The language of the generated table
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// C source with `stdint.h` types
    #[default]
    C,
    /// Rust constants and a static array
    Rust,
}

#[derive(Debug)]
/// Failed to parse a format name
pub struct FormatError {}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Use one of `c` or `rust`")
    }
}

impl std::error::Error for FormatError {}

impl FromStr for TableFormat {
    type Err = FormatError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "c" | "h" => Ok(Self::C),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(FormatError {}),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C => f.write_str("c"),
            Self::Rust => f.write_str("rust"),
        }
    }
}

/// Check that `name` can prefix the generated identifiers
pub fn validate_name(name: &str) -> Result<(), Error> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidFontName(name.to_owned()))
    }
}

/// Turn a file name into a font name that passes [`validate_name`]
pub fn derive_name(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '_',
        })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

struct Hex(u32);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

fn write_rows<W: io::Write>(out: &mut W, rows: &[u32]) -> io::Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", Hex(*row))?;
    }
    Ok(())
}

fn write_c<W: io::Write>(out: &mut W, glyphs: &Glyphset, name: &str) -> io::Result<()> {
    let row_type = match glyphs.char_width() {
        0..=16 => "uint16_t",
        _ => "uint32_t",
    };
    let height = glyphs.char_height();
    writeln!(out, "/* GENERATED FILE - DO NOT MODIFY IT! */")?;
    writeln!(out)?;
    writeln!(out, "/* Includes */")?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out)?;
    writeln!(out, "uint16_t {}_char_count = {};", name, glyphs.len())?;
    writeln!(out, "uint16_t {}_char_width = {};", name, glyphs.char_width())?;
    writeln!(out, "uint16_t {}_char_height = {};", name, height)?;
    writeln!(out, "{} {}_char_table[][{}] = {{", row_type, name, height)?;
    for glyph in glyphs.glyphs() {
        write!(out, "\t{{")?;
        write_rows(out, glyph.rows())?;
        writeln!(out, "}},")?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

fn write_rust<W: io::Write>(out: &mut W, glyphs: &Glyphset, name: &str) -> io::Result<()> {
    let row_type = match glyphs.char_width() {
        0..=16 => "u16",
        _ => "u32",
    };
    let prefix = name.to_ascii_uppercase();
    let height = glyphs.char_height();
    writeln!(out, "// GENERATED FILE - DO NOT MODIFY IT!")?;
    writeln!(out)?;
    writeln!(out, "pub const {}_CHAR_COUNT: u16 = {};", prefix, glyphs.len())?;
    writeln!(out, "pub const {}_CHAR_WIDTH: u16 = {};", prefix, glyphs.char_width())?;
    writeln!(out, "pub const {}_CHAR_HEIGHT: u16 = {};", prefix, height)?;
    writeln!(
        out,
        "pub static {}_CHAR_TABLE: [[{}; {}]; {}] = [",
        prefix,
        row_type,
        height,
        glyphs.len()
    )?;
    for glyph in glyphs.glyphs() {
        write!(out, "    [")?;
        write_rows(out, glyph.rows())?;
        writeln!(out, "],")?;
    }
    writeln!(out, "];")?;
    Ok(())
}

/// Write the glyph table for the font `name` to `out`
pub fn emit<W: io::Write>(
    glyphs: &Glyphset,
    name: &str,
    format: TableFormat,
    out: &mut W,
) -> Result<(), Error> {
    validate_name(name)?;
    let res = match format {
        TableFormat::C => write_c(out, glyphs, name),
        TableFormat::Rust => write_rust(out, glyphs, name),
    };
    res.and_then(|()| out.flush()).map_err(Error::Write)
}
