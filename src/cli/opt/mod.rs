use std::{io, path::PathBuf};

use clap::Parser;
use fontgrid::{table::derive_name, GridParams, TableFormat};
use serde::Deserialize;
use thiserror::*;

mod de;
use de::{
    deserialize_opt_f32, deserialize_opt_format, deserialize_opt_path, deserialize_opt_string,
    deserialize_opt_u16,
};

#[derive(Parser)]
/// Convert a TGA font sheet into a glyph table
pub struct Options {
    /// The font sheet (uncompressed TGA)
    pub input: Option<PathBuf>,
    /// Where to store the table (stdout if missing)
    pub out: Option<PathBuf>,

    /// Settings passed as command line args
    #[clap(flatten)]
    pub cl_settings: Settings,

    /// Settings as a RON file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Print the image header and exit
    #[clap(long)]
    pub info: bool,
}

/// Conversion settings, from the command line or a RON file
#[derive(Debug, Default, Clone, Parser, Deserialize)]
pub struct Settings {
    /// The font sheet
    #[clap(skip)]
    #[serde(default, deserialize_with = "deserialize_opt_path")]
    pub input: Option<PathBuf>,
    /// The output file
    #[clap(skip)]
    #[serde(default, deserialize_with = "deserialize_opt_path")]
    pub output: Option<PathBuf>,
    /// Prefix of the generated identifiers (default: derived from the input file)
    #[clap(long, short = 'n')]
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub name: Option<String>,
    /// Maximum number of characters [default: 128]
    #[clap(long, short = 'c')]
    #[serde(default, deserialize_with = "deserialize_opt_u16")]
    pub char_count: Option<u16>,
    /// Width of a character cell in pixels [default: 12]
    #[clap(long, short = 'W')]
    #[serde(default, deserialize_with = "deserialize_opt_u16")]
    pub char_width: Option<u16>,
    /// Height of a character cell in pixels [default: 18]
    #[clap(long, short = 'H')]
    #[serde(default, deserialize_with = "deserialize_opt_u16")]
    pub char_height: Option<u16>,
    /// Pixels darker than this fraction of white are ink [default: 0.5]
    #[clap(long, short = 't')]
    #[serde(default, deserialize_with = "deserialize_opt_f32")]
    pub threshold: Option<f32>,
    /// Language of the table: "c" or "rust" [default: c]
    #[clap(long, short = 'F')]
    #[serde(default, deserialize_with = "deserialize_opt_format")]
    pub format: Option<TableFormat>,
    /// Also write the thresholded glyphs to this PNG file
    #[clap(long, short = 'p')]
    #[serde(default, deserialize_with = "deserialize_opt_path")]
    pub preview: Option<PathBuf>,
}

impl Settings {
    /// Fill every field that is not set with the value from `other`
    pub fn or(self, other: Settings) -> Settings {
        Settings {
            input: self.input.or(other.input),
            output: self.output.or(other.output),
            name: self.name.or(other.name),
            char_count: self.char_count.or(other.char_count),
            char_width: self.char_width.or(other.char_width),
            char_height: self.char_height.or(other.char_height),
            threshold: self.threshold.or(other.threshold),
            format: self.format.or(other.format),
            preview: self.preview.or(other.preview),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error")]
    Io(#[from] io::Error),
    #[error("Deserialize Error")]
    Ron(#[from] ron::error::Error),
    #[error("No input file given")]
    MissingInput,
}

/// The fully resolved settings of one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The font sheet
    pub input: PathBuf,
    /// The output file (stdout if `None`)
    pub output: Option<PathBuf>,
    /// Prefix of the generated identifiers
    pub name: String,
    /// Layout of the font sheet
    pub params: GridParams,
    /// Language of the table
    pub format: TableFormat,
    /// Optional PNG preview of the glyphs
    pub preview: Option<PathBuf>,
}

impl Config {
    /// Apply the defaults to `settings`
    pub fn resolve(settings: Settings) -> Result<Self, ConfigError> {
        let input = settings.input.ok_or(ConfigError::MissingInput)?;
        let name = match settings.name {
            Some(name) => name,
            None => derive_name(&input.file_stem().unwrap_or_default().to_string_lossy()),
        };
        let defaults = GridParams::default();
        let params = GridParams {
            char_count: settings.char_count.unwrap_or(defaults.char_count),
            char_width: settings.char_width.unwrap_or(defaults.char_width),
            char_height: settings.char_height.unwrap_or(defaults.char_height),
            threshold: settings.threshold.unwrap_or(defaults.threshold),
        };
        Ok(Config {
            input,
            output: settings.output,
            name,
            params,
            format: settings.format.unwrap_or_default(),
            preview: settings.preview,
        })
    }
}

impl Options {
    /// Layer the command line over the config file (if any) over the defaults
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let cl_settings = Settings {
            input: self.input.clone(),
            output: self.out.clone(),
            ..self.cl_settings.clone()
        };
        if let Some(config_path) = &self.config {
            let text = std::fs::read_to_string(config_path)?;
            let file_settings: Settings = ron::from_str(&text)?;
            Ok(cl_settings.or(file_settings))
        } else {
            Ok(cl_settings)
        }
    }

    /// Resolve the settings of this invocation
    pub fn config(&self) -> Result<Config, ConfigError> {
        Config::resolve(self.settings()?)
    }
}
