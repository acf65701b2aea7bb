use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use color_eyre::eyre::{self, Context};
use fontgrid::{Error, Glyphset};
use image::ImageFormat;

use super::opt::Config;

/// Run one conversion from the input file to the output file (or stdout)
pub fn run(config: &Config) -> eyre::Result<()> {
    let buffer = std::fs::read(&config.input)
        .map_err(Error::Io)
        .wrap_err_with(|| format!("Failed to read '{}'", config.input.display()))?;
    log::debug!("{:?}", config);

    let glyphs = fontgrid::convert(&buffer, &config.params)
        .wrap_err_with(|| format!("Failed to convert '{}'", config.input.display()))?;
    fontgrid::validate_name(&config.name)?;

    match &config.output {
        Some(out_path) => {
            write_table(&glyphs, config, out_path)
                .wrap_err_with(|| format!("Failed to write '{}'", out_path.display()))?;
            log::info!("Wrote {} glyphs to '{}'", glyphs.len(), out_path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut stdolock = stdout.lock();
            fontgrid::emit(&glyphs, &config.name, config.format, &mut stdolock)?;
        }
    }

    if let Some(preview) = &config.preview {
        save_preview(&glyphs, preview)
            .wrap_err_with(|| format!("Failed to save preview '{}'", preview.display()))?;
        log::info!("Saved preview to '{}'", preview.display());
    }
    Ok(())
}

/// Write the table to `out_path`, removing the file again if that fails
fn write_table(glyphs: &Glyphset, config: &Config, out_path: &Path) -> Result<(), Error> {
    let file = File::create(out_path).map_err(Error::Io)?;
    let mut writer = BufWriter::new(file);
    let res = fontgrid::emit(glyphs, &config.name, config.format, &mut writer).and_then(|()| {
        writer
            .into_inner()
            .map(drop)
            .map_err(|e| Error::Write(e.into_error()))
    });
    if res.is_err() {
        if let Err(e) = std::fs::remove_file(out_path) {
            log::warn!("Failed to remove partial output: {}", e);
        }
    }
    res
}

fn save_preview(glyphs: &Glyphset, path: &Path) -> eyre::Result<()> {
    if glyphs.is_empty() {
        log::warn!("No glyphs to preview");
        return Ok(());
    }
    let image = glyphs.render_sheet();
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
