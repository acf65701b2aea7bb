use std::path::Path;

use color_eyre::eyre::{self, Context};
use prettytable::{format, row, Table};
use tga::{PixelSource, TgaDescriptor};

/// Print the header of a TGA file as a table
pub fn print_header(path: &Path) -> eyre::Result<()> {
    let buffer =
        std::fs::read(path).wrap_err_with(|| format!("Failed to read '{}'", path.display()))?;
    let desc = TgaDescriptor::parse(&buffer)?;

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["field", "value"]);
    table.add_row(row!["data type", desc.data_type]);
    table.add_row(row!["size", format!("{}x{}", desc.width, desc.height)]);
    table.add_row(row!["bits per pixel", desc.bits_per_pixel]);
    table.add_row(row!["origin", format!("{}, {}", desc.x_origin, desc.y_origin)]);
    let rows = match desc.flip_vertical {
        true => "bottom-up",
        false => "top-down",
    };
    let columns = match desc.flip_horizontal {
        true => "right-to-left (ignored)",
        false => "left-to-right",
    };
    table.add_row(row!["rows", rows]);
    table.add_row(row!["columns", columns]);
    if desc.color_map_present {
        table.add_row(row![
            "color map",
            format!(
                "{} entries from {}, {} bits",
                desc.color_map_length, desc.color_map_origin, desc.color_map_depth
            )
        ]);
    }
    if let Some(id) = desc.image_id(&buffer).filter(|id| !id.is_empty()) {
        table.add_row(row!["image id", String::from_utf8_lossy(id)]);
    }
    table.add_row(row![
        "pixel data",
        format!("{:#x}..{:#x}", desc.data_offset(), desc.data_offset() + desc.data_size())
    ]);
    table.add_row(row!["file size", format!("{:#x}", buffer.len())]);
    table.printstd();

    // surfaces truncation and palette errors
    PixelSource::new(&buffer, &desc)?;
    Ok(())
}
