//! # Truevision TGA images
//!
//! This crate reads the uncompressed variants of the TGA format (color-mapped,
//! truecolor and grayscale) and reduces them to a single luminance channel.
#![warn(missing_docs)]

use std::fmt;

use bitflags::bitflags;
use displaydoc::Display;
use thiserror::Error;

pub mod parser;
pub mod pixel;
pub mod raster;

pub use pixel::{ColorDepth, PixelSource, Rgba};
pub use raster::MonochromeImage;

/// Size of the fixed TGA file header
pub const HEADER_LEN: usize = 18;

/// Error when decoding a TGA image
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum TgaError {
    /// The file is shorter than the 18 byte header
    TruncatedHeader,
    /// The image is color-mapped, but has no color map
    MissingColorMap,
    /// Unsupported color map depth: {0}
    UnsupportedColorMapDepth(u8),
    /// Unsupported bit depth {bits_per_pixel} for {data_type:?} image
    UnsupportedBitDepth {
        /// The declared image type
        data_type: DataType,
        /// The declared pixel size
        bits_per_pixel: u8,
    },
    /// Unsupported data type: {0}
    UnsupportedDataType(u8),
    /// Image data truncated: needed {needed} bytes, found {available}
    TruncatedPixelData {
        /// Number of bytes required by the header
        needed: usize,
        /// Length of the buffer
        available: usize,
    },
    /// Palette index {index} outside of color map [{origin}, {origin} + {length})
    PaletteIndexOutOfRange {
        /// The offending index byte
        index: u8,
        /// First entry of the color map
        origin: u16,
        /// Number of entries in the color map
        length: u16,
    },
}

/// The storage mode of the image data
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Uncompressed, color-mapped (type 1)
    Paletted,
    /// Uncompressed, true-color (type 2)
    TrueColor,
    /// Uncompressed, black and white (type 3)
    Grayscale,
}

impl DataType {
    /// Map the header byte to a supported data type
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Paletted),
            2 => Some(Self::TrueColor),
            3 => Some(Self::Grayscale),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paletted => f.write_str("color-mapped"),
            Self::TrueColor => f.write_str("true-color"),
            Self::Grayscale => f.write_str("grayscale"),
        }
    }
}

bitflags! {
    /// The image descriptor byte (offset 17)
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ImageDescriptor: u8 {
        /// Number of attribute (alpha) bits per pixel
        const ALPHA_BITS = 0b0000_1111;
        /// Pixels are stored right-to-left
        const RIGHT_TO_LEFT = 0b0001_0000;
        /// Rows are stored top-to-bottom
        const TOP_TO_BOTTOM = 0b0010_0000;
    }
}

/// The header fields exactly as stored in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    /// Length of the image ID field
    pub id_length: u8,
    /// 0 = no color map, 1 = color map present
    pub color_map_type: u8,
    /// The image type code
    pub data_type: u8,
    /// Index of the first color map entry
    pub color_map_origin: u16,
    /// Number of color map entries
    pub color_map_length: u16,
    /// Bits per color map entry
    pub color_map_depth: u8,
    /// Horizontal screen position
    pub x_origin: u16,
    /// Vertical screen position
    pub y_origin: u16,
    /// Image width in pixels
    pub width: u16,
    /// Image height in pixels
    pub height: u16,
    /// Bits per pixel
    pub bits_per_pixel: u8,
    /// Image descriptor flags
    pub image_descriptor: u8,
}

/// A validated TGA header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TgaDescriptor {
    /// Length of the image ID field
    pub image_id_length: u8,
    /// Whether the file declares a color map
    pub color_map_present: bool,
    /// The storage mode of the pixels
    pub data_type: DataType,
    /// Index of the first color map entry
    pub color_map_origin: u16,
    /// Number of color map entries
    pub color_map_length: u16,
    /// Bits per color map entry
    pub color_map_depth: u8,
    /// Horizontal screen position
    pub x_origin: u16,
    /// Vertical screen position
    pub y_origin: u16,
    /// Image width in pixels
    pub width: u16,
    /// Image height in pixels
    pub height: u16,
    /// Bits per pixel
    pub bits_per_pixel: u8,
    /// Rows are stored bottom-up and need to be flipped for display
    pub flip_vertical: bool,
    /// The right-to-left bit is set (informational, pixels are not mirrored)
    pub flip_horizontal: bool,
    /// The raw descriptor flags
    pub descriptor: ImageDescriptor,
}

impl TgaDescriptor {
    /// Parse and validate the header at the start of `input`
    pub fn parse(input: &[u8]) -> Result<Self, TgaError> {
        let raw = parser::parse_header(input)?;
        Self::try_from(raw)
    }

    /// Offset of the color map table (if any) within the file
    pub fn color_map_offset(&self) -> usize {
        HEADER_LEN + usize::from(self.image_id_length)
    }

    /// Size of the color map table in bytes
    pub fn color_map_size(&self) -> usize {
        match self.data_type {
            DataType::Paletted => {
                usize::from(self.color_map_length) * usize::from(self.color_map_depth / 8)
            }
            _ => 0,
        }
    }

    /// Offset of the first pixel within the file
    pub fn data_offset(&self) -> usize {
        self.color_map_offset() + self.color_map_size()
    }

    /// Size of the pixel data in bytes
    pub fn data_size(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * usize::from(self.bits_per_pixel / 8)
    }

    /// Return the image ID field of `buffer`, if it is fully present
    pub fn image_id<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        buffer.get(HEADER_LEN..self.color_map_offset())
    }
}

impl TryFrom<RawHeader> for TgaDescriptor {
    type Error = TgaError;

    fn try_from(raw: RawHeader) -> Result<Self, Self::Error> {
        let data_type =
            DataType::from_u8(raw.data_type).ok_or(TgaError::UnsupportedDataType(raw.data_type))?;

        let bpp_ok = match data_type {
            DataType::Paletted => {
                if raw.color_map_type == 0 {
                    return Err(TgaError::MissingColorMap);
                }
                if !matches!(raw.color_map_depth, 8 | 24 | 32) {
                    return Err(TgaError::UnsupportedColorMapDepth(raw.color_map_depth));
                }
                raw.bits_per_pixel == 8
            }
            DataType::TrueColor => matches!(raw.bits_per_pixel, 24 | 32),
            DataType::Grayscale => raw.bits_per_pixel == 8,
        };
        if !bpp_ok {
            return Err(TgaError::UnsupportedBitDepth {
                data_type,
                bits_per_pixel: raw.bits_per_pixel,
            });
        }

        let descriptor = ImageDescriptor::from_bits_retain(raw.image_descriptor);
        Ok(Self {
            image_id_length: raw.id_length,
            color_map_present: raw.color_map_type != 0,
            data_type,
            color_map_origin: raw.color_map_origin,
            color_map_length: raw.color_map_length,
            color_map_depth: raw.color_map_depth,
            x_origin: raw.x_origin,
            y_origin: raw.y_origin,
            width: raw.width,
            height: raw.height,
            bits_per_pixel: raw.bits_per_pixel,
            flip_vertical: !descriptor.contains(ImageDescriptor::TOP_TO_BOTTOM),
            flip_horizontal: descriptor.contains(ImageDescriptor::RIGHT_TO_LEFT),
            descriptor,
        })
    }
}

/// Decode a complete TGA file into a luminance image
pub fn decode(buffer: &[u8]) -> Result<MonochromeImage, TgaError> {
    let descriptor = TgaDescriptor::parse(buffer)?;
    log::debug!("{:#?}", descriptor);
    let source = PixelSource::new(buffer, &descriptor)?;
    Ok(MonochromeImage::rasterize(&source))
}

#[cfg(test)]
mod tests {
    use super::{DataType, ImageDescriptor, TgaDescriptor, TgaError};

    fn header(data_type: u8, cmap_type: u8, cmap_depth: u8, bpp: u8, desc: u8) -> [u8; 18] {
        [
            3, cmap_type, data_type, 0, 0, 16, 0, cmap_depth, 0, 0, 0, 0, 24, 0, 18, 0, bpp, desc,
        ]
    }

    #[test]
    fn test_parse_truecolor() {
        let desc = TgaDescriptor::parse(&header(2, 0, 0, 32, 0x28)).unwrap();
        assert_eq!(desc.data_type, DataType::TrueColor);
        assert_eq!(desc.width, 24);
        assert_eq!(desc.height, 18);
        assert_eq!(desc.image_id_length, 3);
        assert!(!desc.flip_vertical);
        assert!(!desc.flip_horizontal);
        assert_eq!((desc.descriptor & ImageDescriptor::ALPHA_BITS).bits(), 8);
        assert_eq!(desc.data_offset(), 21);
        assert_eq!(desc.data_size(), 24 * 18 * 4);
    }

    #[test]
    fn test_parse_paletted_offsets() {
        let desc = TgaDescriptor::parse(&header(1, 1, 24, 8, 0)).unwrap();
        assert_eq!(desc.data_type, DataType::Paletted);
        assert!(desc.flip_vertical);
        assert_eq!(desc.color_map_offset(), 21);
        assert_eq!(desc.color_map_size(), 16 * 3);
        assert_eq!(desc.data_offset(), 21 + 48);
    }

    #[test]
    fn test_reject_headers() {
        assert_eq!(
            TgaDescriptor::parse(&header(1, 0, 24, 8, 0)),
            Err(TgaError::MissingColorMap)
        );
        assert_eq!(
            TgaDescriptor::parse(&header(1, 1, 16, 8, 0)),
            Err(TgaError::UnsupportedColorMapDepth(16))
        );
        assert_eq!(
            TgaDescriptor::parse(&header(1, 1, 32, 16, 0)),
            Err(TgaError::UnsupportedBitDepth {
                data_type: DataType::Paletted,
                bits_per_pixel: 16
            })
        );
        assert_eq!(
            TgaDescriptor::parse(&header(2, 0, 0, 16, 0)),
            Err(TgaError::UnsupportedBitDepth {
                data_type: DataType::TrueColor,
                bits_per_pixel: 16
            })
        );
        assert_eq!(
            TgaDescriptor::parse(&header(3, 0, 0, 24, 0)),
            Err(TgaError::UnsupportedBitDepth {
                data_type: DataType::Grayscale,
                bits_per_pixel: 24
            })
        );
        for rle in [0, 9, 10, 11] {
            assert_eq!(
                TgaDescriptor::parse(&header(rle, 0, 0, 8, 0)),
                Err(TgaError::UnsupportedDataType(rle))
            );
        }
    }

    #[test]
    fn test_truncated_header() {
        let full = header(2, 0, 0, 24, 0);
        assert_eq!(TgaDescriptor::parse(&full[..17]), Err(TgaError::TruncatedHeader));
        assert_eq!(TgaDescriptor::parse(&[]), Err(TgaError::TruncatedHeader));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TgaError::UnsupportedDataType(10).to_string(),
            "Unsupported data type: 10"
        );
        assert_eq!(
            TgaError::TruncatedPixelData {
                needed: 100,
                available: 40
            }
            .to_string(),
            "Image data truncated: needed 100 bytes, found 40"
        );
    }
}
