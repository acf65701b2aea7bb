//! # Pixel access
//!
//! A [`PixelSource`] borrows the file buffer and decodes single pixels on
//! demand, hiding the storage mode and the on-disk orientation of the rows.

use crate::{DataType, TgaDescriptor, TgaError};

/// A decoded pixel
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgba {
    /// red
    pub r: u8,
    /// green
    pub g: u8,
    /// blue
    pub b: u8,
    /// alpha (255 is opaque)
    pub a: u8,
}

impl Rgba {
    /// An opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// An opaque gray level
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Alpha-weighted average of the three channels.
    ///
    /// Computes `(r + g + b) * a / (3 * 255)` with truncating integer math,
    /// so a fully transparent pixel is always `0`.
    pub fn luminance(self) -> u8 {
        let sum = u32::from(self.r) + u32::from(self.g) + u32::from(self.b);
        (sum * u32::from(self.a) / (3 * 255)) as u8
    }
}

/// The encoding of a single color value (pixel or color map entry)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorDepth {
    /// One gray byte
    Gray8,
    /// Blue, green, red
    Bgr24,
    /// Blue, green, red, alpha
    Bgra32,
}

impl ColorDepth {
    /// Select the encoding for a bit count
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Gray8),
            24 => Some(Self::Bgr24),
            32 => Some(Self::Bgra32),
            _ => None,
        }
    }

    /// Number of bytes per value
    pub fn bytes(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Bgr24 => 3,
            Self::Bgra32 => 4,
        }
    }

    /// Decode one value. `entry` must hold at least [`Self::bytes`] bytes.
    pub fn decode(self, entry: &[u8]) -> Rgba {
        match self {
            Self::Gray8 => Rgba::gray(entry[0]),
            Self::Bgr24 => Rgba::rgb(entry[2], entry[1], entry[0]),
            Self::Bgra32 => Rgba {
                r: entry[2],
                g: entry[1],
                b: entry[0],
                a: entry[3],
            },
        }
    }
}

/// How the pixel data is laid out in the file
#[derive(Debug, Clone)]
pub enum Storage<'a> {
    /// One index byte per pixel, looked up in a color map
    Paletted {
        /// The index bytes
        indices: &'a [u8],
        /// The color map table
        palette: &'a [u8],
        /// Index of the first color map entry
        origin: u16,
        /// Encoding of the color map entries
        entry: ColorDepth,
    },
    /// Direct BGR / BGRA values
    TrueColor {
        /// The pixel bytes
        data: &'a [u8],
        /// Encoding of the pixels
        depth: ColorDepth,
    },
    /// One gray byte per pixel
    Grayscale {
        /// The pixel bytes
        data: &'a [u8],
    },
}

/// Return the storage row of display row `y`.
///
/// Only the vertical origin is honored, columns are always read left to right.
pub fn storage_row(y: usize, height: usize, flip_vertical: bool) -> usize {
    if flip_vertical {
        height - 1 - y
    } else {
        y
    }
}

/// Random access to the pixels of a TGA image, in display order
#[derive(Debug, Clone)]
pub struct PixelSource<'a> {
    width: usize,
    height: usize,
    flip_vertical: bool,
    storage: Storage<'a>,
}

fn check_len(needed: usize, buffer: &[u8]) -> Result<(), TgaError> {
    if needed > buffer.len() {
        return Err(TgaError::TruncatedPixelData {
            needed,
            available: buffer.len(),
        });
    }
    Ok(())
}

impl<'a> PixelSource<'a> {
    /// Slice the color map and pixel data out of `buffer`.
    ///
    /// Fails if the buffer is shorter than the header says, or if a
    /// color-mapped pixel points outside of the color map.
    pub fn new(buffer: &'a [u8], descriptor: &TgaDescriptor) -> Result<Self, TgaError> {
        let data_start = descriptor.data_offset();
        let data_end = data_start + descriptor.data_size();
        check_len(data_start, buffer)?;
        check_len(data_end, buffer)?;
        let data = &buffer[data_start..data_end];

        log::debug!(
            "pixel data at {:#x}..{:#x} of {:#x}",
            data_start,
            data_end,
            buffer.len()
        );

        let storage = match descriptor.data_type {
            DataType::Paletted => {
                let entry = ColorDepth::from_bits(descriptor.color_map_depth).ok_or(
                    TgaError::UnsupportedColorMapDepth(descriptor.color_map_depth),
                )?;
                let palette = &buffer[descriptor.color_map_offset()..data_start];
                let origin = descriptor.color_map_origin;
                let length = descriptor.color_map_length;
                if let Some(&index) = data.iter().find(|&&index| {
                    u16::from(index)
                        .checked_sub(origin)
                        .map_or(true, |rel| rel >= length)
                }) {
                    return Err(TgaError::PaletteIndexOutOfRange {
                        index,
                        origin,
                        length,
                    });
                }
                Storage::Paletted {
                    indices: data,
                    palette,
                    origin,
                    entry,
                }
            }
            DataType::TrueColor => Storage::TrueColor {
                data,
                depth: ColorDepth::from_bits(descriptor.bits_per_pixel).ok_or(
                    TgaError::UnsupportedBitDepth {
                        data_type: DataType::TrueColor,
                        bits_per_pixel: descriptor.bits_per_pixel,
                    },
                )?,
            },
            DataType::Grayscale => Storage::Grayscale { data },
        };

        Ok(Self {
            width: usize::from(descriptor.width),
            height: usize::from(descriptor.height),
            flip_vertical: descriptor.flip_vertical,
            storage,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Decode the pixel at display position `(x, y)`, where `y = 0` is the top row.
    ///
    /// # Panics
    ///
    /// If `x >= width` or `y >= height`.
    pub fn sample(&self, x: usize, y: usize) -> Rgba {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let y = storage_row(y, self.height, self.flip_vertical);
        let pos = x + y * self.width;
        match &self.storage {
            Storage::Paletted {
                indices,
                palette,
                origin,
                entry,
            } => {
                let index = usize::from(indices[pos]) - usize::from(*origin);
                let size = entry.bytes();
                entry.decode(&palette[index * size..][..size])
            }
            Storage::TrueColor { data, depth } => {
                let size = depth.bytes();
                depth.decode(&data[pos * size..][..size])
            }
            Storage::Grayscale { data } => Rgba::gray(data[pos]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{storage_row, ColorDepth, PixelSource, Rgba};
    use crate::{TgaDescriptor, TgaError};

    fn tga(data_type: u8, cmap: (u16, u16, u8), bpp: u8, desc: u8, body: &[u8]) -> Vec<u8> {
        let (origin, length, depth) = cmap;
        let mut out = vec![0, (length > 0) as u8, data_type];
        out.extend_from_slice(&origin.to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&[depth, 0, 0, 0, 0, 2, 0, 2, 0, bpp, desc]);
        out.extend_from_slice(body);
        out
    }

    fn source(buffer: &[u8]) -> Result<PixelSource<'_>, TgaError> {
        let desc = TgaDescriptor::parse(buffer)?;
        PixelSource::new(buffer, &desc)
    }

    #[test]
    fn test_luminance() {
        assert_eq!(Rgba::gray(0).luminance(), 0);
        assert_eq!(Rgba::gray(255).luminance(), 255);
        assert_eq!(Rgba::rgb(30, 20, 10).luminance(), 20);
        assert_eq!(Rgba::rgb(1, 1, 0).luminance(), 0);
        let transparent = Rgba {
            r: 255,
            g: 255,
            b: 255,
            a: 0,
        };
        assert_eq!(transparent.luminance(), 0);
        let half = Rgba {
            r: 255,
            g: 255,
            b: 255,
            a: 128,
        };
        assert_eq!(half.luminance(), 128);
    }

    #[test]
    fn test_color_depth_decode() {
        assert_eq!(ColorDepth::Gray8.decode(&[7]), Rgba::gray(7));
        assert_eq!(ColorDepth::Bgr24.decode(&[10, 20, 30]), Rgba::rgb(30, 20, 10));
        assert_eq!(
            ColorDepth::Bgra32.decode(&[10, 20, 30, 40]),
            Rgba {
                r: 30,
                g: 20,
                b: 10,
                a: 40
            }
        );
        assert_eq!(ColorDepth::from_bits(16), None);
    }

    #[test]
    fn test_storage_row() {
        assert_eq!(storage_row(0, 3, true), 2);
        assert_eq!(storage_row(2, 3, true), 0);
        assert_eq!(storage_row(1, 3, false), 1);
    }

    #[test]
    fn test_right_to_left_bit_is_ignored() {
        #[rustfmt::skip]
        let body = [
            1, 2,
            3, 4,
        ];
        let plain = tga(3, (0, 0, 0), 8, 0x20, &body);
        let mirrored = tga(3, (0, 0, 0), 8, 0x30, &body);
        let (a, b) = (source(&plain).unwrap(), source(&mirrored).unwrap());
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
        assert_eq!(b.sample(0, 0), Rgba::gray(1));
    }

    #[test]
    fn test_truecolor_top_down() {
        #[rustfmt::skip]
        let body = [
            1, 2, 3,  4, 5, 6,
            7, 8, 9,  10, 11, 12,
        ];
        let buffer = tga(2, (0, 0, 0), 24, 0x20, &body);
        let src = source(&buffer).unwrap();
        assert_eq!(src.sample(0, 0), Rgba::rgb(3, 2, 1));
        assert_eq!(src.sample(1, 0), Rgba::rgb(6, 5, 4));
        assert_eq!(src.sample(0, 1), Rgba::rgb(9, 8, 7));
    }

    #[test]
    fn test_grayscale_bottom_up() {
        let buffer = tga(3, (0, 0, 0), 8, 0x00, &[1, 2, 3, 4]);
        let src = source(&buffer).unwrap();
        assert_eq!(src.sample(0, 0), Rgba::gray(3));
        assert_eq!(src.sample(1, 1), Rgba::gray(2));
    }

    #[test]
    fn test_paletted_24() {
        let mut body = vec![0, 0, 0, 10, 20, 30];
        body.extend_from_slice(&[5, 6, 6, 5]);
        let buffer = tga(1, (5, 2, 24), 8, 0x20, &body);
        let src = source(&buffer).unwrap();
        assert_eq!(src.sample(0, 0), Rgba::gray(0));
        assert_eq!(src.sample(1, 0), Rgba::rgb(30, 20, 10));
        assert_eq!(src.sample(1, 0).luminance(), 20);
    }

    #[test]
    fn test_paletted_index_out_of_range() {
        let mut body = vec![0xFF, 0x80];
        body.extend_from_slice(&[0, 1, 2, 0]);
        let buffer = tga(1, (0, 2, 8), 8, 0x20, &body);
        assert_eq!(
            source(&buffer).unwrap_err(),
            TgaError::PaletteIndexOutOfRange {
                index: 2,
                origin: 0,
                length: 2
            }
        );
    }

    #[test]
    fn test_truncated_color_map() {
        // 4 entries of 24 bits, but the file ends after 8 bytes of the map
        let buffer = tga(1, (0, 4, 24), 8, 0x20, &[0; 8]);
        assert_eq!(
            source(&buffer).unwrap_err(),
            TgaError::TruncatedPixelData {
                needed: 18 + 4 * 3,
                available: 18 + 8
            }
        );
    }

    #[test]
    fn test_truncated_pixel_data() {
        let buffer = tga(2, (0, 0, 0), 32, 0x20, &[0; 15]);
        assert_eq!(
            source(&buffer).unwrap_err(),
            TgaError::TruncatedPixelData {
                needed: 18 + 16,
                available: 18 + 15
            }
        );
    }
}
