//! # Luminance images

use std::fmt;

use crate::pixel::PixelSource;

/// A dense, row-major buffer of luminance bytes (0 = black, 255 = white)
#[derive(Clone, PartialEq, Eq)]
pub struct MonochromeImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl MonochromeImage {
    /// Create an image from raw luminance values
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height` values.
    pub fn from_vec(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Reduce every pixel of `source` to its alpha-weighted luminance
    pub fn rasterize(source: &PixelSource) -> Self {
        let (width, height) = (source.width(), source.height());
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(source.sample(x, y).luminance());
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// The luminance at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[x + y * self.width]
    }

    /// The underlying buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for MonochromeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MonochromeImage[{}x{}]", self.width, self.height)?;
        for line in self.pixels.chunks(self.width.max(1)) {
            for v in line {
                write!(f, "{:02X}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
