//! # Glyph extraction

use std::fmt;

use tga::MonochromeImage;

use crate::Error;

/// Widest cell that fits into a row value
pub const MAX_CHAR_WIDTH: u16 = 32;

/// How the characters are laid out on the font sheet
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    /// Maximum number of characters to extract
    pub char_count: u16,
    /// Width of a cell in pixels
    pub char_width: u16,
    /// Height of a cell in pixels
    pub char_height: u16,
    /// Luminance fraction below which a pixel counts as ink
    pub threshold: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            char_count: 128,
            char_width: 12,
            char_height: 18,
            threshold: 0.5,
        }
    }
}

impl GridParams {
    /// Check that the cell size and threshold are usable
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_CHAR_WIDTH).contains(&self.char_width) || self.char_height == 0 {
            return Err(Error::InvalidCellSize {
                width: self.char_width,
                height: self.char_height,
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    fn is_ink(&self, luminance: u8) -> bool {
        f32::from(luminance) < self.threshold * 255.0
    }
}

/// A single character bitmap
///
/// Every row is a bitmask where bit `i` is the `i`-th pixel from the left.
#[derive(Clone, PartialEq, Eq)]
pub struct Glyph {
    width: u16,
    rows: Vec<u32>,
}

impl Glyph {
    /// Create a glyph from its row values
    pub fn new(width: u16, rows: Vec<u32>) -> Self {
        Self { width, rows }
    }

    /// The row values, top to bottom
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Whether the pixel at `(x, y)` is ink
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.rows[y] & (1 << x) != 0
    }

    /// Whether the glyph has no ink at all
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::from(self.width);
        writeln!(f, "+{}+", "-".repeat(width))?;
        for y in 0..self.rows.len() {
            write!(f, "|")?;
            for x in 0..width {
                f.write_str(if self.is_set(x, y) { "#" } else { " " })?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "+{}+", "-".repeat(width))
    }
}

/// The glyphs of a font, indexed by character code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphset {
    char_width: u16,
    char_height: u16,
    columns: usize,
    glyphs: Vec<Glyph>,
}

impl Glyphset {
    /// Cut `image` into cells and threshold every pixel.
    ///
    /// Characters are read left to right, then top to bottom. Partial cells at
    /// the right and bottom edge are ignored and at most `char_count` glyphs
    /// are returned. `params` must have passed [`GridParams::validate`].
    pub fn extract(image: &MonochromeImage, params: &GridParams) -> Self {
        let (cw, ch) = (usize::from(params.char_width), usize::from(params.char_height));
        let columns = image.width() / cw;
        let rows = image.height() / ch;

        if image.width() % cw != 0 || image.height() % ch != 0 {
            log::warn!(
                "Ignoring {}px to the right and {}px at the bottom of the font sheet",
                image.width() % cw,
                image.height() % ch
            );
        }

        let available = rows * columns;
        let count = usize::from(params.char_count).min(available);
        if count < usize::from(params.char_count) {
            log::warn!(
                "Font sheet only has room for {} of {} characters",
                available,
                params.char_count
            );
        }

        let glyphs = (0..count)
            .map(|n| {
                let (x0, y0) = ((n % columns) * cw, (n / columns) * ch);
                let rows = (0..ch)
                    .map(|j| {
                        (0..cw)
                            .filter(|&i| params.is_ink(image.get(x0 + i, y0 + j)))
                            .fold(0u32, |line, i| line | (1 << i))
                    })
                    .collect();
                let glyph = Glyph::new(params.char_width, rows);
                log::trace!("Glyph {}:\n{:?}", n, glyph);
                glyph
            })
            .collect();

        Self {
            char_width: params.char_width,
            char_height: params.char_height,
            columns,
            glyphs,
        }
    }

    /// Width of every glyph
    pub fn char_width(&self) -> u16 {
        self.char_width
    }

    /// Height of every glyph
    pub fn char_height(&self) -> u16 {
        self.char_height
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether there are no glyphs
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// All glyphs in character code order
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Draw the glyphs back into a grid like the one they were read from.
    ///
    /// Ink is black, everything else is white.
    #[cfg(feature = "image")]
    pub fn render_sheet(&self) -> image::GrayImage {
        let (cw, ch) = (u32::from(self.char_width), u32::from(self.char_height));
        let columns = self.columns.max(1) as u32;
        let rows = (self.glyphs.len() as u32).div_ceil(columns);
        image::GrayImage::from_fn(columns * cw, rows * ch, |x, y| {
            let n = (y / ch) * columns + x / cw;
            let ink = self
                .glyphs
                .get(n as usize)
                .is_some_and(|g| g.is_set((x % cw) as usize, (y % ch) as usize));
            image::Luma([if ink { 0x00 } else { 0xFF }])
        })
    }
}
