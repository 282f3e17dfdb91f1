//! Exact palette construction.
//!
//! No quantization happens here: every distinct color of the image gets its own entry, in the
//! order it is first met, and images with more than 256 colors are refused.

use indexmap::IndexSet;
use log::debug;

use crate::{
    error::GifError,
    image::{Rgb, RgbPlanes},
};

/// A GIF color table never holds more than 256 colors.
pub const MAX_COLORS: usize = 256;

/// Number of bits needed to tell `n` values apart, with at least one bit as soon as there is
/// a value.
///
/// ```
/// use gif87::palette::bits_needed;
///
/// assert_eq!(bits_needed(0), 0);
/// assert_eq!(bits_needed(1), 1);
/// assert_eq!(bits_needed(2), 1);
/// assert_eq!(bits_needed(3), 2);
/// assert_eq!(bits_needed(256), 8);
/// ```
pub fn bits_needed(n: usize) -> u8 {
    if n == 0 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()).max(1) as u8
}

/// The global color table, padded with black to a power of two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
    used: usize,
}

impl Palette {
    /// All entries, padding included.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of colors actually found in the image.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bits per entry index, as written in the screen descriptor's table size field (plus one).
    pub fn table_bits(&self) -> u8 {
        bits_needed(self.len())
    }

    /// The LZW minimum code size. GIF decoders expect at least 2, even for two colors.
    pub fn code_size(&self) -> u8 {
        self.table_bits().max(2)
    }

    /// The color table as written in the file: red, green and blue for every entry.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|color| [color.red, color.green, color.blue])
            .collect()
    }
}

/// Collects distinct colors in first seen order, and hands out their index.
#[derive(Debug, Default)]
pub struct PaletteBuilder {
    colors: IndexSet<Rgb>,
}

impl PaletteBuilder {
    pub fn new() -> Self {
        Self {
            colors: IndexSet::with_capacity(MAX_COLORS),
        }
    }

    /// Index of `color`, adding it to the palette if it is new.
    ///
    /// # Errors
    ///
    /// [GifError::PaletteOverflow] when `color` would be the 257th color.
    pub fn index_of(&mut self, color: Rgb) -> Result<u8, GifError> {
        if let Some(index) = self.colors.get_index_of(&color) {
            return Ok(index as u8);
        }
        if self.colors.len() == MAX_COLORS {
            return Err(GifError::PaletteOverflow { max: MAX_COLORS });
        }

        let (index, _) = self.colors.insert_full(color);
        Ok(index as u8)
    }

    pub fn finish(self) -> Palette {
        let used = self.colors.len();
        let mut colors: Vec<Rgb> = self.colors.into_iter().collect();
        colors.resize(1 << bits_needed(used), Rgb::BLACK);

        Palette { colors, used }
    }
}

/// An image converted to palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u16,
    height: u16,
    palette: Palette,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Build the palette of `planes` and map every pixel to its index.
    ///
    /// Pixels are visited column by column, so this is also the order colors get their index.
    /// Indices are stored row by row, the order of GIF image data.
    ///
    /// # Errors
    ///
    /// [GifError::PaletteOverflow] if the image has more than 256 colors.
    pub fn from_planes(planes: &RgbPlanes) -> Result<Self, GifError> {
        let width = planes.width();
        let height = planes.height();

        let mut builder = PaletteBuilder::new();
        let mut indices = vec![0; width as usize * height as usize];
        for (x, y, color) in planes.pixels() {
            indices[y as usize * width as usize + x as usize] = builder.index_of(color)?;
        }

        let palette = builder.finish();
        debug!(
            "Found {} colors in {width}x{height} image, palette of {}",
            palette.used(),
            palette.len()
        );

        Ok(Self {
            width,
            height,
            palette,
            indices,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// One palette index per pixel, row after row.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}
