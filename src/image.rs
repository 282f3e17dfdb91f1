//! Pixel data given to the encoder.
//!
//! The encoder works on three separate color planes stored column by column: the sample for
//! pixel `(x, y)` is at `x * height + y`. Pixels are also visited in that order when building
//! the palette, which decides the index of every color.

use std::borrow::Cow;

use crate::error::{GifError, SourceError};

/// A color, as stored in the GIF color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

/// Red, green and blue samples of a whole image, in column-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbPlanes {
    width: u16,
    height: u16,
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
}

impl RgbPlanes {
    /// Wrap three column-major planes of `width * height` samples.
    ///
    /// # Errors
    ///
    /// [GifError::InvalidDimensions] if a dimension is 0 or above 65535, or if a plane
    /// doesn't hold exactly `width * height` samples.
    pub fn new(
        width: usize,
        height: usize,
        red: Vec<u8>,
        green: Vec<u8>,
        blue: Vec<u8>,
    ) -> Result<Self, GifError> {
        let (w, h) = check_dimensions(width, height)?;
        let expected = width * height;
        for (name, plane) in [("red", &red), ("green", &green), ("blue", &blue)] {
            if plane.len() != expected {
                return Err(GifError::dimensions(
                    width,
                    height,
                    format!(
                        "{name} plane holds {} samples, expected {expected}",
                        plane.len()
                    ),
                ));
            }
        }

        Ok(Self {
            width: w,
            height: h,
            red,
            green,
            blue,
        })
    }

    /// Build planes from channels indexed `[x][y]`: one inner vec per column.
    ///
    /// # Errors
    ///
    /// [GifError::InvalidDimensions] if the channels don't agree on their size, if a column is
    /// shorter or longer than the first one, or if the image is empty or too large.
    pub fn from_columns(
        red: &[Vec<u8>],
        green: &[Vec<u8>],
        blue: &[Vec<u8>],
    ) -> Result<Self, GifError> {
        let width = red.len();
        let height = red.first().map_or(0, Vec::len);

        if green.len() != width || blue.len() != width {
            return Err(GifError::dimensions(
                width,
                height,
                "channels have different widths",
            ));
        }

        let mut planes = [
            Vec::with_capacity(width * height),
            Vec::with_capacity(width * height),
            Vec::with_capacity(width * height),
        ];
        for (plane, channel) in planes.iter_mut().zip([red, green, blue]) {
            for (x, column) in channel.iter().enumerate() {
                if column.len() != height {
                    return Err(GifError::dimensions(
                        width,
                        height,
                        format!("column {x} holds {} samples", column.len()),
                    ));
                }
                plane.extend_from_slice(column);
            }
        }

        let [red, green, blue] = planes;
        Self::new(width, height, red, green, blue)
    }

    /// Build planes by asking `pixel` for the color at every `(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut pixel: F) -> Result<Self, GifError>
    where
        F: FnMut(u16, u16) -> Rgb,
    {
        let (w, h) = check_dimensions(width, height)?;

        let mut red = Vec::with_capacity(width * height);
        let mut green = Vec::with_capacity(width * height);
        let mut blue = Vec::with_capacity(width * height);
        for x in 0..w {
            for y in 0..h {
                let color = pixel(x, y);
                red.push(color.red);
                green.push(color.green);
                blue.push(color.blue);
            }
        }

        Self::new(width, height, red, green, blue)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// If `(x, y)` is outside of the image.
    pub fn pixel(&self, x: u16, y: u16) -> Rgb {
        assert!(x < self.width && y < self.height, "({x}, {y}) is out of bounds");
        let index = x as usize * self.height as usize + y as usize;
        Rgb::new(self.red[index], self.green[index], self.blue[index])
    }

    /// Every pixel with its coordinates, column after column.
    pub fn pixels(&self) -> impl Iterator<Item = (u16, u16, Rgb)> + '_ {
        let height = self.height as usize;
        self.red
            .iter()
            .zip(&self.green)
            .zip(&self.blue)
            .enumerate()
            .map(move |(index, ((&red, &green), &blue))| {
                (
                    (index / height) as u16,
                    (index % height) as u16,
                    Rgb::new(red, green, blue),
                )
            })
    }
}

/// Anything that can hand over its pixels as [RgbPlanes].
///
/// Loading may fail, for example when pixels come from a file or a decoder. Such failures are
/// reported by the encoder as [GifError::SourceUnavailable], with the cause untouched.
///
/// Sources already holding planes lend them, others build them on load.
pub trait PixelSource {
    fn load(&self) -> Result<Cow<'_, RgbPlanes>, SourceError>;
}

impl PixelSource for RgbPlanes {
    fn load(&self) -> Result<Cow<'_, RgbPlanes>, SourceError> {
        Ok(Cow::Borrowed(self))
    }
}

/// Interleaved RGB samples stored row after row, 3 bytes per pixel.
///
/// This is how most decoders and frame buffers lay out their pixels.
#[derive(Debug, Clone, Copy)]
pub struct RgbBuffer<'a> {
    width: u16,
    height: u16,
    data: &'a [u8],
}

impl<'a> RgbBuffer<'a> {
    /// # Errors
    ///
    /// [GifError::InvalidDimensions] if `data` doesn't hold exactly `width * height * 3` bytes,
    /// or for out of range dimensions.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, GifError> {
        let (w, h) = check_dimensions(width, height)?;
        if data.len() != width * height * 3 {
            return Err(GifError::dimensions(
                width,
                height,
                format!(
                    "buffer holds {} bytes, expected {}",
                    data.len(),
                    width * height * 3
                ),
            ));
        }

        Ok(Self {
            width: w,
            height: h,
            data,
        })
    }
}

impl PixelSource for RgbBuffer<'_> {
    fn load(&self) -> Result<Cow<'_, RgbPlanes>, SourceError> {
        let width = self.width as usize;
        let planes = RgbPlanes::from_fn(width, self.height as usize, |x, y| {
            let offset = (y as usize * width + x as usize) * 3;
            Rgb::new(
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
            )
        })?;

        Ok(Cow::Owned(planes))
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(u16, u16), GifError> {
    if width == 0 || height == 0 {
        return Err(GifError::dimensions(width, height, "image is empty"));
    }
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(GifError::dimensions(
            width,
            height,
            "GIF dimensions are limited to 65535",
        )),
    }
}
