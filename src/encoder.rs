use std::io::Write;

use gif_lzw::{encoder::LzwCompressor, io::BitPacker};
use log::debug;

use crate::{
    error::GifError,
    header::{write_color_table, ImageDescriptor, ScreenDescriptor, BLOCK_TERMINATOR, SIGNATURE},
    image::{PixelSource, RgbPlanes},
    palette::{IndexedImage, Palette},
};

/// Writes a single image as a GIF87a file.
///
/// The palette is built when the encoder is created, so an image with too many colors is
/// refused before anything gets written.
#[derive(Debug, Clone)]
pub struct GifEncoder {
    image: IndexedImage,
}

impl GifEncoder {
    /// # Errors
    ///
    /// [GifError::PaletteOverflow] if the image uses more than 256 colors.
    pub fn new(planes: &RgbPlanes) -> Result<Self, GifError> {
        let image = IndexedImage::from_planes(planes)?;

        Ok(Self { image })
    }

    /// Load the pixels of `source`, then build the palette.
    ///
    /// Planes given as a source are read in place, not copied.
    ///
    /// # Errors
    ///
    /// [GifError::SourceUnavailable] if the source fails to load, wrapping its error, or
    /// [GifError::PaletteOverflow] if the image uses more than 256 colors.
    pub fn from_source<S>(source: &S) -> Result<Self, GifError>
    where
        S: PixelSource + ?Sized,
    {
        let planes = source.load().map_err(GifError::SourceUnavailable)?;
        Self::new(&planes)
    }

    pub fn width(&self) -> u16 {
        self.image.width()
    }

    pub fn height(&self) -> u16 {
        self.image.height()
    }

    pub fn palette(&self) -> &Palette {
        self.image.palette()
    }

    /// Palette indices, row after row.
    pub fn indices(&self) -> &[u8] {
        self.image.indices()
    }

    /// Write the GIF file to `into`.
    ///
    /// Nothing is buffered here, wrap `into` in a [std::io::BufWriter] if small writes are costly.
    ///
    /// # Errors
    ///
    /// Only I/O errors can happen at this point. When one does, `into` is left with a truncated
    /// file: whatever was written before the failure stays there.
    pub fn write<W: Write>(&self, mut into: W) -> Result<(), GifError> {
        let palette = self.palette();
        let code_size = palette.code_size();
        debug!(
            "Writing {}x{} GIF, {} colors, LZW code size {code_size}",
            self.width(),
            self.height(),
            palette.used()
        );

        into.write_all(SIGNATURE)?;
        ScreenDescriptor::new(self.width(), self.height(), palette).write_to(&mut into)?;
        write_color_table(palette, &mut into)?;
        ImageDescriptor::image(self.width(), self.height()).write_to(&mut into)?;

        into.write_all(&[code_size])?;
        let mut compressor = LzwCompressor::new(BitPacker::new(&mut into), code_size)?;
        for &index in self.indices() {
            compressor.push(index)?;
        }
        compressor.finish()?;
        into.write_all(&[BLOCK_TERMINATOR])?;

        ImageDescriptor::trailer().write_to(&mut into)?;
        into.flush()?;

        Ok(())
    }

    /// Convenient wrapper around [GifEncoder::write] that creates a [Vec<u8>] under the hood.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, GifError> {
        let mut output = vec![];
        self.write(&mut output)?;
        Ok(output)
    }
}
