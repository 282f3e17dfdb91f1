//! Binary layout of the blocks surrounding the image data.
//!
//! Multi-byte fields are little endian, and packed fields are filled from the least
//! significant bit, so a little endian [BitWriter] lays every block out field by field.

use std::io::Write;

use bitstream_io::{BitWrite, BitWriter, LittleEndian};

use crate::palette::Palette;

pub const SIGNATURE: &[u8; 6] = b"GIF87a";

/// Starts an image descriptor.
pub const IMAGE_SEPARATOR: u8 = b',';

/// Ends the file.
pub const TRAILER: u8 = b';';

/// The empty sub-block ending the image data.
pub const BLOCK_TERMINATOR: u8 = 0;

/// Bits per primary color of the original image, minus one.
const COLOR_RESOLUTION: u8 = 7;

/// The logical screen descriptor, always announcing a global color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub width: u16,
    pub height: u16,
    /// Bits needed to index the global color table, between 1 and 8.
    pub color_table_bits: u8,
}

impl ScreenDescriptor {
    pub fn new(width: u16, height: u16, palette: &Palette) -> Self {
        Self {
            width,
            height,
            color_table_bits: palette.table_bits(),
        }
    }

    pub fn write_to<W: Write>(&self, into: &mut W) -> std::io::Result<()> {
        let mut writer = BitWriter::endian(into, LittleEndian);
        writer.write(16, self.width)?;
        writer.write(16, self.height)?;

        writer.write(3, self.color_table_bits - 1)?;
        writer.write_bit(false)?; // sorted
        writer.write(3, COLOR_RESOLUTION)?;
        writer.write_bit(true)?; // global color table

        writer.write(8, 0u8)?; // background color index
        writer.write(8, 0u8)?; // pixel aspect ratio

        Ok(())
    }
}

/// An image descriptor, without local color table nor interlacing.
///
/// The same layout, with the `;` separator and an empty size, ends the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub separator: u8,
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
}

impl ImageDescriptor {
    /// Descriptor of an image covering the whole screen.
    pub fn image(width: u16, height: u16) -> Self {
        Self {
            separator: IMAGE_SEPARATOR,
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    pub fn trailer() -> Self {
        Self {
            separator: TRAILER,
            left: 0,
            top: 0,
            width: 0,
            height: 0,
        }
    }

    pub fn write_to<W: Write>(&self, into: &mut W) -> std::io::Result<()> {
        let mut writer = BitWriter::endian(into, LittleEndian);
        writer.write(8, self.separator)?;
        writer.write(16, self.left)?;
        writer.write(16, self.top)?;
        writer.write(16, self.width)?;
        writer.write(16, self.height)?;
        // Local color table, interlace and sort flags, local table size: all unused.
        writer.write(8, 0u8)?;

        Ok(())
    }
}

/// Write the whole color table, padding included.
pub fn write_color_table<W: Write>(palette: &Palette, into: &mut W) -> std::io::Result<()> {
    into.write_all(&palette.to_bytes())
}
