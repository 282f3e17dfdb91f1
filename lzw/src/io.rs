use std::io::Write;

use log::trace;

/// Largest amount of data bytes a GIF sub-block can hold.
pub const MAX_BLOCK_LEN: usize = 255;

/// A sink for variable width codes.
///
/// The LZW compressor only talks to this trait, so anything able to take codes of a given
/// bit width can sit behind it: the [BitPacker] for real output, or a recorder in tests.
pub trait BitWriter {
    /// Write the `amount` low bits of `data`.
    fn write(&mut self, data: u16, amount: u8) -> Result<(), std::io::Error>;

    /// Pad the pending bits to a byte boundary and push out everything still buffered.
    fn fill(&mut self) -> Result<(), std::io::Error>;

    fn flush(&mut self) -> Result<(), std::io::Error>;
}

/// Packs codes least significant bit first, and frames the resulting bytes in GIF sub-blocks.
///
/// Each sub-block is a length byte followed by at most [MAX_BLOCK_LEN] data bytes.
/// The zero length block ending a sequence of sub-blocks is not written here: the caller
/// decides when the image data is over.
pub struct BitPacker<W>
where
    W: Write,
{
    write: W,
    cursor: u8,
    byte_buffer: u32,
    block: [u8; MAX_BLOCK_LEN + 1],
    len: usize,
}

impl<W> BitPacker<W>
where
    W: Write,
{
    pub fn new(write: W) -> Self {
        let cursor = 0;
        let byte_buffer = 0;
        let block = [0; MAX_BLOCK_LEN + 1];
        let len = 0;
        Self {
            write,
            cursor,
            byte_buffer,
            block,
            len,
        }
    }

    /// Amount of bytes waiting in the current, not yet framed, sub-block.
    pub fn pending(&self) -> usize {
        self.len
    }

    pub fn into_inner(self) -> W {
        self.write
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) -> Result<(), std::io::Error> {
        if self.len == MAX_BLOCK_LEN {
            self.write_block()?;
        }
        self.block[self.len] = byte;
        self.len += 1;

        Ok(())
    }

    fn write_block(&mut self) -> Result<(), std::io::Error> {
        if self.len > 0 {
            trace!("Writing sub-block of {} bytes", self.len);
            self.write.write_all(&[self.len as u8])?;
            self.write.write_all(&self.block[..self.len])?;
            self.len = 0;
        }

        Ok(())
    }
}

impl<W> BitWriter for BitPacker<W>
where
    W: Write,
{
    #[inline]
    fn write(&mut self, data: u16, amount: u8) -> Result<(), std::io::Error> {
        let mask = (1 << amount) - 1;
        self.byte_buffer |= (data as u32 & mask) << self.cursor;
        self.cursor += amount;

        while self.cursor >= 8 {
            let byte = self.byte_buffer as u8;
            self.byte_buffer >>= 8;
            self.cursor -= 8;

            self.push_byte(byte)?;
        }

        Ok(())
    }

    #[inline]
    fn fill(&mut self) -> Result<(), std::io::Error> {
        if self.cursor > 0 {
            let byte = self.byte_buffer as u8;
            self.byte_buffer = 0;
            self.cursor = 0;
            self.push_byte(byte)?;
        }

        self.write_block()
    }

    #[inline]
    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.write.flush()
    }
}
