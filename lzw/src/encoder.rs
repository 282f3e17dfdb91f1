//! Contains the GIF flavoured LZW compressor.

use std::{
    fmt::Display,
    io::{Read, Write},
};

use log::debug;

use crate::{
    io::{BitPacker, BitWriter},
    table::{StringTable, EMPTY},
    MAX_CODE_WIDTH,
};

/// The error type for encoding operations.
///
/// Encapsulate [std::io::Error] and expose LZW code size or unexpected data issues.
#[derive(Debug)]
pub enum EncodingError {
    /// An I/O error happened when reading or writing data.
    Io(std::io::Error),
    /// Code size out of bounds. It should be between 2 and 8 included.
    CodeSize(u8),
    /// An unexpected code was read.
    ///
    /// For a code size of 4 for example,
    /// we expect the data to be between 0 and 2.pow(4) = 16.
    /// If in the data, we would then try to encode 42, it would not be correct and we return this
    /// unexpected code error.
    UnexpectedCode { code: u8, code_size: u8 },
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingError::Io(error) => std::fmt::Display::fmt(&error, f),
            EncodingError::CodeSize(code_size) => f.write_fmt(format_args!(
                "Code size must be between 2 and 8, was {code_size}.",
            )),
            EncodingError::UnexpectedCode { code, code_size } => f.write_fmt(format_args!(
                "Unexpected code {code}. For code size {code_size}, data should be < {}.",
                (1 << code_size)
            )),
        }
    }
}

impl std::error::Error for EncodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodingError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EncodingError {
    fn from(error: std::io::Error) -> Self {
        EncodingError::Io(error)
    }
}

/// The LZW state machine, writing its codes to any [BitWriter].
///
/// Feed it one byte at a time with [LzwCompressor::push], then call [LzwCompressor::finish].
/// The clear code is written as soon as the compressor is created.
pub struct LzwCompressor<B>
where
    B: BitWriter,
{
    bit_writer: B,
    table: StringTable,
    code_size: u8,
    max_code: u8,
    write_size: u8,
    prefix: u16,
}

impl<B> LzwCompressor<B>
where
    B: BitWriter,
{
    /// Start a new stream.
    ///
    /// # Errors
    ///
    /// Fails if `code_size` is not between 2 and 8, or if writing the clear code fails.
    pub fn new(bit_writer: B, code_size: u8) -> Result<Self, EncodingError> {
        if !(2..=8).contains(&code_size) {
            return Err(EncodingError::CodeSize(code_size));
        }

        let mut table = StringTable::new();
        table.clear(code_size);

        let mut bit_writer = bit_writer;
        let write_size = code_size + 1;
        bit_writer.write(1 << code_size, write_size)?;

        Ok(Self {
            bit_writer,
            table,
            code_size,
            max_code: ((1u32 << code_size) - 1) as u8,
            write_size,
            prefix: EMPTY,
        })
    }

    #[inline]
    pub fn clear_code(&self) -> u16 {
        1 << self.code_size
    }

    #[inline]
    pub fn end_of_information(&self) -> u16 {
        (1 << self.code_size) + 1
    }

    /// Current width of the written codes, in bits.
    #[inline]
    pub fn write_size(&self) -> u8 {
        self.write_size
    }

    #[inline]
    fn limit(&self) -> u16 {
        (1 << self.write_size) - 1
    }

    /// Compress one more byte.
    ///
    /// # Errors
    ///
    /// Fails on a byte that doesn't fit in the code size, or if the writer fails.
    #[inline]
    pub fn push(&mut self, k: u8) -> Result<(), EncodingError> {
        if k > self.max_code {
            return Err(EncodingError::UnexpectedCode {
                code: k,
                code_size: self.code_size,
            });
        }

        if let Some(word) = self.table.find(self.prefix, k) {
            self.prefix = word;
            return Ok(());
        }

        self.bit_writer.write(self.prefix, self.write_size)?;

        match self.table.add(self.prefix, k) {
            Some(new_code) if new_code > self.limit() => {
                // 4096 entries are reached at 12 bits, so this never goes past the maximum.
                self.write_size = (self.write_size + 1).min(MAX_CODE_WIDTH);
            }
            Some(_) => {}
            None => {
                debug!("String table full, writing clear code");
                let clear_code = self.clear_code();
                self.bit_writer.write(clear_code, self.write_size)?;
                self.write_size = self.code_size + 1;
                self.table.clear(self.code_size);
            }
        }

        self.prefix = k as u16;

        Ok(())
    }

    /// Write the pending prefix and the end of information code, then flush the writer.
    pub fn finish(mut self) -> Result<B, EncodingError> {
        if self.prefix != EMPTY {
            self.bit_writer.write(self.prefix, self.write_size)?;
        }
        let end_of_information = self.end_of_information();
        self.bit_writer.write(end_of_information, self.write_size)?;

        self.bit_writer.fill()?;
        self.bit_writer.flush()?;

        Ok(self.bit_writer)
    }
}

/// LZW encoder tuned for GIF.
///
/// Its code size is between 2 and 8 included. Codes are packed least significant bit first,
/// and framed in sub-blocks of at most 255 bytes. The zero length block terminating the image
/// data is left to the caller.
pub struct GifStyleEncoder;

impl GifStyleEncoder {
    /// Compress data with LZW, using GIF style variable encoding.
    ///
    /// # Arguments
    ///
    /// * `data` - The source data to be compressed.
    /// * `into` - The output where compressed data should be written.
    /// * `code_size` - Between 2 and 8, the initial code size to use.
    ///   Initial code size correspond to the range of expected data.
    ///   For a palette of 16 colors, indices are between 0 and 15, so a code size of 4
    ///   is the best fit. The initial write size will be equal to code size + 1.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error], unexpected codes or code sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// use gif_lzw::encoder::{EncodingError, GifStyleEncoder};
    ///
    /// fn main() -> Result<(), EncodingError> {
    ///     let data = [0, 0, 1, 3];
    ///     let mut output = vec![];
    ///
    ///     GifStyleEncoder::encode(&data[..], &mut output, 2)?;
    ///
    ///     assert_eq!(output, [0x03, 0x04, 0x32, 0x05]);
    ///     Ok(())
    /// }
    /// ```
    pub fn encode<R: Read, W: Write>(data: R, into: W, code_size: u8) -> Result<(), EncodingError> {
        let mut compressor = LzwCompressor::new(BitPacker::new(into), code_size)?;
        for k in data.bytes() {
            compressor.push(k?)?;
        }
        compressor.finish()?;

        Ok(())
    }

    /// Compress data with LZW, using GIF style variable encoding.
    /// Convenient wrapper that creates a [Vec<u8>] under the hood.
    ///
    /// # Arguments
    ///
    /// * `data` - The source data to be compressed.
    /// * `code_size` - Between 2 and 8, the initial code size to use.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error], unexpected codes or code sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// use gif_lzw::encoder::{EncodingError, GifStyleEncoder};
    ///
    /// fn main() -> Result<(), EncodingError> {
    ///     let data = [0, 0, 1, 3];
    ///     let output = GifStyleEncoder::encode_to_vec(&data[..], 2)?;
    ///
    ///     assert_eq!(output, [0x03, 0x04, 0x32, 0x05]);
    ///     Ok(())
    /// }
    /// ```
    pub fn encode_to_vec<R: Read>(data: R, code_size: u8) -> Result<Vec<u8>, EncodingError> {
        let mut output = vec![];
        GifStyleEncoder::encode(data, &mut output, code_size)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use rand::{prelude::StdRng, RngCore, SeedableRng};

    use super::*;

    /// Keeps every code with its width instead of packing bits.
    #[derive(Default)]
    struct CodeRecorder {
        codes: Vec<(u16, u8)>,
        filled: bool,
    }

    impl BitWriter for CodeRecorder {
        fn write(&mut self, data: u16, amount: u8) -> Result<(), std::io::Error> {
            assert!(data < 1 << amount, "code {data} doesn't fit in {amount} bits");
            self.codes.push((data, amount));
            Ok(())
        }

        fn fill(&mut self) -> Result<(), std::io::Error> {
            self.filled = true;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), std::io::Error> {
            Ok(())
        }
    }

    fn record(data: &[u8], code_size: u8) -> Result<CodeRecorder, EncodingError> {
        let mut compressor = LzwCompressor::new(CodeRecorder::default(), code_size)?;
        for &k in data {
            compressor.push(k)?;
        }
        compressor.finish()
    }

    /// Strips sub-block framing so weezl can read the stream.
    fn unblock(framed: &[u8]) -> Vec<u8> {
        let mut data = vec![];
        let mut rest = framed;
        while let Some((&len, tail)) = rest.split_first() {
            data.extend_from_slice(&tail[..len as usize]);
            rest = &tail[len as usize..];
        }
        data
    }

    fn decode(framed: &[u8], code_size: u8) -> Vec<u8> {
        let mut decoder = weezl::decode::Decoder::new(weezl::BitOrder::Lsb, code_size);
        decoder
            .decode(&unblock(framed))
            .expect("weezl should decode our stream")
    }

    #[test]
    fn encode_4color_data() -> Result<(), EncodingError> {
        let data = [
            1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 2,
            2, 1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
        ];

        let compressed = GifStyleEncoder::encode_to_vec(&data[..], 2)?;

        assert_eq!(
            compressed,
            [0x0C, 0x8C, 0x2D, 0x99, 0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0, 0x2, 0x55, 0x0]
        );

        Ok(())
    }

    #[test]
    fn encode_few_bytes() -> Result<(), EncodingError> {
        let data = [0, 0, 1, 3];

        let compressed = GifStyleEncoder::encode_to_vec(&data[..], 2)?;
        assert_eq!(compressed, [0x03, 0x04, 0x32, 0x05]);

        Ok(())
    }

    #[test]
    fn two_colors_square() -> Result<(), EncodingError> {
        let recorder = record(&[0, 0, 1, 1], 2)?;

        assert_eq!(
            recorder.codes,
            [(4, 3), (0, 3), (0, 3), (1, 3), (1, 4), (5, 4)]
        );
        assert!(recorder.filled);

        let compressed = GifStyleEncoder::encode_to_vec(&[0u8, 0, 1, 1][..], 2)?;
        assert_eq!(compressed, [0x03, 0x04, 0x12, 0x05]);

        Ok(())
    }

    #[test]
    fn empty_data_writes_clear_and_end() -> Result<(), EncodingError> {
        let recorder = record(&[], 2)?;
        assert_eq!(recorder.codes, [(4, 3), (5, 3)]);

        Ok(())
    }

    #[test]
    fn clear_code_comes_first() -> Result<(), EncodingError> {
        for code_size in 2..=8 {
            let recorder = record(&[0, 1, 0, 1], code_size)?;
            assert_eq!(recorder.codes[0], (1 << code_size, code_size + 1));
            assert_eq!(
                recorder.codes.last(),
                Some(&((1 << code_size) + 1, code_size + 1))
            );
        }

        Ok(())
    }

    #[test]
    fn width_grows_right_after_code_8() -> Result<(), EncodingError> {
        // Every byte pair is new: each byte after the first assigns one code, starting at 6.
        let data = [0, 1, 2, 3, 0, 2, 1, 3, 3, 0];
        let recorder = record(&data, 2)?;

        let widths: Vec<u8> = recorder.codes.iter().map(|&(_, width)| width).collect();
        // Clear, then codes emitted while assigning 6, 7 and 8 are 3 bits wide,
        // everything after code 8 exists is 4 bits wide.
        assert_eq!(widths[..4], [3, 3, 3, 3]);
        assert!(widths[4..].iter().all(|&width| width == 4));

        Ok(())
    }

    #[test]
    fn run_needs_few_codes() -> Result<(), EncodingError> {
        let data = vec![3u8; 10_000];
        let recorder = record(&data, 2)?;

        // A run of L bytes is covered by strings of length 1, 2, 3... so about sqrt(2L) codes.
        let data_codes = recorder.codes.len() - 2;
        assert!(data_codes < 200, "{data_codes} codes for a run");

        Ok(())
    }

    #[test]
    fn table_exhaustion_clears_at_12_bits() -> Result<(), EncodingError> {
        let mut rand = StdRng::seed_from_u64(7);
        let mut data: Vec<u8> = vec![0; 20_000];
        rand.fill_bytes(&mut data[..]);
        let recorder = record(&data, 8)?;

        let clears: Vec<usize> = recorder
            .codes
            .iter()
            .enumerate()
            .filter(|(_, code)| code.0 == 256)
            .map(|(index, _)| index)
            .collect();
        assert!(clears.len() > 1, "random data should fill the table");
        assert_eq!(clears[0], 0);
        for &index in &clears[1..] {
            assert_eq!(recorder.codes[index].1, 12);
            assert_eq!(recorder.codes[index + 1].1, 9);
        }
        assert!(recorder.codes.iter().all(|&(_, width)| (9..=12).contains(&width)));

        Ok(())
    }

    #[test]
    fn table_is_cleared_once_code_4095_exists() -> Result<(), EncodingError> {
        let mut rand = StdRng::seed_from_u64(7);
        let mut data: Vec<u8> = vec![0; 20_000];
        rand.fill_bytes(&mut data[..]);
        let recorder = record(&data, 8)?;

        let clears: Vec<usize> = recorder
            .codes
            .iter()
            .enumerate()
            .filter(|(_, code)| code.0 == 256)
            .map(|(index, _)| index)
            .collect();
        assert!(clears.len() > 1, "random data should fill the table");

        // After a clear, 3838 written codes learn 258 to 4095. The next written code can't
        // learn anything, and the clear code comes right after it.
        for pair in clears.windows(2) {
            assert_eq!(pair[1] - pair[0], 3840);
            let (last_code, width) = recorder.codes[pair[1] - 1];
            assert!(last_code != 256 && last_code != 257);
            assert_eq!(width, 12);
        }

        Ok(())
    }

    #[test]
    fn table_exhaustion_output() -> Result<(), EncodingError> {
        // xorshift32, so the data doesn't depend on any rng implementation.
        let mut state: u32 = 0x1234_5678;
        let data: Vec<u8> = (0..20_000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();

        let compressed = GifStyleEncoder::encode_to_vec(&data[..], 8)?;

        assert_eq!(compressed.len(), 27461);
        assert_eq!(compressed[..4], [0xFF, 0x00, 0x0F, 0x55]);
        assert_eq!(
            compressed[compressed.len() - 8..],
            [0x3D, 0x8E, 0xC0, 0xE5, 0x9F, 0x06, 0x02, 0x02]
        );

        // The first reset: its clear code starts on byte 5408 of the unframed stream.
        let stream = unblock(&compressed);
        assert_eq!(stream.len(), 27353);
        assert_eq!(
            stream[5402..5414],
            [0xDD, 0x00, 0x09, 0x7F, 0x00, 0x09, 0x00, 0xC1, 0x07, 0x50, 0x26, 0x35]
        );

        assert_eq!(decode(&compressed, 8), data);

        Ok(())
    }

    #[test]
    fn weezl_decodes_random_data() -> Result<(), EncodingError> {
        let mut rand = StdRng::seed_from_u64(42);
        let mut data: Vec<u8> = vec![0; 1 << 16];
        rand.fill_bytes(&mut data[..]);

        let compressed = GifStyleEncoder::encode_to_vec(&data[..], 8)?;
        assert_eq!(decode(&compressed, 8), data);

        Ok(())
    }

    #[test]
    fn weezl_decodes_small_code_sizes() -> Result<(), EncodingError> {
        for code_size in 2..=7u8 {
            let max = 1u32 << code_size;
            let data: Vec<u8> = (0..30_000u32)
                .map(|i| ((i / 7 + i * i / 13) % max) as u8)
                .collect();

            let compressed = GifStyleEncoder::encode_to_vec(&data[..], code_size)?;
            assert_eq!(decode(&compressed, code_size), data, "code size {code_size}");
        }

        Ok(())
    }

    #[test]
    fn encode_multiple_with_same_encoder() -> Result<(), EncodingError> {
        let data = [
            1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 2,
            2, 1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
        ];

        let compression1 = GifStyleEncoder::encode_to_vec(&data[..], 2)?;
        let compression2 = GifStyleEncoder::encode_to_vec(&data[..], 2)?;

        assert_eq!(compression1, compression2);

        Ok(())
    }

    #[test]
    fn unsupported_code_size() {
        let data = [0];
        let into = vec![];

        let result = GifStyleEncoder::encode(&data[..], into, 10).err().unwrap();
        let expected = EncodingError::CodeSize(10);

        assert_eq!(expected.to_string(), result.to_string());
    }

    #[test]
    fn wrong_data_for_code_size() {
        let data = [0, 1, 8, 3];

        let result = GifStyleEncoder::encode_to_vec(&data[..], 2).err().unwrap();
        let expected = EncodingError::UnexpectedCode {
            code: 8,
            code_size: 2,
        };

        assert_eq!(expected.to_string(), result.to_string());
    }
}
