//! GIF flavoured LZW encoder.
//!
//! This crate compresses palette indices the way GIF image data expects them: variable code
//! size starting at the initial code size + 1 and growing up to 12 bits, a clear code written
//! first and whenever the 4096 entries string table is full, codes packed least significant
//! bit first, and bytes framed in sub-blocks of at most 255 bytes.
//!
//! The string table is a fixed size open addressing hash table, so compressing doesn't allocate
//! past the creation of the compressor.
//!
//! It works with any [std::io::Read] and [std::io::Write].
//!
//! # Examples
//!
//! ```
//! use gif_lzw::encoder::{EncodingError, GifStyleEncoder};
//!
//! fn main() -> Result<(), EncodingError> {
//!     let data = [0, 0, 1, 3];
//!     let mut compressed = vec![];
//!
//!     GifStyleEncoder::encode(&data[..], &mut compressed, 2)?;
//!
//!     // One sub-block of 3 bytes. The terminating empty block is up to the caller.
//!     assert_eq!(compressed, [0x03, 0x04, 0x32, 0x05]);
//!     Ok(())
//! }
//! ```

pub mod encoder;
pub mod io;
pub mod table;

/// Codes never get wider than 12 bits.
pub const MAX_CODE_WIDTH: u8 = 12;
