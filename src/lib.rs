//! GIF87a encoder for images with at most 256 colors.
//!
//! Every distinct color of the image gets an entry in the global color table, no quantization
//! is done: images with more colors are refused with [GifError::PaletteOverflow], before
//! anything is written. Pixels are then compressed with the GIF flavour of LZW from the
//! [gif_lzw] crate.
//!
//! The output is a plain GIF87a file: header, logical screen descriptor, global color table,
//! one image descriptor, the LZW image data, and a trailer. No extension blocks are written.
//!
//! # Examples
//!
//! ```
//! use gif87::{GifEncoder, GifError, Rgb, RgbPlanes};
//!
//! fn main() -> Result<(), GifError> {
//!     let planes = RgbPlanes::from_fn(2, 2, |_, y| {
//!         if y == 0 {
//!             Rgb::new(255, 0, 0)
//!         } else {
//!             Rgb::new(0, 255, 0)
//!         }
//!     })?;
//!
//!     let gif = GifEncoder::new(&planes)?.encode_to_vec()?;
//!
//!     assert_eq!(&gif[..6], b"GIF87a");
//!     assert_eq!(gif.last(), Some(&0));
//!     Ok(())
//! }
//! ```

pub mod encoder;
pub mod error;
pub mod header;
pub mod image;
pub mod palette;

pub use encoder::GifEncoder;
pub use error::{GifError, SourceError};
pub use image::{PixelSource, Rgb, RgbBuffer, RgbPlanes};
pub use palette::{IndexedImage, Palette, PaletteBuilder};

/// Encode `planes` as a GIF87a file, in memory.
///
/// # Errors
///
/// [GifError::PaletteOverflow] if the image has more than 256 colors.
pub fn encode(planes: &RgbPlanes) -> Result<Vec<u8>, GifError> {
    GifEncoder::new(planes)?.encode_to_vec()
}

/// Encode the pixels of any [PixelSource] as a GIF87a file, in memory.
///
/// # Errors
///
/// [GifError::SourceUnavailable] if the source can't be loaded, and
/// [GifError::PaletteOverflow] if the image has more than 256 colors.
pub fn encode_source<S>(source: &S) -> Result<Vec<u8>, GifError>
where
    S: PixelSource + ?Sized,
{
    GifEncoder::from_source(source)?.encode_to_vec()
}
