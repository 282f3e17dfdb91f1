//! Error types for GIF encoding.

use gif_lzw::encoder::EncodingError;
use thiserror::Error;

/// Boxed cause of a pixel source failure.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong while turning pixels into a GIF.
///
/// Palette and dimension errors are detected before a single byte is written.
#[derive(Debug, Error)]
pub enum GifError {
    /// The image uses more colors than a GIF palette can hold.
    #[error("Too many colors: a GIF palette holds at most {max} colors")]
    PaletteOverflow {
        /// Maximum number of colors in a palette.
        max: usize,
    },

    /// The pixel source could not be read.
    #[error("Pixel source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),

    /// Dimensions are out of range, or don't match the amount of pixel data.
    #[error("Invalid dimensions {width}x{height}: {message}")]
    InvalidDimensions {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
        /// What is wrong with them.
        message: String,
    },

    /// The output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The LZW compression failed.
    #[error("LZW compression failed: {0}")]
    Compression(#[source] EncodingError),
}

impl From<EncodingError> for GifError {
    fn from(error: EncodingError) -> Self {
        match error {
            EncodingError::Io(error) => GifError::Io(error),
            error => GifError::Compression(error),
        }
    }
}

impl GifError {
    pub(crate) fn dimensions(width: usize, height: usize, message: impl Into<String>) -> Self {
        GifError::InvalidDimensions {
            width,
            height,
            message: message.into(),
        }
    }
}
