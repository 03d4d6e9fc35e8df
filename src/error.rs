//! Error types for session operations.

use thiserror::Error;

use crate::model::Rectangle;

/// Errors that can occur while loading images or applying session actions.
///
/// None of these are fatal to a session: the controller turns them into
/// system messages and leaves the rest of the state untouched.
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Label font file could not be parsed
    #[error("Invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Upload is not a PNG or JPEG file
    #[error("Unsupported image format: {detected}")]
    UnsupportedFormat {
        /// What the content sniffing found
        detected: String,
    },

    /// Upload exceeds the configured byte limit
    #[error("Upload of {size} bytes exceeds the limit of {limit} bytes")]
    TooLarge {
        /// Size of the rejected upload
        size: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Selection rectangle failed validation
    #[error("Invalid selection: {rect} {reason}")]
    InvalidSelection {
        /// The rejected rectangle
        rect: Rectangle,
        /// Why it was rejected
        reason: SelectionFault,
    },
}

/// Reason a selection rectangle was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionFault {
    /// `x1 > x2` or `y1 > y2`
    #[error("has inverted corners")]
    Inverted,
    /// A coordinate lies past the image edge
    #[error("extends past the {width}x{height} image")]
    OutOfBounds {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },
}

impl SessionError {
    /// Create an invalid selection error.
    pub fn invalid_selection(rect: Rectangle, reason: SelectionFault) -> Self {
        Self::InvalidSelection { rect, reason }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(detected: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            detected: detected.into(),
        }
    }
}
