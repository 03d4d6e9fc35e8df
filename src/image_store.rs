//! Storage for the uploaded image and its annotated derivative.

use image::{DynamicImage, ImageFormat};

use crate::error::SessionError;

/// PNG magic bytes
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG magic bytes (SOI marker followed by any segment)
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Identify an upload from its leading bytes. Only PNG and JPEG are accepted.
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(&PNG_MAGIC) {
        Some(ImageFormat::Png)
    } else if data.starts_with(&JPEG_MAGIC) {
        Some(ImageFormat::Jpeg)
    } else {
        None
    }
}

/// Decode uploaded file content into an image.
///
/// Rejects files above `max_bytes` before looking at them, then anything that
/// is not PNG or JPEG by content (file names are never trusted).
pub fn decode_upload(data: &[u8], max_bytes: usize) -> Result<DynamicImage, SessionError> {
    if data.len() > max_bytes {
        return Err(SessionError::TooLarge {
            size: data.len(),
            limit: max_bytes,
        });
    }

    let format = sniff_format(data).ok_or_else(|| {
        let detected = image::guess_format(data)
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|_| "unknown".to_string());
        SessionError::unsupported_format(detected)
    })?;

    let img = image::load_from_memory_with_format(data, format)?;
    log::trace!(
        "decoded {:?} upload: {}x{} ({} bytes)",
        format,
        img.width(),
        img.height(),
        data.len()
    );
    Ok(img)
}

/// The two image slots of a session.
///
/// `original` is set once per upload and never modified; `annotated` is a
/// derived copy that is replaced wholesale whenever a new annotation is drawn.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    original: Option<DynamicImage>,
    annotated: Option<DynamicImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly uploaded image, discarding any annotation.
    pub fn reset(&mut self, original: DynamicImage) {
        self.original = Some(original);
        self.annotated = None;
    }

    /// Replace the annotated derivative.
    pub fn set_annotated(&mut self, annotated: DynamicImage) {
        self.annotated = Some(annotated);
    }

    pub fn original(&self) -> Option<&DynamicImage> {
        self.original.as_ref()
    }

    pub fn annotated(&self) -> Option<&DynamicImage> {
        self.annotated.as_ref()
    }

    /// Image to show: the annotated copy if there is one, else the original.
    pub fn display(&self) -> Option<&DynamicImage> {
        self.annotated.as_ref().or(self.original.as_ref())
    }

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    /// `(width, height)` of the original image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.original.as_ref().map(|img| (img.width(), img.height()))
    }
}
