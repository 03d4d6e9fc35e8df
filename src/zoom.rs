//! Display zoom factor.
//!
//! Zoom only scales how the image is shown; it never touches pixel data.

use serde::{Deserialize, Serialize};

use crate::constants::zoom;

/// Display scale factor, never below [`zoom::MIN`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoomLevel(f32);

impl ZoomLevel {
    /// Create a zoom level, clamped to the minimum.
    pub fn new(factor: f32) -> Self {
        Self(factor.max(zoom::MIN))
    }

    pub fn factor(&self) -> f32 {
        self.0
    }

    /// Zoom in by one step. There is no upper bound.
    pub fn zoom_in(&self) -> ZoomLevel {
        ZoomLevel(self.0 * zoom::STEP)
    }

    /// Zoom out by one step, floored at the minimum.
    pub fn zoom_out(&self) -> ZoomLevel {
        ZoomLevel((self.0 / zoom::STEP).max(zoom::MIN))
    }

    pub fn reset() -> ZoomLevel {
        ZoomLevel(zoom::DEFAULT)
    }

    /// Scale an image dimension for display.
    pub fn scale(&self, pixels: u32) -> u32 {
        (pixels as f32 * self.0).round() as u32
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::reset()
    }
}
