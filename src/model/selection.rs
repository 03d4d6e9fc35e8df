//! Selection rectangles and the per-image selection tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SelectionFault, SessionError};

// ============================================================================
// Rectangle
// ============================================================================

/// An axis-aligned selection in original-image pixel coordinates.
///
/// Stored as the two corners `(x1, y1)` (top-left) and `(x2, y2)`
/// (bottom-right), both inclusive. A valid rectangle satisfies
/// `x1 <= x2 <= width` and `y1 <= y2 <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rectangle {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rectangle {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Suggested selection for a freshly loaded image: the central
    /// 25%..75% band on both axes.
    pub fn default_for(width: u32, height: u32) -> Self {
        Self {
            x1: width / 4,
            y1: height / 4,
            x2: width * 3 / 4,
            y2: height * 3 / 4,
        }
    }

    /// Width in pixels (`x2 - x1`), zero for inverted rectangles.
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    /// Height in pixels (`y2 - y1`), zero for inverted rectangles.
    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Check the rectangle against the bounds of a `width` x `height` image.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), SessionError> {
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(SessionError::invalid_selection(
                *self,
                SelectionFault::Inverted,
            ));
        }
        if self.x2 > width || self.y2 > height {
            return Err(SessionError::invalid_selection(
                *self,
                SelectionFault::OutOfBounds { width, height },
            ));
        }
        Ok(())
    }

    /// Check if a pixel lies inside the rectangle (edges included).
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}) to ({},{})", self.x1, self.y1, self.x2, self.y2)
    }
}

impl From<[u32; 4]> for Rectangle {
    fn from([x1, y1, x2, y2]: [u32; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<Rectangle> for [u32; 4] {
    fn from(rect: Rectangle) -> Self {
        [rect.x1, rect.y1, rect.x2, rect.y2]
    }
}

// ============================================================================
// Selection Tracker
// ============================================================================

/// Active selection plus the ordered history of every distinct selection
/// made on the current image.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    active: Option<Rectangle>,
    history: Vec<Rectangle>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active selection.
    pub fn set_active(&mut self, rect: Rectangle) {
        self.active = Some(rect);
    }

    /// Currently active selection, if any.
    pub fn active(&self) -> Option<&Rectangle> {
        self.active.as_ref()
    }

    /// Append `rect` to the history unless an equal rectangle is already there.
    /// Returns true if the history grew.
    pub fn record_history(&mut self, rect: Rectangle) -> bool {
        if self.history.contains(&rect) {
            return false;
        }
        self.history.push(rect);
        true
    }

    /// Selection history in insertion order.
    pub fn history(&self) -> &[Rectangle] {
        &self.history
    }

    /// Drop the active selection and the whole history.
    pub fn clear(&mut self) {
        self.active = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_centers_selection() {
        let rect = Rectangle::default_for(800, 600);
        assert_eq!(rect, Rectangle::new(200, 150, 600, 450));
    }

    #[test]
    fn test_validate_accepts_full_image_and_degenerate() {
        assert!(Rectangle::new(0, 0, 800, 600).validate(800, 600).is_ok());
        assert!(Rectangle::new(10, 10, 10, 10).validate(800, 600).is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted() {
        let err = Rectangle::new(300, 100, 200, 400)
            .validate(800, 600)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidSelection {
                reason: SelectionFault::Inverted,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let err = Rectangle::new(0, 0, 801, 100)
            .validate(800, 600)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidSelection {
                reason: SelectionFault::OutOfBounds {
                    width: 800,
                    height: 600
                },
                ..
            }
        ));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(
            Rectangle::new(100, 100, 400, 300).to_string(),
            "(100,100) to (400,300)"
        );
    }

    #[test]
    fn test_record_history_deduplicates() {
        let mut tracker = SelectionTracker::new();
        let a = Rectangle::new(1, 2, 3, 4);
        let b = Rectangle::new(5, 6, 7, 8);

        assert!(tracker.record_history(a));
        assert!(tracker.record_history(b));
        assert!(!tracker.record_history(a));
        assert_eq!(tracker.history(), &[a, b]);
    }

    #[test]
    fn test_set_active_replaces_previous() {
        let mut tracker = SelectionTracker::new();
        tracker.set_active(Rectangle::new(0, 0, 10, 10));
        tracker.set_active(Rectangle::new(5, 5, 20, 20));
        assert_eq!(tracker.active(), Some(&Rectangle::new(5, 5, 20, 20)));
        // set_active alone never touches history
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut tracker = SelectionTracker::new();
        let rect = Rectangle::new(0, 0, 10, 10);
        tracker.set_active(rect);
        tracker.record_history(rect);
        tracker.clear();
        assert!(tracker.active().is_none());
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_serde_as_array() {
        let rect = Rectangle::new(50, 50, 200, 200);
        let json = serde_json::to_string(&rect).expect("serialize");
        assert_eq!(json, "[50,50,200,200]");
        let back: Rectangle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, rect);
    }
}
