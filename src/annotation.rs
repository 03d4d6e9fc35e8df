//! Annotation overlay rendering.
//!
//! This module draws a labelled rectangle on top of an image:
//! - the outline is drawn inward from the rectangle's bounds
//! - the label sits above the top-left corner, offset upward
//! - the base image is never modified; a new image is returned

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::config::AnnotationConfig;
use crate::error::SessionError;
use crate::font::LabelFont;
use crate::model::Rectangle;

/// Fixed drawing style for annotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    /// Outline and label color
    pub color: Rgba<u8>,
    /// Outline thickness in pixels
    pub stroke_width: u32,
    /// Distance from the rectangle's top edge up to the label's top
    pub label_offset: u32,
    /// Label glyph height in pixels
    pub label_size: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::from(&AnnotationConfig::default())
    }
}

impl From<&AnnotationConfig> for AnnotationStyle {
    fn from(config: &AnnotationConfig) -> Self {
        let [r, g, b] = config.color;
        Self {
            color: Rgba([r, g, b, 255]),
            stroke_width: config.stroke_width.max(1),
            label_offset: config.label_offset,
            label_size: config.label_size,
        }
    }
}

/// Draws labelled rectangles onto copies of an image.
#[derive(Debug, Default)]
pub struct AnnotationEngine {
    style: AnnotationStyle,
    font: LabelFont,
}

impl AnnotationEngine {
    pub fn new(style: AnnotationStyle, font: LabelFont) -> Self {
        Self { style, font }
    }

    /// Build an engine from the annotation section of the config.
    pub fn from_config(config: &AnnotationConfig) -> Result<Self, SessionError> {
        let font = LabelFont::load(config.font_path.as_deref())?;
        Ok(Self::new(AnnotationStyle::from(config), font))
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Font used for labels; also used for chart captions.
    pub fn font(&self) -> &LabelFont {
        &self.font
    }

    /// Draw `rect` and `label` on a fresh copy of `base`.
    ///
    /// Always starts from `base`, so annotating twice replaces the first
    /// overlay rather than stacking on top of it. Parts of the rectangle or
    /// label outside the image are clipped; a label on a rectangle touching
    /// the top edge is therefore cut off.
    pub fn annotate(&self, base: &DynamicImage, rect: &Rectangle, label: &str) -> DynamicImage {
        let mut canvas = base.to_rgba8();
        self.draw_outline(&mut canvas, rect);

        let label_x = coord(rect.x1);
        let label_y = coord(rect.y1).saturating_sub(coord(self.style.label_offset));
        // A label starting past the right or bottom edge has nothing to show
        if label_x < coord(canvas.width()) && label_y < coord(canvas.height()) {
            self.font.draw(
                &mut canvas,
                self.style.color,
                label_x,
                label_y,
                self.style.label_size,
                label,
            );
        }

        log::debug!("🖍️ Annotated {} with '{}'", rect, label);
        DynamicImage::ImageRgba8(canvas)
    }

    /// Region of the image that [`AnnotationEngine::annotate`] may touch for
    /// `rect` and `label`, as `(x, y, width, height)` with a signed origin.
    pub fn affected_region(&self, rect: &Rectangle, label: &str) -> (i32, i32, u32, u32) {
        let (label_w, _) = self.font.measure(self.style.label_size, label);
        let x = coord(rect.x1);
        let y = coord(rect.y1).saturating_sub(coord(self.style.label_offset));
        let width = rect.width().saturating_add(1).max(label_w);
        let height = rect
            .height()
            .saturating_add(1)
            .saturating_add(self.style.label_offset);
        (x, y, width, height)
    }

    /// Outline drawn as four filled bands inside the inclusive bounds.
    ///
    /// Corners past the canvas are pulled back to its edge first, so band
    /// sizes stay within the image and never reach zero.
    fn draw_outline(&self, canvas: &mut RgbaImage, rect: &Rectangle) {
        let (max_x, max_y) = canvas.dimensions();
        let (x1, x2) = (rect.x1.min(max_x), rect.x2.min(max_x));
        let (y1, y2) = (rect.y1.min(max_y), rect.y2.min(max_y));
        let width = x2.saturating_sub(x1).saturating_add(1);
        let height = y2.saturating_sub(y1).saturating_add(1);
        let stroke_x = self.style.stroke_width.min(width);
        let stroke_y = self.style.stroke_width.min(height);
        let color = self.style.color;

        let bands = [
            // top
            Rect::at(coord(x1), coord(y1)).of_size(width, stroke_y),
            // bottom
            Rect::at(coord(x1), coord(y2) - coord(stroke_y) + 1).of_size(width, stroke_y),
            // left
            Rect::at(coord(x1), coord(y1)).of_size(stroke_x, height),
            // right
            Rect::at(coord(x2) - coord(stroke_x) + 1, coord(y1)).of_size(stroke_x, height),
        ];
        for band in bands {
            draw_filled_rect_mut(canvas, band, color);
        }
    }
}

/// Pixel coordinate as a signed drawing position, saturating at `i32::MAX`.
fn coord(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::IDENTIFY_LABEL;

    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    fn base_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(800, 600, GRAY))
    }

    #[test]
    fn test_annotate_does_not_mutate_base() {
        let engine = AnnotationEngine::default();
        let base = base_image();
        let before = base.clone();
        let out = engine.annotate(&base, &Rectangle::new(50, 50, 200, 200), IDENTIFY_LABEL);
        assert_eq!(base, before);
        assert_ne!(out, base);
    }

    #[test]
    fn test_outline_pixels() {
        let engine = AnnotationEngine::default();
        let rect = Rectangle::new(50, 50, 200, 200);
        let out = engine.annotate(&base_image(), &rect, "").to_rgba8();
        let blue = Rgba([0, 0, 255, 255]);

        // Corners and 3px-thick edges
        assert_eq!(*out.get_pixel(50, 50), blue);
        assert_eq!(*out.get_pixel(200, 200), blue);
        assert_eq!(*out.get_pixel(52, 120), blue);
        assert_eq!(*out.get_pixel(198, 120), blue);
        // Interior and just outside stay untouched
        assert_eq!(*out.get_pixel(53, 120), GRAY);
        assert_eq!(*out.get_pixel(120, 120), GRAY);
        assert_eq!(*out.get_pixel(49, 120), GRAY);
        assert_eq!(*out.get_pixel(201, 120), GRAY);
    }

    #[test]
    fn test_changes_confined_to_affected_region() {
        let engine = AnnotationEngine::default();
        let rect = Rectangle::new(100, 100, 400, 300);
        let base = base_image();
        let out = engine.annotate(&base, &rect, IDENTIFY_LABEL).to_rgba8();
        let base = base.to_rgba8();

        let (rx, ry, rw, rh) = engine.affected_region(&rect, IDENTIFY_LABEL);
        let mut changed = 0;
        for (x, y, pixel) in out.enumerate_pixels() {
            if *pixel == *base.get_pixel(x, y) {
                continue;
            }
            changed += 1;
            let (x, y) = (x as i32, y as i32);
            assert!(x >= rx && x < rx + rw as i32, "x={} outside region", x);
            assert!(y >= ry && y < ry + rh as i32, "y={} outside region", y);
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_label_drawn_above_rectangle() {
        let engine = AnnotationEngine::default();
        let rect = Rectangle::new(100, 100, 400, 300);
        let out = engine.annotate(&base_image(), &rect, IDENTIFY_LABEL).to_rgba8();
        let inked_above = (80..100)
            .flat_map(|y| (100..300).map(move |x| (x, y)))
            .any(|(x, y)| *out.get_pixel(x, y) != GRAY);
        assert!(inked_above);
    }

    #[test]
    fn test_label_clipped_at_top_edge() {
        let engine = AnnotationEngine::default();
        let rect = Rectangle::new(10, 0, 100, 50);
        // Must not panic even though the label lies above the image
        let out = engine.annotate(&base_image(), &rect, IDENTIFY_LABEL);
        assert_eq!((out.width(), out.height()), (800, 600));
    }

    #[test]
    fn test_degenerate_and_edge_rectangles() {
        let engine = AnnotationEngine::default();
        let base = base_image();
        // Zero-area selection
        engine.annotate(&base, &Rectangle::new(10, 10, 10, 10), "x");
        // Selection touching the far edges (x2 == width is allowed)
        let out = engine.annotate(&base, &Rectangle::new(700, 500, 800, 600), "x");
        assert_eq!(*out.to_rgba8().get_pixel(799, 599), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_reannotate_replaces_previous() {
        let engine = AnnotationEngine::default();
        let base = base_image();
        engine.annotate(&base, &Rectangle::new(50, 50, 200, 200), "a");
        let second = engine.annotate(&base, &Rectangle::new(400, 400, 500, 500), "b");
        // The first rectangle is not present in the second image
        assert_eq!(*second.to_rgba8().get_pixel(50, 120), GRAY);
    }

    #[test]
    fn test_style_from_config() {
        let config = AnnotationConfig {
            color: [255, 0, 0],
            stroke_width: 0,
            ..AnnotationConfig::default()
        };
        let style = AnnotationStyle::from(&config);
        assert_eq!(style.color, Rgba([255, 0, 0, 255]));
        assert_eq!(style.stroke_width, 1);
    }

    #[test]
    fn test_engine_exposes_its_font() {
        let engine = AnnotationEngine::new(AnnotationStyle::default(), LabelFont::Builtin);
        assert!(matches!(engine.font(), LabelFont::Builtin));
    }

    #[test]
    fn test_oversized_rectangle_is_clipped() {
        let engine = AnnotationEngine::default();
        let base = base_image();
        let huge = Rectangle::new(0, 0, u32::MAX, 10);
        let out = engine.annotate(&base, &huge, "x").to_rgba8();
        assert_eq!(out.dimensions(), (800, 600));
        assert_eq!(*out.get_pixel(0, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(*out.get_pixel(799, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(*out.get_pixel(400, 5), GRAY);

        let (_, _, w, h) = engine.affected_region(&huge, "x");
        assert_eq!(w, u32::MAX);
        assert_eq!(h, 31);

        let far = Rectangle::new(u32::MAX - 1, u32::MAX - 1, u32::MAX, u32::MAX);
        assert_eq!(engine.annotate(&base, &far, "x").to_rgba8(), base.to_rgba8());
    }
}
