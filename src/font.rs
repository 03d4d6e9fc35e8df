//! Text rendering for annotation labels and chart captions.
//!
//! Labels are drawn with a TrueType/OpenType font: the configured one, or a
//! common system font when none is configured. A small built-in 5x7 bitmap
//! font is the last resort when no system font can be read.

use std::fmt;
use std::path::Path;

use ab_glyph::FontVec;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::error::SessionError;

/// Rows per bitmap glyph
const GLYPH_ROWS: u32 = 7;

/// Columns per bitmap glyph
const GLYPH_COLS: u32 = 5;

/// Horizontal advance per bitmap glyph, in cells (glyph + 1 cell gap)
const GLYPH_ADVANCE: u32 = GLYPH_COLS + 1;

/// System fonts tried, in order, when no font path is configured
#[cfg(not(target_arch = "wasm32"))]
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/Carlito-Regular.ttf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[cfg(target_arch = "wasm32")]
const SYSTEM_FONT_PATHS: &[&str] = &[];

/// Font used for labels.
#[derive(Default)]
pub enum LabelFont {
    /// Built-in 5x7 bitmap font. Renders upper-cased ASCII.
    #[default]
    Builtin,
    /// Outline font loaded from disk
    Outline(FontVec),
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFont::Builtin => f.write_str("LabelFont::Builtin"),
            LabelFont::Outline(_) => f.write_str("LabelFont::Outline(..)"),
        }
    }
}

impl LabelFont {
    /// Load an outline font from `path`.
    ///
    /// With no path, the first readable system font is used, falling back to
    /// the bitmap font. A configured path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SessionError> {
        let Some(path) = path else {
            return Ok(Self::first_available(SYSTEM_FONT_PATHS));
        };
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)?;
        log::info!("Loaded label font from {:?}", path);
        Ok(LabelFont::Outline(font))
    }

    /// First font in `candidates` that can be read and parsed, else the
    /// bitmap font.
    fn first_available(candidates: &[&str]) -> Self {
        for candidate in candidates {
            let Ok(bytes) = std::fs::read(candidate) else {
                continue;
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    log::info!("🔤 Using system font {}", candidate);
                    return LabelFont::Outline(font);
                }
                Err(e) => log::debug!("Skipping system font {}: {}", candidate, e),
            }
        }
        log::info!("🔤 No system font found, using built-in bitmap font");
        LabelFont::Builtin
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    ///
    /// `size` is the nominal glyph height in pixels. Anything falling outside
    /// the canvas is clipped.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        color: Rgba<u8>,
        x: i32,
        y: i32,
        size: f32,
        text: &str,
    ) {
        match self {
            LabelFont::Builtin => draw_bitmap_text(canvas, color, x, y, cell_size(size), text),
            LabelFont::Outline(font) => draw_text_mut(canvas, color, x, y, size, font, text),
        }
    }

    /// `(width, height)` in pixels that [`LabelFont::draw`] would cover.
    pub fn measure(&self, size: f32, text: &str) -> (u32, u32) {
        match self {
            LabelFont::Builtin => {
                let cell = cell_size(size);
                let chars = text.chars().count() as u32;
                let width = (chars * GLYPH_ADVANCE).saturating_sub(1) * cell;
                (width, GLYPH_ROWS * cell)
            }
            LabelFont::Outline(font) => text_size(size, font, text),
        }
    }
}

/// Pixel size of one bitmap cell for a nominal glyph height.
fn cell_size(size: f32) -> u32 {
    ((size / GLYPH_ROWS as f32).round() as u32).max(1)
}

fn draw_bitmap_text(canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, cell: u32, text: &str) {
    let step = (GLYPH_ADVANCE * cell) as i32;
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x.saturating_add((i as i32).saturating_mul(step));
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                    continue;
                }
                let px = origin_x.saturating_add((col * cell) as i32);
                let py = y.saturating_add((row as u32 * cell) as i32);
                if px >= canvas.width() as i32 || py >= canvas.height() as i32 {
                    continue;
                }
                draw_filled_rect_mut(canvas, Rect::at(px, py).of_size(cell, cell), color);
            }
        }
    }
}

/// 5x7 bitmap for a character, one byte per row, bit 4 leftmost.
/// Lowercase maps to uppercase; unknown characters render as '?'.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn inked(canvas: &RgbaImage) -> Vec<(u32, u32)> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == RED)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_builtin_measure() {
        let font = LabelFont::Builtin;
        // 14px nominal -> 2px cells; 2 glyphs = 11 cells wide, 7 tall
        assert_eq!(font.measure(14.0, "AB"), (22, 14));
        assert_eq!(font.measure(14.0, ""), (0, 14));
    }

    #[test]
    fn test_builtin_draw_stays_in_measured_box() {
        let font = LabelFont::Builtin;
        let mut canvas = RgbaImage::from_pixel(100, 40, WHITE);
        font.draw(&mut canvas, RED, 10, 5, 14.0, "Hi 42");

        let (w, h) = font.measure(14.0, "Hi 42");
        let pixels = inked(&canvas);
        assert!(!pixels.is_empty());
        for (x, y) in pixels {
            assert!(x >= 10 && x < 10 + w, "x={} outside label", x);
            assert!(y >= 5 && y < 5 + h, "y={} outside label", y);
        }
    }

    #[test]
    fn test_builtin_draw_clips_at_edges() {
        let font = LabelFont::Builtin;
        let mut canvas = RgbaImage::from_pixel(20, 20, WHITE);
        // Entirely above the canvas
        font.draw(&mut canvas, RED, 0, -30, 14.0, "TOP");
        assert!(inked(&canvas).is_empty());
        // Partially off the left/top edge
        font.draw(&mut canvas, RED, -5, -5, 14.0, "W");
        assert!(!inked(&canvas).is_empty());
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('~'), glyph('?'));
    }

    #[test]
    fn test_load_without_path_never_fails() {
        // Outline or bitmap depending on the host's fonts
        let font = LabelFont::load(None).expect("font");
        let (w, h) = font.measure(14.0, "car");
        assert!(w > 0 && h > 0);
    }

    #[test]
    fn test_unusable_system_fonts_fall_back_to_builtin() {
        let garbage = std::env::temp_dir().join(format!(
            "region-chat-not-a-font-{}.ttf",
            std::process::id()
        ));
        std::fs::write(&garbage, b"definitely not a font").expect("write");
        let garbage_path = garbage.to_string_lossy().into_owned();

        let font = LabelFont::first_available(&["/nonexistent/font.ttf", &garbage_path]);
        assert!(matches!(font, LabelFont::Builtin));
        assert!(matches!(LabelFont::first_available(&[]), LabelFont::Builtin));

        let _ = std::fs::remove_file(&garbage);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LabelFont::load(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
