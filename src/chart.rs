//! Bar chart payload and rasterisation.
//!
//! The chart is a pure function of the current [`ChartDataset`]: every
//! analysis replaces the dataset wholesale and the raster is redrawn from
//! scratch.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::config::ChartConfig;
use crate::constants::chart;
use crate::font::LabelFont;
use crate::model::ChartDataset;

/// Plot margins in pixels
const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 70;

/// Caption heights in pixels
const TITLE_SIZE: f32 = 21.0;
const AXIS_SIZE: f32 = 14.0;
const VALUE_SIZE: f32 = 14.0;

/// Fraction of each category slot filled by its bar
const BAR_FILL: f32 = 0.8;

/// Holds the dataset shown in the analysis chart, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPayload {
    data: Option<ChartDataset>,
}

impl ChartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole dataset.
    ///
    /// `categories` and `values` are expected to have the same length and
    /// unique categories; extra items in the longer list are dropped.
    pub fn set_data<S: Into<String>>(
        &mut self,
        categories: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = f64>,
    ) {
        self.data = Some(ChartDataset::from_columns(categories, values));
    }

    /// Replace the whole dataset with a prepared one.
    pub fn set_dataset(&mut self, data: ChartDataset) {
        self.data = Some(data);
    }

    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn data(&self) -> Option<&ChartDataset> {
        self.data.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.data.is_some()
    }

    /// Render the current dataset, or None when no chart is set.
    pub fn render(&self, config: &ChartConfig, font: &LabelFont) -> Option<RgbaImage> {
        self.data
            .as_ref()
            .map(|data| render_bar_chart(data, config, font))
    }
}

/// Draw a bar chart with one bar per entry, in order, each topped with its value.
pub fn render_bar_chart(data: &ChartDataset, config: &ChartConfig, font: &LabelFont) -> RgbaImage {
    let width = config.width.max(MARGIN_LEFT + MARGIN_RIGHT + 1);
    let height = config.height.max(MARGIN_TOP + MARGIN_BOTTOM + 1);
    let mut canvas = RgbaImage::from_pixel(width, height, rgba(chart::BACKGROUND));
    let ink = rgba(chart::INK_COLOR);

    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = (MARGIN_TOP + plot_h) as i32;

    // Title, centered
    let (title_w, _) = font.measure(TITLE_SIZE, chart::TITLE);
    font.draw(
        &mut canvas,
        ink,
        centered(0, width, title_w),
        (MARGIN_TOP / 4) as i32,
        TITLE_SIZE,
        chart::TITLE,
    );

    // Axes
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(MARGIN_LEFT as i32, MARGIN_TOP as i32).of_size(1, plot_h + 1),
        ink,
    );
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(MARGIN_LEFT as i32, baseline).of_size(plot_w, 1),
        ink,
    );

    // Axis titles
    let (x_title_w, _) = font.measure(AXIS_SIZE, chart::X_LABEL);
    font.draw(
        &mut canvas,
        ink,
        centered(MARGIN_LEFT, plot_w, x_title_w),
        (height - MARGIN_BOTTOM / 3) as i32 - AXIS_SIZE as i32,
        AXIS_SIZE,
        chart::X_LABEL,
    );
    font.draw(
        &mut canvas,
        ink,
        4,
        (MARGIN_TOP + plot_h / 2) as i32,
        AXIS_SIZE,
        chart::Y_LABEL,
    );

    if data.is_empty() {
        return canvas;
    }

    // Leave headroom above the tallest bar for its value label
    let max_value = data.max_value();
    let scale = if max_value > 0.0 {
        (plot_h as f64 * 0.9) / max_value
    } else {
        0.0
    };
    let slot_w = plot_w / data.len() as u32;
    let bar_w = ((slot_w as f32 * BAR_FILL) as u32).max(1);
    let bar_color = rgba(chart::BAR_COLOR);

    for (i, entry) in data.entries().iter().enumerate() {
        let slot_x = MARGIN_LEFT + i as u32 * slot_w;
        let bar_x = slot_x + (slot_w.saturating_sub(bar_w)) / 2;
        let bar_h = (entry.value.max(0.0) * scale).round() as u32;

        if bar_h > 0 {
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(bar_x as i32, baseline - bar_h as i32).of_size(bar_w, bar_h),
                bar_color,
            );
        }

        // Value on top of the bar
        let value_text = format_value(entry.value);
        let (value_w, value_h) = font.measure(VALUE_SIZE, &value_text);
        font.draw(
            &mut canvas,
            ink,
            centered(bar_x, bar_w, value_w),
            baseline - bar_h as i32 - value_h as i32 - 3,
            VALUE_SIZE,
            &value_text,
        );

        // Category tick label
        let (cat_w, _) = font.measure(AXIS_SIZE, &entry.category);
        font.draw(
            &mut canvas,
            ink,
            centered(slot_x, slot_w, cat_w),
            baseline + 8,
            AXIS_SIZE,
            &entry.category,
        );
    }

    log::debug!("📊 Rendered chart with {} bars ({}x{})", data.len(), width, height);
    canvas
}

/// Whole numbers print without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn centered(start: u32, span: u32, content: u32) -> i32 {
    start as i32 + (span as i32 - content as i32) / 2
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}
