//! Unit tests for the session controller.
//!
//! Shared fixtures live here; each file covers one group of actions.

mod ask_tests;

use image::{DynamicImage, Rgba, RgbaImage};

use super::{SessionController, SessionState};
use crate::annotation::AnnotationEngine;
use crate::response::MockResponseEngine;

/// Controller backed by a seeded mock engine and the default annotation style.
fn controller() -> SessionController {
    SessionController::new(
        Box::new(MockResponseEngine::with_seed(7)),
        AnnotationEngine::default(),
    )
}

/// Solid grey test image.
fn grey_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([128, 128, 128, 255]),
    ))
}

/// Fresh session with an 800x600 image uploaded.
fn uploaded(controller: &SessionController) -> SessionState {
    controller
        .upload(SessionState::new(), grey_image(800, 600))
        .state
}

/// Text of the last transcript message.
fn last_text(state: &SessionState) -> &str {
    state.chat.last().map(|m| m.text.as_str()).unwrap_or("")
}
