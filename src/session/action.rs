//! User actions understood by the session controller.
//!
//! Every user event is represented as an action in the Elm architecture style:
//! the controller folds an action into the current state and returns the next.

use image::DynamicImage;

use crate::model::Rectangle;

/// Actions that can be applied to a session.
#[derive(Debug, Clone)]
pub enum Action {
    /// New image decoded from an upload
    Upload(DynamicImage),
    /// Raw uploaded file content, sniffed and decoded by the controller
    UploadBytes(Vec<u8>),
    /// Select a region of the image
    CreateSelection(Rectangle),
    /// Select the central region of the image
    SelectDefault,
    /// Ask a question about the image / selection
    Ask(String),
    /// Reset the transcript
    ClearChat,
    /// Zoom in by one step
    ZoomIn,
    /// Zoom out by one step
    ZoomOut,
    /// Reset zoom to 1.0
    ZoomReset,
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Upload(_) => "upload",
            Action::UploadBytes(_) => "upload-bytes",
            Action::CreateSelection(_) => "select",
            Action::SelectDefault => "select-default",
            Action::Ask(_) => "ask",
            Action::ClearChat => "clear-chat",
            Action::ZoomIn => "zoom-in",
            Action::ZoomOut => "zoom-out",
            Action::ZoomReset => "zoom-reset",
        }
    }
}
