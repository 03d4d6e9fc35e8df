//! Global constants for the region chat session

/// Transcript greeting before any image is loaded
pub const WELCOME_MESSAGE: &str = "Upload an image and ask questions about it!";

/// Transcript greeting after an image upload
pub const UPLOADED_MESSAGE: &str = "Image uploaded! What would you like to know about it?";

/// Transcript greeting after the chat is cleared
pub const CLEARED_MESSAGE: &str = "Chat cleared. What would you like to know about the image?";

/// Guidance shown when an action needs an image
pub const NO_IMAGE_MESSAGE: &str = "Please upload an image first.";

/// Label attached to "identify" annotations
pub const IDENTIFY_LABEL: &str = "Object of interest";

/// Reply when the remote service fails for any reason
pub const REMOTE_ERROR_MESSAGE: &str = "Sorry, I encountered an error analyzing the image.";

/// Reply when the remote service succeeds but sends no text
pub const REMOTE_FALLBACK_MESSAGE: &str = "Analysis complete.";

/// Zoom-related constants.
pub mod zoom {
    /// Multiplier applied per zoom step
    pub const STEP: f32 = 1.2;
    /// Lowest allowed zoom factor
    pub const MIN: f32 = 0.5;
    /// Zoom factor after a reset
    pub const DEFAULT: f32 = 1.0;
}

/// Mock backend constants.
pub mod mock {
    /// Categories of the generated analysis chart
    pub const CATEGORIES: [&str; 5] = ["A", "B", "C", "D", "E"];
    /// Smallest generated value (inclusive)
    pub const MIN_VALUE: u32 = 50;
    /// Largest generated value (inclusive)
    pub const MAX_VALUE: u32 = 500;
}

/// Chart rendering constants.
pub mod chart {
    /// Chart title
    pub const TITLE: &str = "Analysis of Selected Region";
    /// X-axis title
    pub const X_LABEL: &str = "Category";
    /// Y-axis title
    pub const Y_LABEL: &str = "Value";
    /// Bar fill (sky blue)
    pub const BAR_COLOR: [u8; 3] = [135, 206, 235];
    /// Axis and text color
    pub const INK_COLOR: [u8; 3] = [40, 40, 40];
    /// Background color
    pub const BACKGROUND: [u8; 3] = [255, 255, 255];
}

/// Default upload limit (20 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Default remote request timeout in seconds
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;
