//! Session state value object and change reporting.

use image::DynamicImage;
use serde::Serialize;

use crate::chart::ChartPayload;
use crate::constants::WELCOME_MESSAGE;
use crate::image_store::ImageStore;
use crate::model::{ChartDataset, ChatSession, Rectangle, SelectionTracker};
use crate::zoom::ZoomLevel;

/// Everything one user session knows about.
///
/// Owned by the calling shell and threaded through every controller action;
/// there is no ambient/global state.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub images: ImageStore,
    pub selections: SelectionTracker,
    pub chat: ChatSession,
    pub chart: ChartPayload,
    pub zoom: ZoomLevel,
}

impl SessionState {
    /// Fresh session with no image and the welcome message.
    pub fn new() -> Self {
        Self {
            images: ImageStore::new(),
            selections: SelectionTracker::new(),
            chat: ChatSession::new(WELCOME_MESSAGE),
            chart: ChartPayload::new(),
            zoom: ZoomLevel::default(),
        }
    }

    pub fn has_image(&self) -> bool {
        self.images.has_image()
    }

    pub fn active_selection(&self) -> Option<&Rectangle> {
        self.selections.active()
    }

    /// Image to render: annotated if present, otherwise the original.
    pub fn display_image(&self) -> Option<&DynamicImage> {
        self.images.display()
    }

    /// Plain-data summary suitable for JSON export.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            image_size: self.images.dimensions(),
            annotated: self.images.annotated().is_some(),
            active_selection: self.selections.active().copied(),
            selection_history: self.selections.history().to_vec(),
            chart: self.chart.data().cloned(),
            zoom: self.zoom.factor(),
            transcript: self.chat.clone(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of a session, without pixel data.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// `(width, height)` of the uploaded image
    pub image_size: Option<(u32, u32)>,
    /// Whether an annotation overlay exists
    pub annotated: bool,
    pub active_selection: Option<Rectangle>,
    pub selection_history: Vec<Rectangle>,
    pub chart: Option<ChartDataset>,
    pub zoom: f32,
    pub transcript: ChatSession,
}

impl SessionSummary {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A part of [`SessionState`] touched by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChange {
    /// Original image replaced
    Image,
    /// Annotated image replaced or cleared
    Annotation,
    /// Active selection changed
    Selection,
    /// Selection history changed
    History,
    /// Chart dataset replaced or cleared
    Chart,
    /// Transcript changed
    Transcript,
    /// Zoom factor changed
    Zoom,
}

/// Result of an action: the new state and what changed in it.
///
/// The presentation layer redraws only the listed parts.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: SessionState,
    pub changes: Vec<StateChange>,
}

impl Transition {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            changes: Vec::new(),
        }
    }

    /// Record a change once, keeping first-seen order.
    pub fn mark(&mut self, change: StateChange) {
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    pub fn changed(&self, change: StateChange) -> bool {
        self.changes.contains(&change)
    }

    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}
