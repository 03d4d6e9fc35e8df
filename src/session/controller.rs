//! Session controller: applies user actions to a [`SessionState`].
//!
//! Each handler takes the state by value and returns a [`Transition`] with
//! the new state and the list of parts that changed. Handlers never fail:
//! invalid input turns into a system message and leaves everything else as
//! it was.

use image::DynamicImage;
use web_time::Instant;

use super::action::Action;
use super::state::{SessionState, StateChange, Transition};
use crate::annotation::AnnotationEngine;
use crate::config::AppConfig;
use crate::constants::{
    CLEARED_MESSAGE, DEFAULT_MAX_UPLOAD_BYTES, NO_IMAGE_MESSAGE, UPLOADED_MESSAGE,
};
use crate::error::SessionError;
use crate::image_store::decode_upload;
use crate::model::{ChatMessage, Rectangle};
use crate::response::{RemoteError, ResponseEngine, build_engine};
use crate::zoom::ZoomLevel;

/// Orchestrates the image store, selection tracker, response engine,
/// annotation engine, chart payload and transcript.
pub struct SessionController {
    engine: Box<dyn ResponseEngine>,
    annotator: AnnotationEngine,
    max_upload_bytes: usize,
}

impl SessionController {
    pub fn new(engine: Box<dyn ResponseEngine>, annotator: AnnotationEngine) -> Self {
        Self {
            engine,
            annotator,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Build a controller with the engine and annotation style from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ControllerError> {
        let engine = build_engine(&config.backend)?;
        let annotator = AnnotationEngine::from_config(&config.annotation)?;
        Ok(Self::new(engine, annotator).with_max_upload_bytes(config.preferences.max_upload_bytes))
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn annotator(&self) -> &AnnotationEngine {
        &self.annotator
    }

    /// Apply any action.
    pub fn update(&self, state: SessionState, action: Action) -> Transition {
        log::trace!("update: {}", action.name());
        match action {
            Action::Upload(image) => self.upload(state, image),
            Action::UploadBytes(bytes) => self.upload_bytes(state, &bytes),
            Action::CreateSelection(rect) => self.create_selection(state, rect),
            Action::SelectDefault => self.select_default(state),
            Action::Ask(question) => self.ask(state, &question),
            Action::ClearChat => self.clear_chat(state),
            Action::ZoomIn => self.zoom_in(state),
            Action::ZoomOut => self.zoom_out(state),
            Action::ZoomReset => self.zoom_reset(state),
        }
    }

    /// Install a new image and reset everything derived from the old one.
    pub fn upload(&self, mut state: SessionState, image: DynamicImage) -> Transition {
        log::info!("📷 Image uploaded: {}x{}", image.width(), image.height());
        state.images.reset(image);
        state.selections.clear();
        state.chart.clear();
        state.chat.reset(UPLOADED_MESSAGE);

        let mut t = Transition::new(state);
        for change in [
            StateChange::Image,
            StateChange::Annotation,
            StateChange::Selection,
            StateChange::History,
            StateChange::Chart,
            StateChange::Transcript,
        ] {
            t.mark(change);
        }
        t
    }

    /// Decode raw file content and upload it. A rejected file only adds a
    /// system message explaining why.
    pub fn upload_bytes(&self, mut state: SessionState, bytes: &[u8]) -> Transition {
        match decode_upload(bytes, self.max_upload_bytes) {
            Ok(image) => self.upload(state, image),
            Err(e) => {
                log::warn!("Upload rejected: {}", e);
                state
                    .chat
                    .push(ChatMessage::system(format!("Could not load image: {}", e)));
                let mut t = Transition::new(state);
                t.mark(StateChange::Transcript);
                t
            }
        }
    }

    /// Make `rect` the active selection and add it to the history.
    pub fn create_selection(&self, mut state: SessionState, rect: Rectangle) -> Transition {
        let Some((width, height)) = state.images.dimensions() else {
            return Self::system_note(state, NO_IMAGE_MESSAGE);
        };
        if let Err(e) = rect.validate(width, height) {
            log::debug!("🚫 Selection rejected: {}", e);
            return Self::system_note(state, format!("{}.", e));
        }

        state.selections.set_active(rect);
        let grew = state.selections.record_history(rect);
        state.chat.push(ChatMessage::system(format!(
            "Area selected {}. You can now ask questions about this specific region.",
            rect
        )));
        log::debug!("🔲 Selection set: {}", rect);

        let mut t = Transition::new(state);
        t.mark(StateChange::Selection);
        if grew {
            t.mark(StateChange::History);
        }
        t.mark(StateChange::Transcript);
        t
    }

    /// Select the central half of the image in each direction.
    pub fn select_default(&self, state: SessionState) -> Transition {
        match state.images.dimensions() {
            Some((width, height)) => {
                self.create_selection(state, Rectangle::default_for(width, height))
            }
            None => Self::system_note(state, NO_IMAGE_MESSAGE),
        }
    }

    /// Ask the response engine and apply whatever it returns.
    pub fn ask(&self, mut state: SessionState, question: &str) -> Transition {
        let question = question.trim();
        if question.is_empty() {
            return Transition::new(state);
        }

        state.chat.push(ChatMessage::user(question));
        let mut changes = vec![StateChange::Transcript];

        let started = Instant::now();
        let response = self.engine.evaluate(
            question,
            state.selections.active(),
            state.images.original(),
        );
        log::debug!(
            "🤖 {} engine answered in {:.1} ms",
            self.engine.name(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        if let Some(data) = response.chart_data {
            state.chart.set_dataset(data);
            changes.push(StateChange::Chart);
        }

        let mut rejected = None;
        if let Some(annotation) = response.annotation {
            if let Some(original) = state.images.original() {
                match annotation.rect.validate(original.width(), original.height()) {
                    Ok(()) => {
                        let annotated =
                            self.annotator
                                .annotate(original, &annotation.rect, &annotation.label);
                        state.images.set_annotated(annotated);
                        changes.push(StateChange::Annotation);
                        if state.selections.record_history(annotation.rect) {
                            changes.push(StateChange::History);
                        }
                    }
                    Err(e) => {
                        log::warn!("Ignoring annotation from {} engine: {}", self.engine.name(), e);
                        rejected = Some(format!("Annotation not drawn. {}.", e));
                    }
                }
            }
        }

        state.chat.push(ChatMessage::assistant(response.text));
        if let Some(note) = rejected {
            state.chat.push(ChatMessage::system(note));
        }

        let mut t = Transition::new(state);
        for change in changes {
            t.mark(change);
        }
        t
    }

    /// Reset the transcript to a single system message.
    pub fn clear_chat(&self, mut state: SessionState) -> Transition {
        state.chat.reset(CLEARED_MESSAGE);
        log::debug!("🗑️ Chat cleared");
        let mut t = Transition::new(state);
        t.mark(StateChange::Transcript);
        t
    }

    pub fn zoom_in(&self, state: SessionState) -> Transition {
        let next = state.zoom.zoom_in();
        log::debug!("🔍 Zoom in: {:.2}x", next.factor());
        Self::set_zoom(state, next)
    }

    pub fn zoom_out(&self, state: SessionState) -> Transition {
        let next = state.zoom.zoom_out();
        log::debug!("🔍 Zoom out: {:.2}x", next.factor());
        Self::set_zoom(state, next)
    }

    pub fn zoom_reset(&self, state: SessionState) -> Transition {
        log::debug!("🔄 Zoom reset");
        Self::set_zoom(state, ZoomLevel::reset())
    }

    fn set_zoom(mut state: SessionState, next: ZoomLevel) -> Transition {
        let changed = state.zoom != next;
        state.zoom = next;
        let mut t = Transition::new(state);
        if changed {
            t.mark(StateChange::Zoom);
        }
        t
    }

    fn system_note(mut state: SessionState, text: impl Into<String>) -> Transition {
        state.chat.push(ChatMessage::system(text));
        let mut t = Transition::new(state);
        t.mark(StateChange::Transcript);
        t
    }
}

/// Errors building a controller from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Response engine could not be created
    #[error("Response engine: {0}")]
    Engine(#[from] RemoteError),

    /// Annotation engine could not be created (e.g. bad font)
    #[error("Annotation engine: {0}")]
    Annotation(#[from] SessionError),
}
