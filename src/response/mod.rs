//! Response engines: turn a question about an image into a reply.
//!
//! An engine only *describes* what should happen (text, chart data, an
//! annotation to draw); the session controller applies those effects.
//! Two implementations exist: [`MockResponseEngine`] with canned answers and
//! [`RemoteResponseEngine`] which asks an HTTP analysis service.

mod mock;
mod remote;

pub use mock::{ANALYZE_REPLY, GENERIC_REPLY, IDENTIFY_REPLY, MockResponseEngine};
pub use remote::{RemoteError, RemoteResponseEngine};

use image::DynamicImage;

use crate::config::{BackendConfig, BackendKind};
use crate::model::{ChartDataset, Rectangle};

/// Instruction to draw a labelled rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInstruction {
    pub rect: Rectangle,
    pub label: String,
}

impl AnnotationInstruction {
    pub fn new(rect: Rectangle, label: impl Into<String>) -> Self {
        Self {
            rect,
            label: label.into(),
        }
    }
}

/// Structured reply to a question.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Assistant text for the transcript
    pub text: String,
    /// Replacement chart dataset, if the reply includes one
    pub chart_data: Option<ChartDataset>,
    /// Annotation to draw on the original image, if any
    pub annotation: Option<AnnotationInstruction>,
}

impl Response {
    /// Plain text reply with no side effects.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chart_data: None,
            annotation: None,
        }
    }

    pub fn with_chart(mut self, data: ChartDataset) -> Self {
        self.chart_data = Some(data);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstruction) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

/// Something that can answer questions about an image.
///
/// `evaluate` must not mutate session state; apart from randomness in the
/// mock it is a function of its three inputs.
pub trait ResponseEngine {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Answer `question` about `image`, optionally focused on `selection`.
    fn evaluate(
        &self,
        question: &str,
        selection: Option<&Rectangle>,
        image: Option<&DynamicImage>,
    ) -> Response;
}

/// Build the engine selected in the backend config.
pub fn build_engine(config: &BackendConfig) -> Result<Box<dyn ResponseEngine>, RemoteError> {
    let engine: Box<dyn ResponseEngine> = match config.kind {
        BackendKind::Mock => match config.seed {
            Some(seed) => Box::new(MockResponseEngine::with_seed(seed)),
            None => Box::new(MockResponseEngine::new()),
        },
        BackendKind::Remote => Box::new(RemoteResponseEngine::from_config(config)?),
    };
    log::info!("Using '{}' response engine", engine.name());
    Ok(engine)
}

/// Case-insensitive substring test used by the matching policy.
pub(crate) fn mentions(question: &str, keyword: &str) -> bool {
    question.to_lowercase().contains(keyword)
}
