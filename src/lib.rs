//! Region Chat - ask questions about images and regions of them
//!
//! A session engine for image question answering: upload an image, select a
//! rectangle, ask about it, and get back text, a bar chart dataset, or an
//! annotated copy of the image. Answers come from a pluggable
//! [`ResponseEngine`](response::ResponseEngine): a keyword-matching mock or an
//! HTTP analysis service.

pub mod annotation;
pub mod chart;
pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod image_store;
pub mod model;
pub mod response;
pub mod session;
pub mod shell;
pub mod zoom;

pub use annotation::AnnotationEngine;
pub use chart::ChartPayload;
pub use config::AppConfig;
pub use error::SessionError;
pub use image_store::ImageStore;
pub use model::{ChartDataset, ChatMessage, ChatSession, Rectangle, Role, SelectionTracker};
pub use response::{MockResponseEngine, RemoteResponseEngine, Response, ResponseEngine};
pub use session::{Action, SessionController, SessionState, StateChange, Transition};
