//! Data models for the image chat session.

mod chart;
mod chat;
mod selection;

pub use chart::{ChartDataset, ChartEntry};
pub use chat::{ChatMessage, ChatSession, Role};
pub use selection::{Rectangle, SelectionTracker};
