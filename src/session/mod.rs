//! Session orchestration.
//!
//! A [`SessionState`] is owned by the calling shell. User events become
//! [`Action`]s which the [`SessionController`] folds into the state, returning
//! a [`Transition`] that lists what changed.

mod action;
mod controller;
mod state;

pub use action::Action;
pub use controller::{ControllerError, SessionController};
pub use state::{SessionState, SessionSummary, StateChange, Transition};

#[cfg(test)]
mod tests;
