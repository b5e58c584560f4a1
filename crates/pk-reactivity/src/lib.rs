//! pk-reactivity: external reactivity insertions and temperature feedback.
//!
//! Provides:
//! - `ReactivityInsertion`: closed set of time-dependent insertion shapes
//! - `FeedbackComposer`: external insertion plus temperature feedback relative to
//!   reference temperatures captured once at the feedback-activation step

pub mod error;
pub mod feedback;
pub mod insertion;

// Re-exports for ergonomics
pub use error::{ReactivityError, ReactivityResult};
pub use feedback::{FeedbackComposer, FeedbackTerm};
pub use insertion::ReactivityInsertion;
