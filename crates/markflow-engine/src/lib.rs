//! Core inference pipeline for markflow: incremental block segmentation,
//! stateful heading classification, and inline span annotation over a live
//! text buffer.

pub mod blocks;
pub mod classify;
pub mod editing;
pub mod inline;
pub mod model;

// Re-export key types for easier usage
pub use blocks::{Block, count_valid, join, segment};
pub use classify::{HeadingState, Label};
pub use editing::{EditOutcome, Session};
pub use model::{HeuristicModel, Hypothesis, InferenceModel, Lexicons, ModelError};
