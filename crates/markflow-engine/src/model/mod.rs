//! The capability seam: block classification and token tagging models.
//!
//! The pipeline treats both models as black boxes behind [`InferenceModel`]
//! so the test suite can substitute deterministic stubs and the CLI can ship
//! the built-in [`HeuristicModel`] instead of depending on trained models.
//! Label and tag names cross this boundary as raw strings: a model is free
//! to return names the pipeline does not recognize, and unrecognized names
//! are skipped rather than treated as errors.

pub mod heuristic;

pub use heuristic::{HeuristicModel, Lexicons};

use crate::inline::Token;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("tagger returned {got} tags for {expected} tokens")]
    TagArity { expected: usize, got: usize },
}

/// One candidate label with its confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub label: String,
    pub score: f64,
}

impl Hypothesis {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Black-box classification and tagging capability.
///
/// Both methods are synchronous blocking calls; the pipeline invokes them on
/// the edit-event path and recovers locally from any failure by leaving the
/// text as typed.
pub trait InferenceModel {
    /// Returns ranked label hypotheses for a text block, at most
    /// `max_hypotheses` of them. May return an empty set.
    fn classify(&self, text: &str, max_hypotheses: usize) -> Result<Vec<Hypothesis>, ModelError>;

    /// Returns one tag name per input token, in token order.
    fn tag(&self, tokens: &[Token<'_>]) -> Result<Vec<String>, ModelError>;
}
