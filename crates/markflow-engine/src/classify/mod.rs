//! Stateful block classification with the heading-level ratchet.

use tracing::debug;

use crate::model::{InferenceModel, ModelError};

/// Maximum label hypotheses requested from the classifier model.
pub const MAX_HYPOTHESES: usize = 4;

/// The label assigned to a completed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    H1,
    H2,
    H3,
    Body,
}

impl Label {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "h1" => Some(Label::H1),
            "h2" => Some(Label::H2),
            "h3" => Some(Label::H3),
            "body" => Some(Label::Body),
            _ => None,
        }
    }

    /// Markdown heading marker, without the delimiting space. `None` for body.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Label::H1 => Some("#"),
            Label::H2 => Some("##"),
            Label::H3 => Some("###"),
            Label::Body => None,
        }
    }
}

/// Which heading levels have been used in this session.
///
/// A monotonic ratchet: h2 is only reachable once h1 has been used, h3 once
/// both h1 and h2 have. Levels cannot be unused again except by clearing the
/// whole document, which resets the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingState {
    pub h1_used: bool,
    pub h2_used: bool,
    pub h3_used: bool,
}

impl HeadingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the ratchet. Called when the document buffer becomes empty.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the ratchet admits this label right now.
    fn admits(&self, label: Label) -> bool {
        match label {
            Label::H1 => !self.h1_used,
            // h2 stays reassignable within a session as long as h1 precedes
            Label::H2 => self.h1_used,
            Label::H3 => self.h1_used && self.h2_used,
            Label::Body => true,
        }
    }

    fn mark(&mut self, label: Label) {
        match label {
            Label::H1 => self.h1_used = true,
            Label::H2 => self.h2_used = true,
            Label::H3 => self.h3_used = true,
            Label::Body => {}
        }
    }
}

/// Classifies a block against the model's ranked hypotheses under the
/// heading ratchet.
///
/// Hypotheses are sorted by descending score and walked in order; the first
/// label the ratchet admits wins and is marked as used. Unknown label names
/// are skipped. An empty hypothesis set, or no admitted candidate, falls
/// open to [`Label::Body`]. Model failures propagate so the caller can leave
/// the block exactly as typed.
pub fn classify<M: InferenceModel>(
    model: &M,
    block: &str,
    state: &mut HeadingState,
) -> Result<Label, ModelError> {
    let mut hypotheses = model.classify(block, MAX_HYPOTHESES)?;
    if hypotheses.is_empty() {
        return Ok(Label::Body);
    }

    hypotheses.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hypotheses.truncate(MAX_HYPOTHESES);

    for hypothesis in &hypotheses {
        let Some(label) = Label::from_name(&hypothesis.label) else {
            continue;
        };
        if state.admits(label) {
            debug!(label = %hypothesis.label, score = hypothesis.score, "label accepted");
            state.mark(label);
            return Ok(label);
        }
    }

    Ok(Label::Body)
}
