//! Deterministic built-in model.
//!
//! The original application drives the pipeline with trained text models.
//! This crate ships a rule-based stand-in so the editor works end to end
//! without model files: block shape decides the heading/body hypothesis
//! scores, and token tags come from configurable word lists plus a few
//! code-shape checks.

use serde::{Deserialize, Serialize};

use super::{Hypothesis, InferenceModel, ModelError};
use crate::inline::Token;

/// Word lists consulted by the tagger. All matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicons {
    /// Words rendered bold.
    pub bold: Vec<String>,
    /// Words rendered italic.
    pub italic: Vec<String>,
    /// Words rendered as inline code, in addition to shape detection.
    pub code: Vec<String>,
}

impl Default for Lexicons {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }
        Self {
            bold: words(&[
                "important",
                "critical",
                "must",
                "never",
                "always",
                "warning",
                "essential",
                "required",
            ]),
            italic: words(&[
                "arguably", "perhaps", "slightly", "somewhat", "roughly", "note",
            ]),
            code: words(&["null", "true", "false", "enum", "struct", "async"]),
        }
    }
}

/// Rule-based classifier and tagger.
#[derive(Debug, Clone, Default)]
pub struct HeuristicModel {
    lexicons: Lexicons,
}

impl HeuristicModel {
    pub fn new(lexicons: Lexicons) -> Self {
        Self { lexicons }
    }

    fn tag_for(&self, token: &Token<'_>) -> &'static str {
        let lower = token.text.to_lowercase();
        if self.lexicons.code.iter().any(|w| *w == lower) || looks_like_code(token.text) {
            "code"
        } else if self.lexicons.bold.iter().any(|w| *w == lower) {
            "bold"
        } else if self.lexicons.italic.iter().any(|w| *w == lower) {
            "italic"
        } else {
            "normal"
        }
    }
}

impl InferenceModel for HeuristicModel {
    fn classify(&self, text: &str, max_hypotheses: usize) -> Result<Vec<Hypothesis>, ModelError> {
        let trimmed = text.trim();
        let words = trimmed.split_whitespace().count();
        let ends_like_sentence = trimmed.ends_with(['.', '!', '?', ',', ';', ':']);
        let starts_upper = trimmed
            .chars()
            .find(|c| c.is_alphabetic())
            .is_some_and(|c| c.is_uppercase());

        // Short, capitalized, unpunctuated blocks read as headings; the
        // fewer the words, the higher the proposed level.
        let mut hypotheses = if words > 0 && words <= 8 && !ends_like_sentence && starts_upper {
            let ranked = match words {
                1..=3 => ["h1", "h2", "h3"],
                4..=5 => ["h2", "h3", "h1"],
                _ => ["h3", "h2", "h1"],
            };
            vec![
                Hypothesis::new(ranked[0], 0.55),
                Hypothesis::new(ranked[1], 0.25),
                Hypothesis::new(ranked[2], 0.12),
                Hypothesis::new("body", 0.08),
            ]
        } else {
            vec![
                Hypothesis::new("body", 0.9),
                Hypothesis::new("h3", 0.05),
                Hypothesis::new("h2", 0.03),
                Hypothesis::new("h1", 0.02),
            ]
        };

        hypotheses.truncate(max_hypotheses);
        Ok(hypotheses)
    }

    fn tag(&self, tokens: &[Token<'_>]) -> Result<Vec<String>, ModelError> {
        Ok(tokens.iter().map(|t| self.tag_for(t).to_string()).collect())
    }
}

/// Shape checks for identifier-like tokens: snake_case, paths, calls,
/// camelCase, and capitalized acronyms with digits.
fn looks_like_code(word: &str) -> bool {
    if word.contains("::") || word.contains("()") {
        return true;
    }
    if word.contains('_') && word.chars().any(|c| c.is_alphanumeric()) {
        return true;
    }
    // camelCase: lowercase start with an uppercase letter later on
    let mut chars = word.chars();
    if chars.next().is_some_and(|c| c.is_lowercase()) && word.chars().skip(1).any(|c| c.is_uppercase()) {
        return true;
    }
    false
}
