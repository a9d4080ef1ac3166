use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::spans::{Tag, apply_spans, merge_spans};
use super::tokens::tokenize;
use crate::model::{InferenceModel, ModelError};

/// Patterns that indicate a block already carries markdown syntax. Blocks
/// matching any of these are left alone to avoid double-marking content the
/// user formatted by hand.
static MARKDOWN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\#{1,6}\s",                  // headings
        r"\*{1,2}[^*]+\*{1,2}",        // bold and italic
        r"_[^_]+_",                    // underscore italic
        r"!\[[^\]]+\]\([^)]+\)",       // images
        r"\[[^\]]+\]\([^)]+\)",        // links
        r"`[^`]+`",                    // inline code
    ]
    .iter()
    .map(|p| Regex::new(p).expect("markdown pattern is valid"))
    .collect()
});

/// Whether the text already contains recognizable markdown syntax.
pub fn contains_markdown(text: &str) -> bool {
    MARKDOWN_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Runs the token tagger over a body block and wraps non-normal spans with
/// their markdown delimiter pair.
///
/// Returns `Ok(Some(rewritten))` when at least one span was inserted,
/// `Ok(None)` when the block is left exactly as typed (already marked up, or
/// nothing to tag). Adjacent same-tagged tokens are merged first so
/// multi-word phrases become one wrapped unit.
pub fn annotate<M: InferenceModel>(model: &M, block: &str) -> Result<Option<String>, ModelError> {
    if contains_markdown(block) {
        debug!("block already contains markdown, skipping annotation");
        return Ok(None);
    }

    let tokens = tokenize(block);
    if tokens.is_empty() {
        return Ok(None);
    }

    let tags = model.tag(&tokens)?;
    if tags.len() != tokens.len() {
        return Err(ModelError::TagArity {
            expected: tokens.len(),
            got: tags.len(),
        });
    }

    // Keep only tokens with a recognized non-normal tag, in original order.
    let tagged: Vec<_> = tokens
        .iter()
        .zip(&tags)
        .filter_map(|(token, name)| Tag::from_name(name).map(|tag| (token.range.clone(), tag)))
        .collect();

    if tagged.is_empty() {
        return Ok(None);
    }

    let spans = merge_spans(&tagged);
    debug!(spans = spans.len(), "inserting inline markup");
    Ok(Some(apply_spans(block, &spans)))
}
