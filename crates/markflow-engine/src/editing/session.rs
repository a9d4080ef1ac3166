use tracing::{debug, trace};
use xi_rope::Rope;

use crate::blocks::{Block, count_valid, join, segment};
use crate::classify::{HeadingState, Label, classify};
use crate::editing::EditOutcome;
use crate::inline::annotate;
use crate::model::InferenceModel;

/// One editing session over a single document buffer.
///
/// The session is the sole owner of the buffer; only [`Session::observe`]
/// mutates it. Only the buffer and the heading ratchet persist across
/// events — blocks, hypotheses, and spans are built fresh per event and
/// discarded.
///
/// The widget layer must report *every* buffer mutation through `observe`,
/// including the one it performs to display a rewritten outcome: that echo
/// event is what consumes the suppression flag and keeps pipeline rewrites
/// from being re-processed as user edits.
pub struct Session<M> {
    buffer: Rope,
    headings: HeadingState,
    suppress_next: bool,
    annotate_inline: bool,
    model: M,
}

impl<M: InferenceModel> Session<M> {
    pub fn new(model: M) -> Self {
        Self {
            buffer: Rope::from(""),
            headings: HeadingState::new(),
            suppress_next: false,
            annotate_inline: true,
            model,
        }
    }

    /// Current buffer content.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Current heading ratchet state.
    pub fn heading_state(&self) -> HeadingState {
        self.headings
    }

    /// Enables or disables the inline span annotator. Heading classification
    /// is unaffected.
    pub fn set_inline_annotation(&mut self, enabled: bool) {
        self.annotate_inline = enabled;
    }

    /// Processes one text-change event and returns the resulting buffer.
    ///
    /// The old text is the session's current buffer; `new_text` is the
    /// buffer after the user's (or the widget's) mutation.
    pub fn observe(&mut self, new_text: &str) -> EditOutcome {
        let old_text = self.buffer.to_string();

        // Reset happens before the suppression check: clearing the buffer
        // always clears the ratchet, even on a self-triggered event.
        if new_text.is_empty() {
            self.headings.reset();
            debug!("buffer cleared, heading ratchet reset");
        }

        if self.suppress_next {
            self.suppress_next = false;
            trace!("self-triggered change consumed, skipping");
            return self.adopt(new_text);
        }

        if new_text.is_empty() || !paragraph_boundary(new_text) {
            return self.adopt(new_text);
        }

        let old_blocks = segment(&old_text);
        let mut new_blocks = segment(new_text);

        // The enter keystroke itself may transiently drop the in-progress
        // block from the count, hence the off-by-one threshold.
        let block_added = count_valid(&new_blocks) + 1 > count_valid(&old_blocks);
        let candidate = match new_blocks.last() {
            Some(Block::Text(t)) if block_added && !t.trim().is_empty() => t.clone(),
            _ => return self.adopt(new_text),
        };

        debug!(block = %candidate, "paragraph boundary completed");
        let (modified, label) = self.modify_block(&candidate);

        if let Some(Block::Text(slot)) = new_blocks.last_mut() {
            *slot = modified;
        }
        let joined = join(&new_blocks);
        let rewritten = joined != new_text;
        self.buffer = Rope::from(joined.as_str());

        EditOutcome {
            text: joined,
            rewritten,
            label,
        }
    }

    /// Adopts the new text without pipeline processing.
    fn adopt(&mut self, new_text: &str) -> EditOutcome {
        self.buffer = Rope::from(new_text);
        EditOutcome::unchanged(new_text)
    }

    /// Classifies one block and applies the label: heading markers are
    /// prefixed, body blocks go through the inline annotator. Any model
    /// failure leaves the block exactly as typed.
    fn modify_block(&mut self, block: &str) -> (String, Option<Label>) {
        match classify(&self.model, block, &mut self.headings) {
            Ok(Label::Body) => {
                if !self.annotate_inline {
                    return (block.to_string(), Some(Label::Body));
                }
                match annotate(&self.model, block) {
                    Ok(Some(rewritten)) => {
                        self.suppress_next = true;
                        (rewritten, Some(Label::Body))
                    }
                    Ok(None) => (block.to_string(), Some(Label::Body)),
                    Err(err) => {
                        debug!(%err, "tagging failed, leaving block as typed");
                        (block.to_string(), None)
                    }
                }
            }
            Ok(label) => {
                let marker = label.marker().unwrap_or_default();
                self.suppress_next = true;
                (format!("{marker} {block}"), Some(label))
            }
            Err(err) => {
                debug!(%err, "classification failed, leaving block as typed");
                (block.to_string(), None)
            }
        }
    }
}

/// Whether the last edit just completed a paragraph: the text ends with a
/// newline and the character before it is not one (a second consecutive
/// blank line does not fire).
fn paragraph_boundary(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes {
        [] => false,
        [.., prev, b'\n'] => *prev != b'\n',
        [b'\n'] => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::Token;
    use crate::model::{Hypothesis, ModelError};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Model answering from pre-scripted queues; runs dry into errors.
    #[derive(Default)]
    struct Scripted {
        hypotheses: RefCell<VecDeque<Vec<Hypothesis>>>,
        tags: RefCell<VecDeque<Vec<&'static str>>>,
    }

    impl Scripted {
        fn expect_classify(self, pairs: &[(&str, f64)]) -> Self {
            self.hypotheses
                .borrow_mut()
                .push_back(pairs.iter().map(|(l, s)| Hypothesis::new(*l, *s)).collect());
            self
        }

        fn expect_tags(self, tags: &[&'static str]) -> Self {
            self.tags.borrow_mut().push_back(tags.to_vec());
            self
        }
    }

    impl InferenceModel for Scripted {
        fn classify(&self, _text: &str, max: usize) -> Result<Vec<Hypothesis>, ModelError> {
            let mut set = self
                .hypotheses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ModelError::Unavailable("script exhausted".to_string()))?;
            set.truncate(max);
            Ok(set)
        }

        fn tag(&self, _tokens: &[Token<'_>]) -> Result<Vec<String>, ModelError> {
            self.tags
                .borrow_mut()
                .pop_front()
                .map(|tags| tags.iter().map(|t| t.to_string()).collect())
                .ok_or_else(|| ModelError::Unavailable("script exhausted".to_string()))
        }
    }

    #[test]
    fn boundary_requires_exactly_one_trailing_newline() {
        assert!(paragraph_boundary("block\n"));
        assert!(paragraph_boundary("\n"));
        assert!(!paragraph_boundary("block\n\n"));
        assert!(!paragraph_boundary("block"));
        assert!(!paragraph_boundary(""));
    }

    #[test]
    fn heading_is_prefixed_and_ratchet_advances() {
        let model = Scripted::default().expect_classify(&[("h1", 0.9), ("body", 0.1)]);
        let mut session = Session::new(model);

        let outcome = session.observe("Introduction\n");
        assert_eq!(outcome.text, "# Introduction\n");
        assert!(outcome.rewritten);
        assert_eq!(outcome.label, Some(Label::H1));
        assert!(session.heading_state().h1_used);
    }

    #[test]
    fn echo_event_is_suppressed_once() {
        let model = Scripted::default().expect_classify(&[("h1", 0.9)]);
        let mut session = Session::new(model);

        let outcome = session.observe("Title\n");
        assert_eq!(outcome.text, "# Title\n");

        // The widget echoes the rewrite; the script is exhausted, so any
        // classification attempt here would come back as a model error and
        // leave the text as typed. Suppression must skip it entirely.
        let echo = session.observe("# Title\n");
        assert!(!echo.rewritten);
        assert_eq!(echo.text, "# Title\n");

        // The next real event is processed again; the exhausted script
        // errors out and degrades to leaving the new block as typed.
        let next = session.observe("# Title\n\nmore\n");
        assert_eq!(next.text, "# Title\n\nmore\n");
    }

    #[test]
    fn no_boundary_means_no_processing() {
        let model = Scripted::default();
        let mut session = Session::new(model);

        assert!(!session.observe("partial").rewritten);
        assert!(!session.observe("partial words").rewritten);
        assert_eq!(session.text(), "partial words");
    }

    #[test]
    fn second_blank_line_does_not_fire() {
        let model = Scripted::default().expect_classify(&[("h1", 0.9)]);
        let mut session = Session::new(model);
        session.observe("Title\n");
        session.observe("# Title\n"); // echo

        // Adding blank space after the completed block is not a boundary.
        let outcome = session.observe("# Title\n\n");
        assert!(!outcome.rewritten);
        assert!(outcome.label.is_none());
    }

    #[test]
    fn boundary_fires_when_the_valid_block_count_stays_equal() {
        let model = Scripted::default().expect_classify(&[("h1", 0.9)]);
        let mut session = Session::new(model);

        // Single-newline lines count as separate valid blocks, so the
        // trailing newline here completes "beta" without growing the count
        // (two blocks before, two after). The tolerant threshold still has
        // to process the boundary.
        session.observe("alpha\nbeta");
        let outcome = session.observe("alpha\nbeta\n");
        assert_eq!(outcome.text, "alpha\n# beta\n");
        assert_eq!(outcome.label, Some(Label::H1));
        assert!(outcome.rewritten);
    }

    #[test]
    fn body_block_is_annotated_and_suppressed() {
        let model = Scripted::default()
            .expect_classify(&[("body", 0.9)])
            .expect_tags(&["normal", "normal", "bold", "bold"]);
        let mut session = Session::new(model);

        let outcome = session.observe("this is very important\n");
        assert_eq!(outcome.text, "this is **very important**\n");
        assert_eq!(outcome.label, Some(Label::Body));
        assert!(outcome.rewritten);

        let echo = session.observe("this is **very important**\n");
        assert!(!echo.rewritten);
    }

    #[test]
    fn body_with_nothing_to_tag_is_untouched_and_unsuppressed() {
        let model = Scripted::default()
            .expect_classify(&[("body", 0.9)])
            .expect_tags(&["normal", "normal"])
            .expect_classify(&[("h1", 0.9)]);
        let mut session = Session::new(model);

        let outcome = session.observe("plain text\n");
        assert_eq!(outcome.text, "plain text\n");
        assert!(!outcome.rewritten);

        // No suppression pending: the next boundary is processed.
        let next = session.observe("plain text\n\nTitle\n");
        assert_eq!(next.text, "plain text\n\n# Title\n");
    }

    #[test]
    fn model_failure_degrades_to_text_as_typed() {
        let model = Scripted::default(); // empty script: every call errors
        let mut session = Session::new(model);

        let outcome = session.observe("Some block\n");
        assert_eq!(outcome.text, "Some block\n");
        assert!(!outcome.rewritten);
        assert!(outcome.label.is_none());
    }

    #[test]
    fn clearing_the_buffer_resets_the_ratchet() {
        let model = Scripted::default()
            .expect_classify(&[("h1", 0.9)])
            .expect_classify(&[("h1", 0.9)]);
        let mut session = Session::new(model);

        session.observe("First\n");
        assert!(session.heading_state().h1_used);

        session.observe("# First\n"); // echo
        session.observe("");
        assert!(!session.heading_state().h1_used);

        // h1 is accepted again in the fresh session state.
        let outcome = session.observe("Second\n");
        assert_eq!(outcome.text, "# Second\n");
    }

    #[test]
    fn inline_annotation_can_be_disabled() {
        let model = Scripted::default().expect_classify(&[("body", 0.9)]);
        let mut session = Session::new(model);
        session.set_inline_annotation(false);

        let outcome = session.observe("this is very important\n");
        assert_eq!(outcome.text, "this is very important\n");
        assert_eq!(outcome.label, Some(Label::Body));
    }

    #[test]
    fn heading_levels_ratchet_across_blocks() {
        let model = Scripted::default()
            .expect_classify(&[("h1", 0.9), ("body", 0.1)])
            .expect_classify(&[("h1", 0.8), ("h2", 0.6)]);
        let mut session = Session::new(model);

        session.observe("Introduction\n");
        session.observe("# Introduction\n"); // echo

        let outcome = session.observe("# Introduction\n\nBackground\n");
        assert_eq!(outcome.text, "# Introduction\n\n## Background\n");
        assert_eq!(outcome.label, Some(Label::H2));
        assert!(session.heading_state().h2_used);
    }
}
