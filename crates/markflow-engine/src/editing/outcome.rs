use crate::classify::Label;

/// Result of observing one text-change event.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// Buffer content after processing (rewritten, or exactly as typed).
    pub text: String,
    /// Whether the pipeline changed the text on this event.
    pub rewritten: bool,
    /// Label applied to the newly completed block, if one was classified.
    pub label: Option<Label>,
}

impl EditOutcome {
    pub(crate) fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            rewritten: false,
            label: None,
        }
    }
}
