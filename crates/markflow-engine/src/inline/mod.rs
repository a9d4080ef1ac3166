//! # Inline Span Annotation
//!
//! Token-level markup insertion for body-classified blocks.
//!
//! A block that already carries markdown syntax is never touched. Otherwise
//! the block is tokenized at word level, the tagger assigns one tag per
//! token, adjacent same-tagged tokens merge into spans, and each span is
//! wrapped with its delimiter pair under a shifting-offset rewrite:
//! insertions are applied in ascending original-position order against a
//! single mutable copy, with a running accumulator translating original
//! offsets into offsets in the growing text.
//!
//! ## Modules
//!
//! - **`tokens`**: word-level tokenizer producing [`Token`]s with byte ranges
//! - **`spans`**: [`Tag`]/[`TagSpan`] plus span merging and the rewrite pass
//! - **`annotate`**: the `annotate()` entry point and markdown detection

pub mod annotate;
pub mod spans;
pub mod tokens;

pub use annotate::{annotate, contains_markdown};
pub use spans::{Tag, TagSpan};
pub use tokens::{Token, tokenize};
