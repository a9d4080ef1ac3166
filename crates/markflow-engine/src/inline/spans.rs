use std::ops::Range;

/// A recognized inline markup tag. Tag names outside this set (including
/// `normal`) never trigger rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Code,
    Bold,
    Italic,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "code" => Some(Tag::Code),
            "bold" => Some(Tag::Bold),
            "italic" => Some(Tag::Italic),
            _ => None,
        }
    }

    /// The markdown delimiter inserted on each side of a span.
    pub fn delimiter(self) -> &'static str {
        match self {
            Tag::Code => "`",
            Tag::Bold => "**",
            Tag::Italic => "*",
        }
    }
}

/// A contiguous run of same-tagged tokens, as byte offsets in the original
/// (unrewritten) block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    pub range: Range<usize>,
    pub tag: Tag,
}

/// Merges an ordered list of tagged token ranges into spans.
///
/// A run boundary is wherever the tag changes between consecutive entries of
/// the list. The input is expected to contain only the tokens that need
/// markup (the tagger's `normal` tokens already filtered out), in original
/// text order, so a multi-word phrase with a uniform tag becomes one span.
pub fn merge_spans(tagged: &[(Range<usize>, Tag)]) -> Vec<TagSpan> {
    let mut spans: Vec<TagSpan> = Vec::new();

    for (range, tag) in tagged {
        match spans.last_mut() {
            Some(last) if last.tag == *tag => last.range.end = range.end,
            _ => spans.push(TagSpan {
                range: range.clone(),
                tag: *tag,
            }),
        }
    }

    spans
}

/// Wraps each span with its delimiter pair in one forward pass.
///
/// Spans must be non-overlapping and in ascending start order. Each
/// insertion shifts all later insertion points, so a running inserted-length
/// accumulator translates original offsets into offsets in the growing copy.
/// Append-only: no original character is replaced or removed.
pub fn apply_spans(text: &str, spans: &[TagSpan]) -> String {
    let mut out = text.to_string();
    let mut offset = 0;

    for span in spans {
        let delimiter = span.tag.delimiter();
        out.insert_str(span.range.start + offset, delimiter);
        offset += delimiter.len();
        out.insert_str(span.range.end + offset, delimiter);
        offset += delimiter.len();
    }

    out
}
