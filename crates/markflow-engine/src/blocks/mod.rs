//! Block segmentation and document reassembly.
//!
//! The document is modelled as an ordered sequence of [`Block`]s: runs of
//! non-empty text lines separated by blank-line sentinels. `segment` and
//! `join` are exact inverses for text that follows this grammar, which is
//! what lets the pipeline rewrite a single block and reassemble the buffer
//! without disturbing the rest of the document.

/// One logical unit of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A single non-empty line of text.
    Text(String),
    /// A blank line between paragraph groups.
    Separator,
}

impl Block {
    /// Whether this block counts as document content (non-empty after trim).
    pub fn is_valid(&self) -> bool {
        match self {
            Block::Text(t) => !t.trim().is_empty(),
            Block::Separator => false,
        }
    }
}

/// Splits raw text into an ordered block sequence.
///
/// Paragraph groups are split on the blank-line boundary (`"\n\n"`) first;
/// within each group, lines are split on `'\n'` and empty lines discarded.
/// One [`Block::Separator`] is emitted between consecutive groups, never
/// after the last. Whitespace-only lines are kept as `Text` blocks; they
/// are invalid ([`Block::is_valid`] is false) rather than absent, so
/// whitespace-only input yields no *valid* blocks but not necessarily an
/// empty sequence. Pure function of its input: the same text always yields
/// the same sequence.
pub fn segment(text: &str) -> Vec<Block> {
    let groups: Vec<&str> = text.split("\n\n").collect();
    let mut blocks = Vec::new();

    for (i, group) in groups.iter().enumerate() {
        blocks.extend(
            group
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(|line| Block::Text(line.to_string())),
        );
        if i + 1 < groups.len() {
            blocks.push(Block::Separator);
        }
    }

    blocks
}

/// Counts blocks whose trimmed content is non-empty. Separators never count.
pub fn count_valid(blocks: &[Block]) -> usize {
    blocks.iter().filter(|b| b.is_valid()).count()
}

/// Joins a block sequence back into a single text buffer.
///
/// Every text block contributes its content plus a trailing newline; a
/// separator contributes exactly one newline (the blank line it stands for).
/// Left inverse of [`segment`] for text built from the block grammar.
pub fn join(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Text(t) => {
                out.push_str(t);
                out.push('\n');
            }
            Block::Separator => out.push('\n'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn segment_single_paragraph() {
        let blocks = segment("hello world");
        assert_eq!(blocks, vec![Block::Text("hello world".to_string())]);
    }

    #[test]
    fn segment_two_paragraphs_inserts_separator() {
        let blocks = segment("first\n\nsecond");
        assert_eq!(
            blocks,
            vec![
                Block::Text("first".to_string()),
                Block::Separator,
                Block::Text("second".to_string()),
            ]
        );
    }

    #[test]
    fn segment_multiline_group_splits_lines() {
        let blocks = segment("line one\nline two\n\nnext");
        assert_eq!(
            blocks,
            vec![
                Block::Text("line one".to_string()),
                Block::Text("line two".to_string()),
                Block::Separator,
                Block::Text("next".to_string()),
            ]
        );
    }

    #[test]
    fn segment_empty_input_yields_nothing_valid() {
        assert_eq!(count_valid(&segment("")), 0);
        assert_eq!(count_valid(&segment("   \n\n  \n")), 0);
    }

    #[test]
    fn whitespace_lines_survive_as_invalid_blocks() {
        let blocks = segment("   \n\n  \n");
        assert_eq!(
            blocks,
            vec![
                Block::Text("   ".to_string()),
                Block::Separator,
                Block::Text("  ".to_string()),
            ]
        );
        assert!(blocks.iter().all(|b| !b.is_valid()));
    }

    #[test]
    fn segment_trailing_newline_drops_empty_line() {
        let blocks = segment("first\n\nsecond\n");
        assert_eq!(
            blocks,
            vec![
                Block::Text("first".to_string()),
                Block::Separator,
                Block::Text("second".to_string()),
            ]
        );
    }

    #[test]
    fn count_valid_ignores_separators_and_whitespace() {
        let blocks = vec![
            Block::Text("real".to_string()),
            Block::Separator,
            Block::Text("   ".to_string()),
            Block::Text("also real".to_string()),
        ];
        assert_eq!(count_valid(&blocks), 2);
    }

    #[rstest]
    #[case("hello\n")]
    #[case("first\n\nsecond\n")]
    #[case("a\nb\n\nc\n\nd\ne\nf\n")]
    #[case("# heading\n\nbody text here\n")]
    fn join_is_left_inverse_of_segment(#[case] text: &str) {
        assert_eq!(join(&segment(text)), text);
    }

    #[test]
    fn join_separator_contributes_single_newline() {
        let blocks = vec![
            Block::Text("a".to_string()),
            Block::Separator,
            Block::Text("b".to_string()),
        ];
        assert_eq!(join(&blocks), "a\n\nb\n");
    }

    #[test]
    fn repeated_paragraph_content_keeps_all_separators() {
        // Groups with identical content must not confuse separator emission.
        let text = "same\n\nsame\n\nsame\n";
        assert_eq!(join(&segment(text)), text);
    }
}
