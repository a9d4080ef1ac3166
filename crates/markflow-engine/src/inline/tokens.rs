use std::ops::Range;

/// A word-level token with its byte range in the original block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub range: Range<usize>,
}

/// Splits a block into word-level tokens.
///
/// Whitespace is omitted, contractions stay joined (apostrophes inside a
/// word are kept), and leading/trailing punctuation is excluded from the
/// token's range so delimiters wrap the word itself, not its punctuation.
/// Underscores are kept at the edges since they are part of identifiers.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take()
                && let Some(token) = trimmed_token(text, s, i)
            {
                tokens.push(token);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start
        && let Some(token) = trimmed_token(text, s, text.len())
    {
        tokens.push(token);
    }

    tokens
}

/// Narrows a whitespace-delimited word to its punctuation-trimmed range.
fn trimmed_token(text: &str, start: usize, end: usize) -> Option<Token<'_>> {
    let is_edge_punct = |c: char| c.is_ascii_punctuation() && c != '_';
    let raw = &text[start..end];

    let lead = raw.len() - raw.trim_start_matches(is_edge_punct).len();
    let trimmed = raw.trim_start_matches(is_edge_punct).trim_end_matches(is_edge_punct);
    if trimmed.is_empty() {
        return None;
    }

    let range = (start + lead)..(start + lead + trimmed.len());
    Some(Token {
        text: trimmed,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(tokens: &'a [Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_whitespace() {
        let tokens = tokenize("this is very important");
        assert_eq!(texts(&tokens), vec!["this", "is", "very", "important"]);
        assert_eq!(tokens[2].range, 8..12);
        assert_eq!(tokens[3].range, 13..22);
    }

    #[test]
    fn contractions_stay_joined() {
        let tokens = tokenize("don't stop");
        assert_eq!(texts(&tokens), vec!["don't", "stop"]);
        assert_eq!(tokens[0].range, 0..5);
    }

    #[test]
    fn trailing_punctuation_excluded_from_range() {
        let tokens = tokenize("stop here.");
        assert_eq!(tokens[1].text, "here");
        assert_eq!(tokens[1].range, 5..9);
    }

    #[test]
    fn quoted_word_narrows_to_the_word() {
        let tokens = tokenize("say \"hello\" now");
        assert_eq!(tokens[1].text, "hello");
        assert_eq!(tokens[1].range, 5..10);
    }

    #[test]
    fn underscores_survive_trimming() {
        let tokens = tokenize("call snake_case_fn, please");
        assert_eq!(tokens[1].text, "snake_case_fn");
    }

    #[test]
    fn pure_punctuation_words_are_dropped() {
        let tokens = tokenize("a -- b");
        assert_eq!(texts(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn multibyte_text_ranges_are_byte_accurate() {
        let text = "café こんにちは done";
        let tokens = tokenize(text);
        for token in &tokens {
            assert_eq!(&text[token.range.clone()], token.text);
        }
    }
}
