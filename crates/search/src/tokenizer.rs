//! Query and value tokenizer
//!
//! Splits free text into pieces on whitespace, `+` and `,`. Pieces keep
//! their original case and order; empty pieces are dropped.

/// Tokenize text into pieces
///
/// # Example
///
/// ```
/// use lodestar_search::tokenizer::tokenize;
///
/// let pieces = tokenize("Blue  Whale,krill+Plankton");
/// assert_eq!(pieces, vec!["Blue", "Whale", "krill", "Plankton"]);
/// ```
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_separator).filter(|s| !s.is_empty()).collect()
}

/// Pieces with at least `min_len` characters
///
/// Lengths are counted in characters, not bytes.
///
/// # Example
///
/// ```
/// use lodestar_search::tokenizer::keywords;
///
/// assert_eq!(keywords("the big whale", 4), vec!["whale"]);
/// ```
pub fn keywords(text: &str, min_len: usize) -> Vec<&str> {
    tokenize(text)
        .into_iter()
        .filter(|piece| char_len(piece) >= min_len)
        .collect()
}

/// Character count of a piece
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '+' || c == ','
}
