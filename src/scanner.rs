use crate::structs::ParseError;

// --- Delimiter Scanning ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimKind {
    Open,
    Bar,
    Close,
}

impl DelimKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '(' => Some(DelimKind::Open),
            '|' => Some(DelimKind::Bar),
            ')' => Some(DelimKind::Close),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    /// Byte offset into the scanned string.
    pub pos: usize,
    pub kind: DelimKind,
}

/// Lists every `(`, `|` and `)` in order. A sentence without any colon
/// cannot hold a single tagged word and is rejected up front.
pub fn scan_delimiters(tree: &str) -> Result<Vec<Delimiter>, ParseError> {
    if !tree.contains(':') {
        return Err(ParseError::MalformedTree);
    }
    Ok(tree
        .char_indices()
        .filter_map(|(pos, c)| DelimKind::from_char(c).map(|kind| Delimiter { pos, kind }))
        .collect())
}
