//! Text Normalizer: canonical form used for both embedding and tokenization.
//!
//! Lowercase, keep only ASCII `a-z`, `0-9` and whitespace, collapse whitespace.
//! Non-ASCII letters (accented or otherwise) are dropped rather than
//! transliterated, so "café" becomes "caf".

use std::fmt;

use serde::Serialize;

/// Text that has passed through `normalize`. May be empty; the pipeline rejects
/// empty values before they reach the embedding provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-delimited tokens, in order, duplicates included.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize(text: &str) -> NormalizedText {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    NormalizedText(kept.split_whitespace().collect::<Vec<_>>().join(" "))
}
