use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Words that carry no schema meaning in a question about data
pub const STOP_WORDS: [&str; 17] = [
    "a", "an", "the", "is", "of", "in", "and", "or", "for", "show", "list", "what", "how", "many",
    "count", "get", "total",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.into_iter().collect());

/// Splits a free-text query into candidate keywords.
///
/// Tokens are lowercased and split on whitespace only. Punctuation stays
/// attached to its token; the substring matcher downstream tolerates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Keywords in query order; duplicates are kept
    pub fn extract(&self, query: &str) -> Vec<String> {
        query
            .to_lowercase()
            .split_whitespace()
            .filter(|token| !is_stop_word(token))
            .map(String::from)
            .collect()
    }
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}
