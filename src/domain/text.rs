//! Text normalisation.
//!
//! Two tokenisers live here and they are intentionally different:
//! [`clean_and_tokenize`] feeds word inspection, [`lexicon_terms`] feeds the
//! lexicon scorer.

use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid markdown link regex"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+").expect("valid word regex"));

/// Tokens shorter than this are dropped.
const MIN_TOKEN_LEN: usize = 3;

/// Strip URLs and markdown links, lowercase, and return runs of ASCII
/// letters longer than two characters, in order of appearance.
pub fn clean_and_tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let without_urls = URL_RE.replace_all(text, "");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_urls, "$1");
    let lowered = without_links.to_lowercase();

    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Lowercase, split on whitespace and keep only the alphanumeric
/// characters of each piece. Pieces that end up empty are skipped.
pub fn lexicon_terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|piece| {
        let term: String = piece
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        (!term.is_empty()).then_some(term)
    })
}
