//! English key extraction from CC-CEDICT definition strings.
//!
//! Each slash-delimited definition yields zero or more single-word keys and at
//! most one short-phrase key. Parenthesized usage notes are dropped, stop
//! words and single letters are never indexed, and keys are always lowercase.

use std::sync::LazyLock;

use regex::Regex;

/// Words that carry no indexable meaning on their own: articles, prepositions,
/// copulas, and CC-CEDICT markers ("sb"/"sth" placeholders, citation
/// abbreviations). Also barred from the edges of phrase keys.
static STOP_WORDS: &[&str] = &[
    "a", "abbr", "about", "an", "and", "are", "as", "at", "be", "been", "but",
    "by", "cf", "eg", "etc", "fig", "for", "from", "ie", "in", "into", "is",
    "it", "its", "lit", "of", "on", "one's", "onto", "or", "pr", "sb", "sth",
    "than", "that", "the", "this", "to", "upon", "var", "was", "were", "with",
];

/// Bracketed spans carry usage notes, not meaning: `(coll.)`, `[loanword]`,
/// `{variant}`. Non-greedy, non-nested.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}").unwrap());

/// A word token: a letter followed by letters, hyphens, or apostrophes.
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z][a-z'-]*").unwrap());

/// A whole definition usable as a phrase key: letters, hyphens, apostrophes,
/// and single spaces only, starting and ending on a letter.
static PHRASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][a-z' -]*[a-z]$").unwrap());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Shared preprocessing: drop bracketed spans, collapse whitespace, lowercase.
fn clean(definition: &str) -> String {
    let without_notes = BRACKETED.replace_all(definition, " ");
    without_notes
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Single-word keys for one definition, in first-seen order.
///
/// Tokens of length 1, stop words, and anything containing a digit never
/// survive; digits simply are not part of the token pattern.
pub fn extract_word_keys(definition: &str) -> Vec<String> {
    let cleaned = clean(definition);
    let mut keys: Vec<String> = Vec::new();
    for token in WORD.find_iter(&cleaned) {
        let word = token.as_str();
        if word.len() <= 1 || is_stop_word(word) {
            continue;
        }
        if !keys.iter().any(|k| k == word) {
            keys.push(word.to_string());
        }
    }
    keys
}

/// The whole cleaned definition as a phrase key, or nothing.
///
/// Accepted only when the cleaned string is pure words (no stray punctuation,
/// numerals, or non-ASCII), splits into exactly 2 or 3 words, and neither edge
/// word is a stop word.
pub fn extract_phrase_key(definition: &str) -> Option<String> {
    let cleaned = clean(definition);
    if !PHRASE.is_match(&cleaned) {
        return None;
    }
    let words: Vec<&str> = cleaned.split(' ').collect();
    if !(cedict_types::MIN_PHRASE_WORDS..=cedict_types::MAX_PHRASE_WORDS).contains(&words.len()) {
        return None;
    }
    if is_stop_word(words[0]) || is_stop_word(words[words.len() - 1]) {
        return None;
    }
    Some(cleaned)
}
