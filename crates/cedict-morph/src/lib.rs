//! Turns a raw text selection into an ordered list of candidate dictionary
//! keys: the selection itself first, then progressively less certain base
//! forms recovered by suffix rules, with multi-word selections expanded as the
//! cartesian product of their per-word candidates.
//!
//! The rules are a heuristic stemmer, not a linguistically complete one. Every
//! applicable rule fires and appends — none short-circuits the others — and
//! irregular forms ("went", "children") are an accepted miss. The list may
//! contain duplicates; consumers resolve with first-match-wins against the
//! index rather than pre-filtering, so duplicates are harmless.
//!
//! ```rust
//! let candidates = cedict_morph::normalize("Running").unwrap();
//! assert_eq!(candidates[0], "running");
//! assert!(candidates.contains(&"run".to_string()));
//! ```

use thiserror::Error;

use cedict_types::{
    MAX_PHRASE_COMBINATIONS, MAX_PHRASE_WORDS, MAX_SELECTION_CHARS, MIN_PHRASE_WORDS,
};

/// Trailing punctuation stripped by the first candidate rule.
const TRAILING_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"'];

/// Why a selection cannot be turned into candidate keys.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SelectionError {
    #[error("selection is empty")]
    Empty,
    #[error("selection exceeds {MAX_SELECTION_CHARS} characters (got {0})")]
    TooLong(usize),
    #[error("multi-word selection must have {MIN_PHRASE_WORDS}-{MAX_PHRASE_WORDS} words, got {0}")]
    WordCount(usize),
}

/// Candidate keys for a selection, in decreasing confidence order.
///
/// The lightly cleaned selection (trimmed, lowercased, inner whitespace
/// collapsed) is always the first candidate. Selections that are empty,
/// longer than [`MAX_SELECTION_CHARS`] characters, or split into a word count
/// outside `[MIN_PHRASE_WORDS, MAX_PHRASE_WORDS]` are rejected.
pub fn normalize(selection: &str) -> Result<Vec<String>, SelectionError> {
    let cleaned = selection.trim().to_lowercase();
    if cleaned.is_empty() {
        return Err(SelectionError::Empty);
    }
    let char_count = cleaned.chars().count();
    if char_count > MAX_SELECTION_CHARS {
        return Err(SelectionError::TooLong(char_count));
    }

    if cleaned.contains(char::is_whitespace) {
        let words: Vec<&str> = cleaned.split_whitespace().collect();
        if !(MIN_PHRASE_WORDS..=MAX_PHRASE_WORDS).contains(&words.len()) {
            return Err(SelectionError::WordCount(words.len()));
        }
        let per_position: Vec<Vec<String>> =
            words.iter().map(|word| word_candidates(word)).collect();
        return Ok(combine(&per_position));
    }

    Ok(word_candidates(&cleaned))
}

/// Candidate forms for one cleaned lowercase word, starting with the word
/// itself.
///
/// The rules fire independently in a fixed order; each appends the forms it
/// recovers. Length guards are in characters and keep short words like "is"
/// or "bed" from being over-stripped.
pub fn word_candidates(word: &str) -> Vec<String> {
    let n = word.chars().count();
    let mut out = vec![word.to_string()];

    // 1. Trailing punctuation.
    let stripped = word.trim_end_matches(TRAILING_PUNCT);
    if stripped != word {
        out.push(stripped.to_string());
    }

    // 2. -ies → -y ("cities" → "city").
    if n > 4 && let Some(stem) = word.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    }

    // 3. Plural -s / -es; -ses/-zes repeats the -es strip ("buses" → "bus").
    if n > 2 && word.ends_with('s') {
        out.push(drop_last(word, 1));
    }
    if n > 3 && word.ends_with("es") {
        out.push(drop_last(word, 2));
    }
    if word.ends_with("ses") || word.ends_with("zes") {
        out.push(drop_last(word, 2));
    }

    // 4. -ing, with restored -e and doubled-consonant bases
    //    ("hoping" → "hope", "running" → "run").
    if n > 4 && word.ends_with("ing") {
        let base = drop_last(word, 3);
        out.push(base.clone());
        out.push(format!("{base}e"));
        if ends_doubled(&base) {
            out.push(drop_last(&base, 1));
        }
    }

    // 5. -ed ("stopped" → "stop", "hoped" → "hope").
    if n > 3 && word.ends_with("ed") {
        let base = drop_last(word, 2);
        out.push(base.clone());
        out.push(drop_last(word, 1));
        if ends_doubled(&base) {
            out.push(drop_last(&base, 1));
        }
    }

    // 6. -er ("bigger" → "big", "nicer" → "nice").
    if n > 3 && word.ends_with("er") {
        let base = drop_last(word, 2);
        out.push(base.clone());
        out.push(drop_last(word, 1));
        if ends_doubled(&base) {
            out.push(drop_last(&base, 1));
        }
    }

    // 7. -est ("largest" → "larg", "large").
    if n > 4 && word.ends_with("est") {
        out.push(drop_last(word, 3));
        out.push(drop_last(word, 2));
    }

    // 8. -ly ("quickly" → "quick").
    if n > 3 && word.ends_with("ly") {
        out.push(drop_last(word, 2));
    }

    out
}

/// Cartesian combination of per-position candidate lists, joined with single
/// spaces. The first word varies slowest so the most confident per-position
/// combinations come first; output is capped at
/// [`MAX_PHRASE_COMBINATIONS`].
fn combine(per_position: &[Vec<String>]) -> Vec<String> {
    let mut out = Vec::new();
    match per_position {
        [first, second] => {
            'done: for a in first {
                for b in second {
                    if out.len() == MAX_PHRASE_COMBINATIONS {
                        break 'done;
                    }
                    out.push(format!("{a} {b}"));
                }
            }
        }
        [first, second, third] => {
            'done: for a in first {
                for b in second {
                    for c in third {
                        if out.len() == MAX_PHRASE_COMBINATIONS {
                            break 'done;
                        }
                        out.push(format!("{a} {b} {c}"));
                    }
                }
            }
        }
        _ => {}
    }
    out
}

fn drop_last(s: &str, k: usize) -> String {
    let keep = s.chars().count().saturating_sub(k);
    s.chars().take(keep).collect()
}

fn ends_doubled(s: &str) -> bool {
    let mut chars = s.chars();
    let last = chars.next_back();
    let prev = chars.next_back();
    matches!((last, prev), (Some(a), Some(b)) if a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_form_is_always_first() {
        assert_eq!(normalize("CAT").unwrap()[0], "cat");
        assert_eq!(normalize("  Ice  Cream ").unwrap()[0], "ice cream");
    }

    #[test]
    fn rejects_empty_and_oversized_selections() {
        assert_eq!(normalize(""), Err(SelectionError::Empty));
        assert_eq!(normalize("   "), Err(SelectionError::Empty));
        assert_eq!(normalize(&"a".repeat(101)), Err(SelectionError::TooLong(101)));
        assert!(normalize(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn rejects_selections_with_too_many_words() {
        assert_eq!(
            normalize("one two three four"),
            Err(SelectionError::WordCount(4))
        );
    }

    #[test]
    fn undoes_common_inflections() {
        assert!(normalize("cats").unwrap().contains(&"cat".to_string()));
        assert!(normalize("cities").unwrap().contains(&"city".to_string()));
        assert!(normalize("running").unwrap().contains(&"run".to_string()));
        assert!(normalize("hoping").unwrap().contains(&"hope".to_string()));
        assert!(normalize("stopped").unwrap().contains(&"stop".to_string()));
        assert!(normalize("hoped").unwrap().contains(&"hope".to_string()));
        assert!(normalize("bigger").unwrap().contains(&"big".to_string()));
        assert!(normalize("nicer").unwrap().contains(&"nice".to_string()));
        assert!(normalize("largest").unwrap().contains(&"large".to_string()));
        assert!(normalize("quickly").unwrap().contains(&"quick".to_string()));
    }

    #[test]
    fn short_words_are_not_over_stripped() {
        assert_eq!(normalize("is").unwrap(), vec!["is"]);
        assert_eq!(normalize("bed").unwrap(), vec!["bed"]);
        assert_eq!(normalize("her").unwrap(), vec!["her"]);
    }

    #[test]
    fn trailing_punctuation_is_a_separate_candidate() {
        let candidates = normalize("cat!").unwrap();
        assert_eq!(candidates, vec!["cat!", "cat"]);
        // Rules key off the raw word, so the punctuated form gets no -s strip.
        let candidates = normalize("cats.").unwrap();
        assert_eq!(candidates, vec!["cats.", "cats"]);
    }

    #[test]
    fn ses_strip_is_appended_twice() {
        // The -es and -ses rules both produce "bus"; first-match-wins lookup
        // makes the repeat harmless, and this pins the observed behavior.
        let candidates = word_candidates("buses");
        let bus_count = candidates.iter().filter(|c| c.as_str() == "bus").count();
        assert_eq!(candidates[0], "buses");
        assert_eq!(bus_count, 2);
    }

    #[test]
    fn rule_order_is_fixed() {
        assert_eq!(
            word_candidates("running"),
            vec!["running", "runn", "runne", "run"]
        );
        assert_eq!(
            word_candidates("stopped"),
            vec!["stopped", "stopp", "stoppe", "stop"]
        );
    }

    #[test]
    fn multi_word_selections_expand_cartesian_first_word_slowest() {
        let candidates = normalize("iced creams").unwrap();
        assert_eq!(candidates[0], "iced creams");
        // All second-position variants appear before the first word changes.
        assert_eq!(candidates[1], "iced cream");
        assert!(candidates.contains(&"ice cream".to_string()));
        assert!(candidates.len() <= MAX_PHRASE_COMBINATIONS);
    }

    #[test]
    fn cartesian_expansion_is_capped() {
        let candidates = normalize("stopped dressing hoped").unwrap();
        assert_eq!(candidates.len(), MAX_PHRASE_COMBINATIONS);
        assert_eq!(candidates[0], "stopped dressing hoped");
    }
}
