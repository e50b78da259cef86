//! First-match-wins resolution of a selection against the index.

use cedict_morph::normalize;
use cedict_types::{DictionaryIndex, Entry};

/// A successful lookup: the candidate key that hit and its ranked entries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution<'a> {
    pub matched_key: String,
    pub entries: &'a [Entry],
}

/// Probe the index with each candidate key in confidence order and return the
/// first hit.
///
/// No merging across keys and no re-ranking across candidates: a hit on an
/// earlier candidate shadows everything after it. Invalid selections (empty,
/// oversized, bad word count) resolve to no match rather than an error.
pub fn resolve<'a>(index: &'a DictionaryIndex, selection: &str) -> Option<Resolution<'a>> {
    let candidates = normalize(selection).ok()?;
    for key in candidates {
        if let Some(entries) = index.get(&key) {
            return Some(Resolution {
                matched_key: key,
                entries,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_index() -> DictionaryIndex {
        let mut index = DictionaryIndex::new();
        index.insert(
            "cat".into(),
            vec![Entry {
                simplified: "猫".into(),
                pinyin: "māo".into(),
                definitions: vec!["cat".into()],
            }],
        );
        index
    }

    #[test]
    fn inflected_selection_resolves_to_base_form() {
        let index = cat_index();
        let hit = resolve(&index, "cats").unwrap();
        assert_eq!(hit.matched_key, "cat");
        assert_eq!(hit.entries.len(), 1);
        assert_eq!(hit.entries[0].simplified, "猫");
    }

    #[test]
    fn earlier_candidates_shadow_later_ones() {
        let mut index = cat_index();
        index.insert(
            "cats".into(),
            vec![Entry {
                simplified: "猫们".into(),
                pinyin: "māo men".into(),
                definitions: vec!["cats".into()],
            }],
        );
        // The surface form is the first candidate, so it wins over "cat".
        let hit = resolve(&index, "cats").unwrap();
        assert_eq!(hit.matched_key, "cats");
    }

    #[test]
    fn unknown_and_invalid_selections_are_no_match() {
        let index = cat_index();
        assert_eq!(resolve(&index, "xyzzy"), None);
        assert_eq!(resolve(&index, ""), None);
        assert_eq!(resolve(&index, &"a".repeat(101)), None);
        assert_eq!(resolve(&index, "one two three four"), None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let index = cat_index();
        let first = resolve(&index, "cats").map(|r| (r.matched_key, r.entries.to_vec()));
        let second = resolve(&index, "cats").map(|r| (r.matched_key, r.entries.to_vec()));
        assert_eq!(first, second);
    }
}
