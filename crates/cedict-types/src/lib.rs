//! Shared types for the compiled English→Mandarin dictionary.
//!
//! The compiler (`cedict-compile`) produces a [`DictionaryIndex`]; the runtime
//! service probes it with candidate keys from `cedict-morph`. Both sides agree
//! on the record shapes and bounds defined here.
//!
//! The serialized artifact is a single JSON object mapping each lowercase key
//! to its ranked entry list; [`DictionaryIndex`] is `serde(transparent)` so
//! the Rust type and the artifact have the same shape.
//!
//! ```rust
//! use cedict_types::{DictionaryIndex, Entry};
//!
//! let mut index = DictionaryIndex::new();
//! index.insert(
//!     "cat".into(),
//!     vec![Entry {
//!         simplified: "猫".into(),
//!         pinyin: "māo".into(),
//!         definitions: vec!["cat".into()],
//!     }],
//! );
//! assert_eq!(index.get("cat").unwrap()[0].simplified, "猫");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Ranked entry lists are truncated to this length before storage.
pub const MAX_ENTRIES_PER_KEY: usize = 10;

/// Selections longer than this (in characters) are rejected by the normalizer.
pub const MAX_SELECTION_CHARS: usize = 100;

/// Indexable phrases and multi-word selections span this many words.
pub const MIN_PHRASE_WORDS: usize = 2;
pub const MAX_PHRASE_WORDS: usize = 3;

/// Cap on cartesian candidate combinations for a multi-word selection.
pub const MAX_PHRASE_COMBINATIONS: usize = 20;

/// One translation unit: simplified characters, diacritic pinyin
/// (space-separated syllables), and English definitions in source order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub simplified: String,
    pub pinyin: String,
    pub definitions: Vec<String>,
}

impl Entry {
    /// Duplicate identity for index construction: two entries with the same
    /// characters and pronunciation are the same translation even when their
    /// gloss sets differ. The first-seen gloss set wins.
    pub fn same_translation(&self, other: &Entry) -> bool {
        self.simplified == other.simplified && self.pinyin == other.pinyin
    }
}

/// Mapping from lowercase English key (single word or 2–3 word phrase) to its
/// ranked entries.
///
/// Invariants, enforced at construction: keys are lowercase, every stored list
/// is non-empty, and no list exceeds [`MAX_ENTRIES_PER_KEY`]. The index is
/// immutable once built; the runtime only reads it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictionaryIndex {
    entries: HashMap<String, Vec<Entry>>,
}

impl DictionaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranked entries for an exact key, if any.
    pub fn get(&self, key: &str) -> Option<&[Entry]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Install the ranked list for a key. Empty lists are never stored.
    pub fn insert(&mut self, key: String, entries: Vec<Entry>) {
        if !entries.is_empty() {
            self.entries.insert(key, entries);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.entries
            .iter()
            .map(|(key, list)| (key.as_str(), list.as_slice()))
    }
}
