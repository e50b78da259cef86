//! Offline compiler: CC-CEDICT lexicon text → English-keyed lookup index.
//!
//! A data line looks like
//!
//! ```text
//! 貓 猫 [mao1] /cat/
//! ```
//!
//! The traditional field is parsed but not indexed. Pinyin is rendered to
//! diacritic form ([`pinyin`]), each definition contributes word keys and at
//! most one phrase key ([`keys`]), and every key's collected entries are
//! ranked and truncated before storage. Comment lines, blank lines, and
//! malformed lines are skipped without aborting the batch.
//!
//! Run once per lexicon update; the runtime only ever reads the resulting
//! artifact.

pub mod common;
pub mod keys;
pub mod pinyin;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use cedict_types::{DictionaryIndex, Entry, MAX_ENTRIES_PER_KEY};

/// `<traditional> <simplified> [<numbered pinyin>] /<def>/<def>/.../`
static DATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+\[([^\]]*)\]\s+/(.+)/\s*$").unwrap());

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a lexicon file and compile it.
pub fn compile_file<P: AsRef<Path>>(path: P) -> Result<DictionaryIndex, CompileError> {
    let source = fs::read_to_string(path)?;
    Ok(compile(&source))
}

/// Compile raw lexicon text into a [`DictionaryIndex`].
pub fn compile(source: &str) -> DictionaryIndex {
    let mut by_key: HashMap<String, Vec<Entry>> = HashMap::new();
    let mut parsed = 0usize;
    let mut skipped = 0usize;

    for line in source.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(entry) = parse_line(line) else {
            skipped += 1;
            continue;
        };
        parsed += 1;
        for definition in &entry.definitions {
            for key in keys::extract_word_keys(definition) {
                append_unique(&mut by_key, key, &entry);
            }
            if let Some(key) = keys::extract_phrase_key(definition) {
                append_unique(&mut by_key, key, &entry);
            }
        }
    }

    if skipped > 0 {
        info!("skipped {skipped} malformed lexicon lines");
    }
    if parsed == 0 {
        warn!("lexicon produced no entries; is this the right file?");
    }

    let mut index = DictionaryIndex::new();
    for (key, mut entries) in by_key {
        entries.sort_by_key(rank);
        entries.truncate(MAX_ENTRIES_PER_KEY);
        index.insert(key, entries);
    }
    info!(
        "compiled {parsed} lexicon entries into {} keys",
        index.key_count()
    );
    index
}

/// Parse one data line, or `None` if it does not match the expected shape.
fn parse_line(line: &str) -> Option<Entry> {
    let caps = DATA_LINE.captures(line)?;
    let definitions: Vec<String> = caps[4]
        .split('/')
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect();
    if definitions.is_empty() {
        return None;
    }
    Some(Entry {
        simplified: caps[2].to_string(),
        pinyin: pinyin::render_pronunciation(&caps[3]),
        definitions,
    })
}

/// Append `entry` to the key's list unless a `(characters, pronunciation)`
/// duplicate is already there. First-seen gloss sets win.
fn append_unique(by_key: &mut HashMap<String, Vec<Entry>>, key: String, entry: &Entry) {
    let list = by_key.entry(key).or_default();
    if !list.iter().any(|seen| seen.same_translation(entry)) {
        list.push(entry.clone());
    }
}

/// Composite ranking key, ascending: curated common words first, then the
/// statistically dominant two-character words ahead of single characters
/// ahead of longer strings, then shorter gloss sets (a primary, less
/// qualified meaning). Ties keep insertion order via the stable sort.
fn rank(entry: &Entry) -> (u8, u8, usize) {
    let common = if common::is_common(&entry.simplified) {
        0
    } else {
        1
    };
    let length_class = match entry.simplified.chars().count() {
        2 => 0,
        1 => 1,
        _ => 2,
    };
    let gloss_len: usize = entry
        .definitions
        .iter()
        .map(|d| d.chars().count())
        .sum();
    (common, length_class, gloss_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_LEXICON: &str = "\
# CC-CEDICT sample
# License: CC BY-SA 4.0
貓 猫 [mao1] /cat/
狗 狗 [gou3] /dog/
冰淇淋 冰淇淋 [bing1 qi2 lin2] /ice cream/
銀行 银行 [yin2 hang2] /bank (financial institution)/
隄 堤 [di1] /bank (of a river)/dike/embankment/
";

    #[test]
    fn compiles_word_and_phrase_keys() {
        let index = compile(SMALL_LEXICON);
        let cat = index.get("cat").unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat[0].simplified, "猫");
        assert_eq!(cat[0].pinyin, "māo");

        let ice_cream = index.get("ice cream").unwrap();
        assert_eq!(ice_cream[0].simplified, "冰淇淋");
        assert_eq!(ice_cream[0].pinyin, "bīng qí lín");
        assert!(index.contains_key("ice"));
        assert!(index.contains_key("cream"));
    }

    #[test]
    fn comment_and_malformed_lines_are_skipped() {
        let index = compile(
            "# header\n\nnoise without shape\n貓 猫 [mao1] /cat/\n貓 猫 missing brackets /cat/\n",
        );
        assert_eq!(index.key_count(), 1);
        assert!(index.contains_key("cat"));
    }

    #[test]
    fn bracketed_notes_do_not_become_keys() {
        let index = compile("銀行 银行 [yin2 hang2] /bank (financial institution)/\n");
        assert!(index.contains_key("bank"));
        assert!(!index.contains_key("financial"));
        assert!(!index.contains_key("institution"));
    }

    #[test]
    fn duplicate_character_pronunciation_pairs_keep_first_glosses() {
        let index = compile("貓 猫 [mao1] /cat/\n貓 猫 [mao1] /cat (domestic)/feline/\n");
        let cat = index.get("cat").unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat[0].definitions, vec!["cat".to_string()]);
    }

    #[test]
    fn common_words_rank_first_regardless_of_gloss_length() {
        // 猫 is curated common; 堤-style homograph competes on "bank" below.
        let index = compile(
            "隄 堤 [di1] /bank/\n貓貓 猫猫 [mao1 mao1] /bank/kitty bank toy with a very long gloss set/\n",
        );
        // Neither is common: two-character 猫猫 outranks single-character 堤.
        assert_eq!(index.get("bank").unwrap()[0].simplified, "猫猫");

        let index = compile(
            "貓 猫 [mao1] /moggy with an extremely long description of the animal/\n崸 嘪 [mai3] /moggy/\n",
        );
        // 猫 is in the common set, so it sorts first despite the longer gloss.
        assert_eq!(index.get("moggy").unwrap()[0].simplified, "猫");
    }

    #[test]
    fn two_character_words_outrank_singles_then_longer_forms() {
        let index = compile(
            "甲甲甲 乙乙乙 [yi3 yi3 yi3] /widget/\n甲 乙 [yi3] /widget/\n甲甲 乙乙 [yi3 yi3] /widget/\n",
        );
        let ranked: Vec<&str> = index
            .get("widget")
            .unwrap()
            .iter()
            .map(|e| e.simplified.as_str())
            .collect();
        assert_eq!(ranked, vec!["乙乙", "乙", "乙乙乙"]);
    }

    #[test]
    fn entry_lists_are_truncated_to_ten() {
        let mut source = String::new();
        for i in 0..15 {
            let chars = format!("字{i:02}");
            source.push_str(&format!("{chars} {chars} [zi4] /widget number {i}/widget/\n"));
        }
        let index = compile(&source);
        assert_eq!(index.get("widget").unwrap().len(), MAX_ENTRIES_PER_KEY);
    }

    #[test]
    fn compile_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        write!(file, "{SMALL_LEXICON}").unwrap();
        let index = compile_file(file.path()).unwrap();
        assert!(index.contains_key("dog"));
        assert!(compile_file(file.path().join("missing")).is_err());
    }
}
