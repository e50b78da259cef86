//! Numbered-tone pinyin rendering (`ni3 hao3` → `nǐ hǎo`).
//!
//! CC-CEDICT writes pronunciations with trailing tone digits and `v` standing
//! in for `ü`. Rendering is per syllable and total: anything unparseable comes
//! back as its bare letters rather than failing.

/// Diacritic forms per markable vowel, indexed by tone 1–4; the last slot is
/// the neutral (unmarked) form used for tone 5.
const TONE_MARKS: &[(char, [char; 5])] = &[
    ('a', ['ā', 'á', 'ǎ', 'à', 'a']),
    ('e', ['ē', 'é', 'ě', 'è', 'e']),
    ('i', ['ī', 'í', 'ǐ', 'ì', 'i']),
    ('o', ['ō', 'ó', 'ǒ', 'ò', 'o']),
    ('u', ['ū', 'ú', 'ǔ', 'ù', 'u']),
    ('ü', ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü']),
];

/// Render a full space-separated pronunciation string syllable by syllable.
pub fn render_pronunciation(numbered: &str) -> String {
    numbered
        .split_whitespace()
        .map(render_tone)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one numbered-tone syllable into diacritic form.
///
/// The trailing digit selects the tone; a missing or out-of-range digit means
/// neutral tone and leaves the letters unmarked. `v` becomes `ü` before the
/// vowel search so `nv3` renders as `nǚ`.
pub fn render_tone(syllable: &str) -> String {
    let (letters, tone) = split_tone(syllable);
    let base: String = letters
        .chars()
        .map(|c| if c == 'v' { 'ü' } else { c })
        .collect();

    let Some(tone) = tone else {
        return base;
    };
    let Some(mark_at) = mark_position(&base) else {
        return base;
    };

    base.chars()
        .enumerate()
        .map(|(i, c)| if i == mark_at { with_tone(c, tone) } else { c })
        .collect()
}

/// Split off a trailing tone digit. Returns `Some(tone)` only for tones 1–4;
/// tone 5 and unparseable digits both mean "no mark".
fn split_tone(syllable: &str) -> (&str, Option<usize>) {
    match syllable
        .chars()
        .next_back()
        .and_then(|last| last.to_digit(10))
    {
        Some(digit) => {
            let letters = &syllable[..syllable.len() - 1];
            if (1..=4).contains(&digit) {
                (letters, Some(digit as usize))
            } else {
                (letters, None)
            }
        }
        None => (syllable, None),
    }
}

/// Which character (by index) carries the tone mark.
///
/// Priority: first `a`, else first `e`, else the `o` of an `ou`, else the last
/// vowel scanning from the end. Consonant-only syllables (`hm`, `hng`) have no
/// mark position.
fn mark_position(base: &str) -> Option<usize> {
    let chars: Vec<char> = base.chars().collect();
    if let Some(i) = chars.iter().position(|&c| c == 'a') {
        return Some(i);
    }
    if let Some(i) = chars.iter().position(|&c| c == 'e') {
        return Some(i);
    }
    if let Some(i) = chars
        .windows(2)
        .position(|pair| pair == ['o', 'u'])
    {
        return Some(i);
    }
    chars
        .iter()
        .rposition(|&c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'ü'))
}

fn with_tone(vowel: char, tone: usize) -> char {
    for (plain, marks) in TONE_MARKS {
        if *plain == vowel {
            return marks[tone - 1];
        }
    }
    vowel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_the_four_tones() {
        assert_eq!(render_tone("ma1"), "mā");
        assert_eq!(render_tone("ma2"), "má");
        assert_eq!(render_tone("ma3"), "mǎ");
        assert_eq!(render_tone("ma4"), "mà");
    }

    #[test]
    fn neutral_and_missing_tones_are_unmarked() {
        assert_eq!(render_tone("ma5"), "ma");
        assert_eq!(render_tone("ma"), "ma");
        assert_eq!(render_tone("ma9"), "ma");
    }

    #[test]
    fn first_a_wins_over_later_vowels() {
        assert_eq!(render_tone("bai1"), "bāi");
        assert_eq!(render_tone("hao3"), "hǎo");
        assert_eq!(render_tone("huai4"), "huài");
    }

    #[test]
    fn e_wins_when_there_is_no_a() {
        assert_eq!(render_tone("hei1"), "hēi");
        assert_eq!(render_tone("xie4"), "xiè");
    }

    #[test]
    fn ou_marks_the_o() {
        assert_eq!(render_tone("gou3"), "gǒu");
        assert_eq!(render_tone("zhou1"), "zhōu");
    }

    #[test]
    fn falls_back_to_last_vowel() {
        assert_eq!(render_tone("liu2"), "liú");
        assert_eq!(render_tone("gui4"), "guì");
        assert_eq!(render_tone("lun2"), "lún");
    }

    #[test]
    fn v_becomes_umlaut_before_the_vowel_search() {
        assert_eq!(render_tone("nv3"), "nǚ");
        assert_eq!(render_tone("lv4"), "lǜ");
        assert_eq!(render_tone("nv5"), "nü");
    }

    #[test]
    fn consonant_only_syllables_pass_through() {
        assert_eq!(render_tone("hm5"), "hm");
        assert_eq!(render_tone("hng5"), "hng");
        assert_eq!(render_tone("m2"), "m");
    }

    #[test]
    fn pronunciation_renders_syllable_by_syllable() {
        assert_eq!(render_pronunciation("ni3 hao3"), "nǐ hǎo");
        assert_eq!(
            render_pronunciation("ni3 hao3"),
            format!("{} {}", render_tone("ni3"), render_tone("hao3"))
        );
        assert_eq!(render_pronunciation("Zhong1 guo2"), "Zhōng guó");
    }
}
