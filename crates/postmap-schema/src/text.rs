//! Offline text analytics: script-based language detection and a lexicon
//! sentiment scorer.

/// Language code reported when no script dominates or the text is empty.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

#[derive(Debug, Default)]
struct ScriptCounts {
    latin: usize,
    ascii_latin: usize,
    vietnamese: usize,
    han: usize,
    kana: usize,
    hangul: usize,
    thai: usize,
    cyrillic: usize,
    arabic: usize,
    devanagari: usize,
}

impl ScriptCounts {
    fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for ch in text.chars().filter(|c| c.is_alphabetic()) {
            match ch as u32 {
                0x1100..=0x11FF | 0x3130..=0x318F | 0xAC00..=0xD7AF => counts.hangul += 1,
                0x3040..=0x30FF => counts.kana += 1,
                0x3400..=0x4DBF | 0x4E00..=0x9FFF => counts.han += 1,
                0x0E00..=0x0E7F => counts.thai += 1,
                0x0400..=0x04FF => counts.cyrillic += 1,
                0x0600..=0x06FF | 0x0750..=0x077F => counts.arabic += 1,
                0x0900..=0x097F => counts.devanagari += 1,
                _ if ch.is_ascii_alphabetic() => {
                    counts.latin += 1;
                    counts.ascii_latin += 1;
                }
                _ if is_vietnamese_letter(ch) => {
                    counts.latin += 1;
                    counts.vietnamese += 1;
                }
                0x00C0..=0x024F | 0x1E00..=0x1EFF => counts.latin += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Letters that only Vietnamese orthography produces in practice: the
/// horn/breve vowels, `đ`, and the stacked tone marks of Latin Extended
/// Additional.
fn is_vietnamese_letter(ch: char) -> bool {
    matches!(
        ch,
        'đ' | 'Đ' | 'ơ' | 'Ơ' | 'ư' | 'Ư' | 'ă' | 'Ă' | 'ĩ' | 'Ĩ' | 'ũ' | 'Ũ'
    ) || ('\u{1EA0}'..='\u{1EF9}').contains(&ch)
}

/// Detects the dominant language of `text` as an ISO 639-1 code.
///
/// Returns one of `vi`, `en`, `zh`, `ja`, `ko`, `th`, `ru`, `ar`, `hi`, or
/// [`UNKNOWN_LANGUAGE`].
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    let counts = ScriptCounts::of(text);

    let cjk = counts.han + counts.kana;
    let candidates = [
        (counts.latin, "latin"),
        (cjk, "cjk"),
        (counts.hangul, "ko"),
        (counts.thai, "th"),
        (counts.cyrillic, "ru"),
        (counts.arabic, "ar"),
        (counts.devanagari, "hi"),
    ];
    let Some(&(count, script)) = candidates.iter().max_by_key(|(count, _)| *count) else {
        return UNKNOWN_LANGUAGE;
    };
    if count == 0 {
        return UNKNOWN_LANGUAGE;
    }

    match script {
        "cjk" if counts.kana > 0 => "ja",
        "cjk" => "zh",
        "latin" => latin_language(&counts),
        other => other,
    }
}

#[allow(clippy::cast_precision_loss)]
fn latin_language(counts: &ScriptCounts) -> &'static str {
    // A handful of Vietnamese-only letters is decisive; other diacritics are
    // too ambiguous to name a language.
    if counts.vietnamese > 0 && counts.vietnamese * 25 >= counts.latin {
        return "vi";
    }
    let ascii_ratio = counts.ascii_latin as f64 / counts.latin.max(1) as f64;
    if ascii_ratio > 0.9 {
        "en"
    } else {
        UNKNOWN_LANGUAGE
    }
}

/// Word weights for the sentiment lexicon.
///
/// Keys are lowercase single words (English and Vietnamese syllables).
/// Values in `(0.0, 1.0]` are positive, in `[-1.0, 0.0)` are negative.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 0.3),
    ("great", 0.4),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("best", 0.5),
    ("happy", 0.4),
    ("healthy", 0.3),
    ("delicious", 0.4),
    ("recommend", 0.4),
    ("quality", 0.3),
    ("perfect", 0.5),
    ("thanks", 0.2),
    ("tốt", 0.4),
    ("ngon", 0.4),
    ("thích", 0.4),
    ("yêu", 0.5),
    ("tuyệt", 0.5),
    ("khỏe", 0.3),
    ("vui", 0.4),
    ("đẹp", 0.3),
    // Negative signals
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("hate", -0.6),
    ("sad", -0.4),
    ("problem", -0.3),
    ("dangerous", -0.6),
    ("harmful", -0.6),
    ("recall", -0.7),
    ("fake", -0.5),
    ("scam", -0.7),
    ("xấu", -0.4),
    ("tệ", -0.6),
    ("dở", -0.4),
    ("ghét", -0.6),
    ("buồn", -0.4),
    ("giả", -0.5),
    ("lừa", -0.6),
];

/// Scores `text` with the lexicon.
///
/// Splits into lowercase words, sums matching weights and clamps the result to
/// `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn sentiment_score(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}
