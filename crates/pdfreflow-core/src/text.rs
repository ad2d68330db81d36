//! Text normalization for words, table cells and header comparison.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::words::Word;

/// Any run of whitespace, including non-breaking and narrow no-break spaces.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{00A0}\u{202F}\u{2007}]+").expect("valid regex"));

/// Unicode normalization form to apply to word text before layout analysis.
///
/// Different PDF generators may produce different Unicode representations
/// for the same visual text (e.g., composed vs. decomposed accented chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnicodeNorm {
    /// No normalization (default).
    #[default]
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    Nfkc,
}

impl UnicodeNorm {
    /// Apply this normalization form to the given string.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
        }
    }
}

/// Apply Unicode normalization to the text of each word.
///
/// Geometry and font metadata are preserved unchanged.
pub fn normalize_words(words: &[Word], norm: UnicodeNorm) -> Vec<Word> {
    if norm == UnicodeNorm::None {
        return words.to_vec();
    }
    words
        .iter()
        .map(|w| Word {
            text: norm.normalize(&w.text),
            ..w.clone()
        })
        .collect()
}

/// Normalize raw cell text: collapse whitespace and newlines to single
/// spaces, turn non-breaking spaces into plain spaces, and trim.
pub fn normalize_cell_text(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Comparison key for a header cell: collapsed whitespace, compatibility
/// normalized and case folded.
pub fn header_key(text: &str) -> String {
    let folded: String = text.nfkc().flat_map(char::to_lowercase).collect();
    normalize_cell_text(&folded)
}

/// Element-wise header equality on [`header_key`]s.
pub fn headers_equal<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| header_key(x.as_ref()) == header_key(y.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_cell_collapses_whitespace() {
        assert_eq!(normalize_cell_text("  Total\n  amount \t due "), "Total amount due");
    }

    #[test]
    fn normalize_cell_strips_nbsp() {
        assert_eq!(normalize_cell_text("1\u{00A0}234\u{00A0}"), "1 234");
        assert_eq!(normalize_cell_text("\u{202F}x"), "x");
    }

    #[test]
    fn normalize_cell_empty() {
        assert_eq!(normalize_cell_text(""), "");
        assert_eq!(normalize_cell_text(" \n "), "");
    }

    #[test]
    fn header_key_casefolds() {
        assert_eq!(header_key("  Unit   PRICE "), "unit price");
        assert_eq!(header_key("ＡＢＣ"), "abc");
    }

    #[test]
    fn headers_equal_ignores_case_and_spacing() {
        assert!(headers_equal(&["A", "B"], &["a", "  b "]));
        assert!(!headers_equal(&["A", "B"], &["A", "C"]));
        assert!(!headers_equal(&["A", "B"], &["A"]));
    }

    #[test]
    fn unicode_norm_none_is_identity() {
        assert_eq!(UnicodeNorm::None.normalize("e\u{0301}"), "e\u{0301}");
    }

    #[test]
    fn unicode_norm_nfc_composes() {
        assert_eq!(UnicodeNorm::Nfc.normalize("e\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn normalize_words_preserves_geometry() {
        let words = vec![Word::new("\u{FB01}ne", 1.0, 2.0, 3.0, 4.0)];
        let out = normalize_words(&words, UnicodeNorm::Nfkc);
        assert_eq!(out[0].text, "fine");
        assert_eq!(out[0].bbox, words[0].bbox);
    }
}
