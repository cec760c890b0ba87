//! Name canonicalization.
//!
//! Every string that enters a comparison, roster side or OCR side, goes
//! through `normalize_name` first, so the edit distance only sees
//! differences that matter: accents are stripped, the charset is reduced
//! to what a results screen can plausibly render, and whitespace and case
//! are folded.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Characters that survive normalization (checked after decomposition).
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '[' | ']' | '|' | '.')
}

/// Canonicalizes a raw OCR or roster string for comparison.
///
/// NFKD-decomposes the input so accented letters split into a base letter
/// plus combining marks, drops the marks, removes everything outside the
/// allowed charset, collapses whitespace runs, trims, and lowercases.
/// Never fails; an empty result marks the row as blank.
pub fn normalize_name(s: &str) -> String {
    let stripped: String = s
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| is_allowed(*c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize_name("  PlayerOne  "), "playerone");
    }

    #[test]
    fn test_collapses_inner_whitespace() {
        assert_eq!(normalize_name("a   b\t c"), "a b c");
    }

    #[test]
    fn test_strips_accents() {
        assert_eq!(normalize_name("Émilie Café"), "emilie cafe");
        assert_eq!(normalize_name("über"), "uber");
    }

    #[test]
    fn test_decomposes_fullwidth_forms() {
        // NFKD maps fullwidth compatibility characters to ASCII
        assert_eq!(normalize_name("ＡＢＣ１２３"), "abc123");
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        assert_eq!(normalize_name("[TAG] Player_1|alt-x."), "[tag] player_1|alt-x.");
    }

    #[test]
    fn test_drops_symbols() {
        assert_eq!(normalize_name("Star*Lord!!"), "starlord");
        assert_eq!(normalize_name("name™©"), "name");
    }

    #[test]
    fn test_garbage_maps_to_blank() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("★☆♥"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["Émilie Café", "  A   B  ", "[TAG] Player_1", "★x★"];
        for input in inputs {
            let once = normalize_name(input);
            assert_eq!(normalize_name(&once), once, "not idempotent for {input:?}");
        }
    }
}
