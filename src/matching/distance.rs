//! Weighted edit distance between an expected name and observed OCR text.

use serde::{Deserialize, Serialize};

/// Independent integer costs for the three edit operations.
///
/// The distance is directional: insertions add characters present only in
/// the observed text, deletions remove characters present only in the
/// expected text. With unequal insert/delete weights the distance is not
/// symmetric, so callers keep the expected string on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditWeights {
    pub insert: u32,
    pub delete: u32,
    pub substitute: u32,
}

impl Default for EditWeights {
    fn default() -> Self {
        Self {
            insert: 1,
            delete: 1,
            substitute: 1,
        }
    }
}

/// Minimum weighted cost of editing `a` (expected) into `b` (observed).
///
/// Two-row dynamic programming: O(|a|*|b|) time, O(|b|) space. Operates on
/// chars, so multi-byte input counts per character, not per byte.
pub fn weighted_edit_distance(a: &str, b: &str, w: &EditWeights) -> u32 {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len() as u32 * w.insert;
    }
    if b.is_empty() {
        return a.len() as u32 * w.delete;
    }

    // prev[j] = cost of editing a[..i] into b[..j]
    let mut prev: Vec<u32> = (0..=b.len()).map(|j| j as u32 * w.insert).collect();
    let mut curr = vec![0u32; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = (i as u32 + 1) * w.delete;
        for (j, &cb) in b.iter().enumerate() {
            let sub = if ca == cb { 0 } else { w.substitute };
            curr[j + 1] = (curr[j] + w.insert)
                .min(prev[j + 1] + w.delete)
                .min(prev[j] + sub);
        }
        prev.copy_from_slice(&curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> EditWeights {
        EditWeights::default()
    }

    #[test]
    fn test_identical_strings_cost_zero() {
        let heavy = EditWeights {
            insert: 7,
            delete: 5,
            substitute: 9,
        };
        for s in ["", "a", "player one", "[tag] x"] {
            assert_eq!(weighted_edit_distance(s, s, &unit()), 0);
            assert_eq!(weighted_edit_distance(s, s, &heavy), 0);
        }
    }

    #[test]
    fn test_empty_expected_costs_insertions() {
        let w = EditWeights {
            insert: 3,
            delete: 1,
            substitute: 1,
        };
        assert_eq!(weighted_edit_distance("", "abcd", &w), 12);
    }

    #[test]
    fn test_empty_observed_costs_deletions() {
        let w = EditWeights {
            insert: 1,
            delete: 4,
            substitute: 1,
        };
        assert_eq!(weighted_edit_distance("abc", "", &w), 12);
    }

    #[test]
    fn test_classic_levenshtein() {
        assert_eq!(weighted_edit_distance("kitten", "sitting", &unit()), 3);
        assert_eq!(weighted_edit_distance("flaw", "lawn", &unit()), 2);
    }

    #[test]
    fn test_single_substitution() {
        let w = EditWeights {
            insert: 1,
            delete: 1,
            substitute: 5,
        };
        // One substitution (5) beats delete+insert (2) only when cheaper
        assert_eq!(weighted_edit_distance("cat", "cut", &w), 2);
        let w = EditWeights {
            insert: 3,
            delete: 3,
            substitute: 1,
        };
        assert_eq!(weighted_edit_distance("cat", "cut", &w), 1);
    }

    #[test]
    fn test_directional_weights() {
        let w = EditWeights {
            insert: 5,
            delete: 7,
            substitute: 1,
        };
        // "ab" -> "abc" adds one observed char: one insertion
        assert_eq!(weighted_edit_distance("ab", "abc", &w), 5);
        // "abc" -> "ab" removes one expected char: one deletion
        assert_eq!(weighted_edit_distance("abc", "ab", &w), 7);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // Multi-byte chars count once each
        assert_eq!(weighted_edit_distance("héllo", "hello", &unit()), 1);
    }
}
