//! Internal helpers for label normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! matching rules so every module compares labels the same way.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Sentinel the ledger store writes when an entry has no cost center.
pub(crate) const UNDEFINED_COST_CENTER: &str = "undefined";

/// Fold a label into a comparison key: trimmed, compatibility decomposition,
/// combining marks dropped, lowercased. Punctuation and inner spacing are kept.
pub(crate) fn fold_label(input: &str) -> String {
    input
        .trim()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve a raw cost-center code, mapping blanks and the `"undefined"`
/// sentinel to `None`.
pub(crate) fn cost_center_code(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|code| !code.is_empty() && !code.eq_ignore_ascii_case(UNDEFINED_COST_CENTER))
        .map(ToString::to_string)
}

/// Last `n` characters of an identifier (the whole id when shorter).
pub(crate) fn id_suffix(id: &str, n: usize) -> &str {
    let count = id.chars().count();
    if count <= n {
        return id;
    }
    let start = id
        .char_indices()
        .nth(count - n)
        .map_or(0, |(idx, _)| idx);
    &id[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_label_drops_case_and_accents() {
        assert_eq!(fold_label("  Ingreso "), "ingreso");
        assert_eq!(fold_label("INGRÉSO"), "ingreso");
        assert_eq!(fold_label("   "), "");
    }

    #[test]
    fn fold_label_keeps_punctuation_and_spacing() {
        assert_eq!(fold_label("income."), "income.");
        assert_eq!(fold_label("Ingreso!!"), "ingreso!!");
        assert_eq!(fold_label("cost__of  goods"), "cost__of  goods");
    }

    #[test]
    fn cost_center_sentinel_is_missing() {
        assert_eq!(cost_center_code(None), None);
        assert_eq!(cost_center_code(Some("  ")), None);
        assert_eq!(cost_center_code(Some("undefined")), None);
        assert_eq!(cost_center_code(Some("UNDEFINED")), None);
        assert_eq!(cost_center_code(Some(" CC-01 ")), Some("CC-01".to_string()));
    }

    #[test]
    fn id_suffix_takes_last_chars() {
        assert_eq!(id_suffix("64f1c2a9b7e3d4", 6), "b7e3d4");
        assert_eq!(id_suffix("abc", 6), "abc");
        assert_eq!(id_suffix("", 6), "");
    }
}
