//! Header lookup by normalized column name.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::types::CellValue;

/// Normalize a header label for comparison.
///
/// Non-breaking spaces become spaces, diacritics are stripped (NFD, combining
/// marks dropped), whitespace runs fold to one space, the result is trimmed
/// and lower-cased. `"Číslo\u{a0}dokladu "` and `"cislo dokladu"` normalize
/// to the same string.
pub fn normalize_label(label: &str) -> String {
    let stripped: String = label
        .replace('\u{00A0}', " ")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 1-based position of the first header whose normalized text equals the
/// normalized `name`.
pub fn find_column(headers: &[CellValue], name: &str) -> Option<usize> {
    let target = normalize_label(name);
    headers
        .iter()
        .position(|h| !h.is_empty() && normalize_label(&h.to_text()) == target)
        .map(|i| i + 1)
}

/// Try each spelling in order; the first that resolves wins.
pub fn find_column_any(headers: &[CellValue], names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| find_column(headers, name))
}

/// 1-based position of the first string header equal to `name` after trimming.
///
/// No case or diacritic folding: mapping inputs are matched exactly.
pub fn find_exact_column(headers: &[CellValue], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.as_str().is_some_and(|s| s.trim() == name))
        .map(|i| i + 1)
}

/// `true` when `value` is text that normalizes to the same string as `label`.
pub fn is_label(value: &CellValue, label: &str) -> bool {
    value
        .as_str()
        .is_some_and(|s| normalize_label(s) == normalize_label(label))
}
