//! Canonical creative-name keys.
//!
//! Insight rows and sale rows frequently spell the same creative
//! differently (casing, stray punctuation, doubled spaces). Everything
//! downstream joins the two sources on the standardized form produced here.

use crate::utils::config::UNKNOWN_NAME;

/// Standardize a creative name into its canonical key
///
/// **Public** - the join key for every cross-source lookup
///
/// Cleaning steps, in order: collapse whitespace runs, drop characters
/// that are not alphanumeric/whitespace/hyphen/underscore, lowercase,
/// then title-case each word. Empty and whitespace-only input maps to
/// the fixed sentinel name.
///
/// Characters are dropped, not replaced with a separator, so
/// "Ad#1 Test" and "Ad1 Test" produce the same key. That collapsing is
/// what lets a punctuated spelling on the sales side find its insight
/// rows, and must not be changed to insert separators.
///
/// # Example
/// ```
/// use creative_metrics_studio::aggregator::standardize_name;
///
/// assert_eq!(standardize_name("  promo   VERÃO!! "), "Promo Verão");
/// assert_eq!(standardize_name(""), "Nome Desconhecido");
/// ```
pub fn standardize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return UNKNOWN_NAME.to_string();
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();

    cleaned
        .to_lowercase()
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<String>>()
        .join(" ")
}

/// Uppercase the first character of an already-lowercased word
///
/// **Private** - internal helper for standardize_name
fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
