// crates/coffeemap-core/src/text.rs

//! # Name Normalizer
//!
//! Turns a free-text country name into a comparison key. The key tolerates
//! accents, punctuation, casing and political qualifiers, so that
//! `"Bolivia (Plurinational State of)"` and `"Bolivia"` compare equal.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words dropped from keys. They carry no identity in country names.
pub const STOPWORDS: [&str; 9] = [
    "the",
    "of",
    "and",
    "de",
    "del",
    "la",
    "el",
    "plurinational",
    "state",
];

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("parenthesis pattern is valid"));

static STOPWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = STOPWORDS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("stopword pattern is valid")
});

/// Canonicalize a raw country name into its normalized key.
///
/// Steps, in this order:
/// 1. trim
/// 2. drop `( ... )` groups (non-greedy, no nesting)
/// 3. strip diacritics (NFKD, then drop combining marks)
/// 4. `&` becomes `and`
/// 5. `-`, `/` and apostrophes become a space
/// 6. keep only ASCII letters, digits and whitespace; letters that do not
///    decompose (`ø`, `ł`, `ß`, CJK) are dropped here
/// 7. drop the [`STOPWORDS`] as whole words, ignoring case
/// 8. collapse whitespace and lowercase
///
/// The result only contains `[a-z0-9 ]` and `normalize(&normalize(s)) == normalize(s)`.
///
/// # Examples
///
/// ```rust
/// use coffeemap_core::text::normalize;
///
/// assert_eq!(normalize("Bolivia (Plurinational State of)"), "bolivia");
/// assert_eq!(normalize("Côte d'Ivoire"), "cote d ivoire");
/// assert_eq!(normalize("Congo, Dem. Rep. of the"), "congo dem rep");
/// ```
pub fn normalize(raw: &str) -> String {
    let s = raw.trim();
    let s = PARENTHESIZED.replace_all(s, "");
    let s = strip_accents(&s);
    let s = s.replace('&', "and");

    let cleaned: String = s
        .chars()
        .map(|c| if is_separator(c) { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let without_stopwords = STOPWORD_PATTERN.replace_all(&cleaned, "");

    without_stopwords
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Like [`normalize`], but a missing value yields an empty key.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Remove diacritics while keeping the base letter.
///
/// Compatibility decomposition splits `é` into `e` + U+0301; the combining
/// mark is then dropped. Letters with no decomposition pass through as-is.
pub fn strip_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

#[inline]
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '/' | '\'' | '\u{2019}' | '\u{02BC}' | '`')
}

/// Convert a string into a folded key for loose comparisons.
///
/// Transliterates Unicode to ASCII and lowercases. Unlike [`normalize`], it
/// keeps punctuation and stopwords; it is meant for labels such as metric
/// names or coffee types, not for country matching.
///
/// ```rust
/// use coffeemap_core::text::fold_key;
///
/// assert_eq!(fold_key("Exportación"), "exportacion");
/// assert_eq!(fold_key("Robusta/Arabica"), "robusta/arabica");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Equality on [`fold_key`] form, ignoring surrounding whitespace.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a.trim()) == fold_key(b.trim())
}
