//! Compiled patterns and keyword tables used by the decoder rules

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// "2x to calculate", "x2 to calc", "double it to calculate"
    pub static ref FULL_REIMBURSEMENT: Regex =
        Regex::new(r"(?i)\b(?:2x|x2|double(?:\s+it)?)\s+to\s+calc(?:ulate)?\b").unwrap();

    /// "100% Jordyn", "100 % for ryan"
    pub static ref PERSONAL: Regex =
        Regex::new(r"(?i)\b100\s*%\s*(?:for\s+)?(ryan|jordyn)\b").unwrap();

    pub static ref EXCLUSION_KEYWORD: Regex =
        Regex::new(r"(?i)\b(remove|exclude|deduct)\b").unwrap();

    /// First `$` amount anywhere after the keyword
    pub static ref EXCLUSION_DOLLAR_AMOUNT: Regex =
        Regex::new(r"(?i)\b(?:remove|exclude|deduct)\b.*?\$\s*(\d[\d,]*(?:\.\d+)?|\.\d+)").unwrap();

    /// Bare number directly after the keyword, tolerating markdown emphasis
    pub static ref EXCLUSION_BARE_AMOUNT: Regex =
        Regex::new(r"(?i)\b(?:remove|exclude|deduct)\b[\s*:]*(\d[\d,]*(?:\.\d+)?|\.\d+)").unwrap();

    /// "split" followed by at least two dollar amounts
    pub static ref SPLIT_AMOUNTS: Regex =
        Regex::new(r"(?i)\bsplit\b.*?\$\s*\d[\d,.]*.*?\$\s*\d").unwrap();

    /// Card or cash paired with EBT on either side of a `/`, each side
    /// optionally carrying its own `$` amount
    pub static ref SPLIT_INSTRUMENTS: Regex = Regex::new(
        r"(?i)\b(?:credit\s+card|debit|card|cash)\s*/\s*(?:\$\s*[\d.,]+\s*)?ebt\b|\bebt\s*/\s*(?:\$\s*[\d.,]+\s*)?(?:credit\s+card|debit|card|cash)\b"
    )
    .unwrap();
}

/// Gift keywords; the longest match is reported
pub const GIFT_KEYWORDS: &[&str] = &[
    "birthday",
    "christmas",
    "xmas",
    "anniversary",
    "valentine",
    "wedding",
    "mother's day",
    "father's day",
    "graduation",
    "present",
    "gift",
];

/// Markers of an unresolved split, checked in order
pub const UNCLEAR_MARKERS: &[&str] = &[
    "lost",
    "discuss",
    "???",
    "reassess",
    "difficult to determine",
    "unsure",
    "not sure",
    "unclear",
];

/// Longest gift keyword contained in `lowered`; ties go to the earlier entry
pub fn longest_gift_keyword(lowered: &str) -> Option<&'static str> {
    GIFT_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| lowered.contains(keyword))
        .fold(None, |best, keyword| match best {
            Some(current) if current.len() >= keyword.len() => Some(current),
            _ => Some(keyword),
        })
}

/// Amount to exclude after an exclusion keyword, commas stripped
///
/// A `$` amount wins over a bare number, so counts such as "2 bottles" are
/// never read as money.
pub fn exclusion_amount(text: &str) -> Option<String> {
    let captures = EXCLUSION_DOLLAR_AMOUNT
        .captures(text)
        .or_else(|| EXCLUSION_BARE_AMOUNT.captures(text))?;
    let digits = captures[1].replace(',', "");
    if digits.starts_with('.') {
        Some(format!("0{}", digits))
    } else {
        Some(digits)
    }
}

/// First unclear marker contained in `lowered`
pub fn first_unclear_marker(lowered: &str) -> Option<&'static str> {
    UNCLEAR_MARKERS
        .iter()
        .copied()
        .find(|marker| lowered.contains(marker))
}
