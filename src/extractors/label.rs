// src/extractors/label.rs
//! Label clean-up shared by the strategies.

use once_cell::sync::Lazy;
use regex::Regex;

pub use crate::document::collapse_whitespace;

static LEADING_NUMERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+(?:\.\d+)*\.?\s*").expect("Failed to compile LEADING_NUMERAL_RE")
});

static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\([^)]*\)").expect("Failed to compile PARENTHETICAL_RE")
});

static TRAILING_BY_CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+by\s+.*$").expect("Failed to compile TRAILING_BY_CLAUSE_RE")
});

static TRAILING_OUTLOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+outlook$").expect("Failed to compile TRAILING_OUTLOOK_RE")
});

static LEADING_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^by\s+").expect("Failed to compile LEADING_MARKER_RE")
});

static MARKER_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bby\b").expect("Failed to compile MARKER_WORD_RE")
});

// Name after the "by" marker, up to an opening parenthesis.
static CLASSIFICATION_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bby\s+([^(]+)").expect("Failed to compile CLASSIFICATION_NAME_RE")
});

pub fn word_count(label: &str) -> usize {
    label.split_whitespace().count()
}

/// Drops a leading source numeral such as `"7.2.1 "` or `"3. "`.
pub fn strip_numbering(label: &str) -> String {
    LEADING_NUMERAL_RE.replace(label, "").trim().to_string()
}

pub fn strip_parentheticals(label: &str) -> String {
    collapse_whitespace(&PARENTHETICAL_RE.replace_all(label, ""))
}

/// `"Product Type Outlook By Application"` -> `"Product Type Outlook"`.
pub fn strip_trailing_by_clause(label: &str) -> String {
    TRAILING_BY_CLAUSE_RE.replace(label, "").trim().to_string()
}

pub fn strip_trailing_outlook(label: &str) -> String {
    TRAILING_OUTLOOK_RE.replace(label, "").trim().to_string()
}

/// `"By Product Type"` -> `"Product Type"`; other labels pass through.
pub fn strip_marker_word(label: &str) -> String {
    LEADING_MARKER_RE.replace(label.trim(), "").trim().to_string()
}

/// Case-insensitive prefix test for the "by" marker.
pub fn starts_with_marker(label: &str) -> bool {
    LEADING_MARKER_RE.is_match(label.trim_start())
}

/// True when the label carries the "by" marker word anywhere.
pub fn is_classification_heading(label: &str) -> bool {
    MARKER_WORD_RE.is_match(label)
}

/// Text following the first "by" marker, trimmed at any parenthesis.
pub fn classification_name(label: &str) -> Option<String> {
    let caps = CLASSIFICATION_NAME_RE.captures(label)?;
    let name = collapse_whitespace(caps.get(1)?.as_str());
    (!name.is_empty()).then_some(name)
}

pub fn is_fully_parenthesized(label: &str) -> bool {
    let trimmed = label.trim();
    trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')')
}

/// Capitalizes the first letter of every alphabetic run and lower-cases the
/// rest. An apostrophe inside a word does not start a new one.
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_word = false;
    for ch in label.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = in_word && (ch == '\'' || ch == '\u{2019}');
        }
    }
    out
}
