// src/outline/flatten.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::nest;
use super::{OutlineEntry, OutlineNode, RawEntry};

// "1.2.3. Label", tolerating leading indentation and a missing final dot.
static FLATTENED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)*)\.?\s+(.+?)\s*$").expect("Failed to compile FLATTENED_LINE_RE")
});

/// Renders canonical entries as `"<dotted path>. <label>"`, optionally
/// indented by one space per depth level.
pub fn flatten(entries: &[OutlineEntry], indent: bool) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let pad = if indent { " ".repeat(entry.depth()) } else { String::new() };
            format!("{}{}. {}", pad, entry.dotted_path(), entry.label)
        })
        .collect()
}

/// Splits a flattened line into its numeral and label.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let caps = FLATTENED_LINE_RE.captures(line)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Reads a flattened outline back into a forest. Lines without a leading
/// numeral are skipped.
pub fn parse_outline<S: AsRef<str>>(lines: &[S]) -> Vec<OutlineNode> {
    let entries = lines
        .iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .map(|(numeral, label)| RawEntry::numbered(label, numeral))
        .collect();
    nest(entries, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::super::normalize::renumber;
    use super::*;

    fn entry(path: &[usize], label: &str) -> OutlineEntry {
        OutlineEntry {
            path: path.to_vec(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_flatten_plain_and_indented() {
        let entries = vec![
            entry(&[1], "Product Type"),
            entry(&[1, 1], "Type A"),
            entry(&[1, 1, 1], "Type A1"),
        ];
        assert_eq!(
            flatten(&entries, false),
            vec!["1. Product Type", "1.1. Type A", "1.1.1. Type A1"]
        );
        assert_eq!(
            flatten(&entries, true),
            vec!["1. Product Type", " 1.1. Type A", "  1.1.1. Type A1"]
        );
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("  1.2. Sub A2"),
            Some(("1.2".to_string(), "Sub A2".to_string()))
        );
        assert_eq!(parse_line("3 Heading"), Some(("3".to_string(), "Heading".to_string())));
        assert_eq!(parse_line("Heading without number"), None);
    }

    #[test]
    fn test_reflatten_is_identity() {
        let lines = vec![
            "1. Segment A",
            " 1.1. Sub A1",
            "  1.1.1. Deep",
            " 1.2. Sub A2",
            "2. Segment B",
            " 2.1. Sub B1",
        ];
        let once = flatten(&renumber(&parse_outline(&lines)), true);
        assert_eq!(once, lines);
        let twice = flatten(&renumber(&parse_outline(&once)), true);
        assert_eq!(twice, once);
    }
}
