// src/outline/segments.rs
use indexmap::IndexMap;

use super::flatten::parse_line;
use super::normalize::dot_count;
use crate::extractors::label::title_case;

/// Top-level label -> its direct sub-labels, both title-cased, in outline order.
pub type SegmentMap = IndexMap<String, Vec<String>>;

/// Derives the two-level grouping from a flattened outline.
///
/// Depth-0 lines open a group, depth-1 lines join the open group, anything
/// deeper is ignored. Groups that end up empty are dropped.
pub fn group<S: AsRef<str>>(lines: &[S]) -> SegmentMap {
    let mut segments = SegmentMap::new();
    let mut current: Option<String> = None;

    for line in lines {
        let Some((numeral, label)) = parse_line(line.as_ref()) else {
            continue;
        };
        match dot_count(&numeral) {
            Some(0) => {
                let key = title_case(&label);
                segments.entry(key.clone()).or_default();
                current = Some(key);
            }
            Some(1) => {
                let Some(key) = current.as_ref() else { continue };
                let value = title_case(&label);
                if let Some(values) = segments.get_mut(key) {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            _ => {}
        }
    }

    segments.retain(|_, values| !values.is_empty());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_levels_title_cased() {
        let lines = vec![
            "1. PRODUCT TYPE",
            "1.1. solar panels",
            "1.1.1. Ignored Third Level",
            "1.2. Inverters",
            "2. Empty Heading",
            "3. Application",
            " 3.1. Residential",
            " 3.2. Residential",
        ];
        let segments = group(&lines);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments["Product Type"], vec!["Solar Panels", "Inverters"]);
        assert_eq!(segments["Application"], vec!["Residential"]);
        assert!(!segments.contains_key("Empty Heading"));
        let keys: Vec<_> = segments.keys().cloned().collect();
        assert_eq!(keys, vec!["Product Type", "Application"]);
    }

    #[test]
    fn test_orphan_sub_lines_ignored() {
        let segments = group(&["1.1. No parent yet", "garbage"]);
        assert!(segments.is_empty());
    }
}
