// src/extractors/nested_list.rs
use super::config::{or_defaults, SelectorConfig};
use super::filter::FilterRules;
use super::label::{strip_marker_word, strip_parentheticals, strip_trailing_by_clause, strip_trailing_outlook};
use super::{is_list, item_text, list_items, select_first_of, ExtractionStrategy};
use crate::document::DocumentView;
use crate::outline::RawEntry;

const DEFAULT_LIST_CONTAINERS: &[&str] = &["div.report_summary > ul", "div.toc > ul", "ul"];

/// Outline encoded as lists of items, each item optionally holding a sub-list.
#[derive(Debug, Clone)]
pub struct NestedListStrategy {
    list_selectors: Vec<String>,
}

impl Default for NestedListStrategy {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

impl NestedListStrategy {
    pub fn from_config(selectors: &SelectorConfig) -> Self {
        Self {
            list_selectors: or_defaults(&selectors.list_container, DEFAULT_LIST_CONTAINERS),
        }
    }

    fn item_label<V: DocumentView>(item: &V, depth: usize) -> Option<String> {
        let raw = item_text(item);
        let mut label = strip_trailing_by_clause(&strip_parentheticals(&raw));
        if depth == 0 {
            label = strip_trailing_outlook(&strip_marker_word(&label));
        }
        (!label.is_empty()).then_some(label)
    }
}

impl ExtractionStrategy for NestedListStrategy {
    fn name(&self) -> &'static str {
        "nested-list"
    }

    fn scan<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<RawEntry> {
        let Some(list) = select_first_of(view, &self.list_selectors).into_iter().next() else {
            tracing::debug!("No list container found");
            return Vec::new();
        };

        let mut entries = Vec::new();
        let mut work: Vec<(V, usize)> = list_items(&list).into_iter().rev().map(|li| (li, 0)).collect();

        while let Some((item, depth)) = work.pop() {
            if rules.is_stop(&item_text(&item)) {
                tracing::info!("Stop marker reached after {} entries", entries.len());
                break;
            }
            // An item with no usable label takes its sub-list with it.
            let Some(label) = Self::item_label(&item, depth) else {
                continue;
            };
            entries.push(RawEntry::at_level(label, depth));

            if depth < rules.max_depth {
                let nested: Vec<V> = item
                    .children()
                    .into_iter()
                    .filter(is_list)
                    .flat_map(|sub| list_items(&sub))
                    .collect();
                work.extend(nested.into_iter().rev().map(|li| (li, depth + 1)));
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn scan_labels(html: &str) -> Vec<(String, usize)> {
        let document = Document::parse(html);
        let rules = FilterRules {
            max_depth: 2,
            ..FilterRules::default()
        };
        NestedListStrategy::default()
            .scan(&document.root(), &rules)
            .into_iter()
            .map(|e| match e.signal {
                crate::outline::DepthSignal::Level(depth) => (e.label, depth),
                crate::outline::DepthSignal::Numeral(_) => (e.label, usize::MAX),
            })
            .collect()
    }

    #[test]
    fn test_scan_cleans_labels_in_document_order() {
        let html = r#"
            <ul>
              <li><strong>Product Outlook (Revenue, USD Million, 2018 - 2030)</strong>
                <ul>
                  <li>Sensors By Application</li>
                  <li>Actuators</li>
                </ul>
              </li>
              <li>By Technology
                <ul><li>Wireless</li></ul>
              </li>
            </ul>"#;
        assert_eq!(
            scan_labels(html),
            vec![
                ("Product".to_string(), 0),
                ("Sensors".to_string(), 1),
                ("Actuators".to_string(), 1),
                ("Technology".to_string(), 0),
                ("Wireless".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_stop_marker_ends_scan() {
        let html = r#"
            <ul>
              <li>Segment A<ul><li>A1</li><li>A2</li></ul></li>
              <li>Company Profiles<ul><li>Acme</li></ul></li>
              <li>Segment Z</li>
            </ul>"#;
        let labels: Vec<String> = scan_labels(html).into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Segment A", "A1", "A2"]);
    }

    #[test]
    fn test_unlabeled_item_skips_subtree_and_depth_is_capped() {
        let html = r#"
            <ul>
              <li><span></span><ul><li>Hidden</li></ul></li>
              <li>Top<ul><li>Mid<ul><li>Low<ul><li>Below max</li></ul></li></ul></li></ul></li>
            </ul>"#;
        assert_eq!(
            scan_labels(html),
            vec![
                ("Top".to_string(), 0),
                ("Mid".to_string(), 1),
                ("Low".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_no_list_is_empty() {
        assert!(scan_labels("<p>No lists here</p>").is_empty());
    }
}
