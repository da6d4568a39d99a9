// src/extractors/pattern_text.rs
//! Outlines that survive only as running text, e.g. a table of contents
//! flattened to `"5.1 By Product Type 5.1.1 Type A 5.1.2 Type B ..."`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::config::{or_defaults, SelectorConfig};
use super::filter::FilterRules;
use super::label::collapse_whitespace;
use super::{select_first_of, ExtractionStrategy};
use crate::document::DocumentView;
use crate::outline::RawEntry;

const DEFAULT_CONTAINERS: &[&str] = &["#table-of-content", ".table-of-content", "#toc"];

// Everything from the geography chapter on is regional detail.
static REGIONAL_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\.\d+\s+By\s+Geography").expect("Failed to compile REGIONAL_TAIL_RE")
});

static CLASSIFICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+)\s+By\s+([A-Za-z\s&/\-]+)").expect("Failed to compile CLASSIFICATION_RE")
});

#[derive(Debug, Clone)]
pub struct PatternTextStrategy {
    container_selectors: Vec<String>,
}

impl Default for PatternTextStrategy {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

impl PatternTextStrategy {
    pub fn from_config(selectors: &SelectorConfig) -> Self {
        Self {
            container_selectors: or_defaults(&selectors.text_container, DEFAULT_CONTAINERS),
        }
    }

    /// Scans a text blob directly.
    pub fn scan_text(&self, text: &str, rules: &FilterRules) -> Vec<RawEntry> {
        let text = collapse_whitespace(text);
        let body = match REGIONAL_TAIL_RE.find(&text) {
            Some(tail) => &text[..tail.start()],
            None => text.as_str(),
        };

        let mut entries = Vec::new();
        for caps in CLASSIFICATION_RE.captures_iter(body) {
            let (Some(whole), Some(numeral), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            if !at_numeral_boundary(body, whole.start()) {
                continue;
            }
            let label = collapse_whitespace(name.as_str());
            if label.is_empty() {
                continue;
            }
            if rules.is_stop(&label) {
                tracing::info!("Stop marker '{}' ends the text scan", label);
                break;
            }
            entries.push(RawEntry::numbered(label, numeral.as_str()));

            let sub_re = match Regex::new(&format!(
                r"({}\.\d+(?:\.\d+)*)\s+([A-Za-z\s&/\-]+)",
                regex::escape(numeral.as_str())
            )) {
                Ok(re) => re,
                Err(e) => {
                    tracing::warn!("Skipping sub-entries of {}: {}", numeral.as_str(), e);
                    continue;
                }
            };
            for sub in sub_re.captures_iter(body) {
                let (Some(whole), Some(sub_numeral), Some(sub_name)) = (sub.get(0), sub.get(1), sub.get(2)) else {
                    continue;
                };
                if !at_numeral_boundary(body, whole.start()) {
                    continue;
                }
                let sub_label = collapse_whitespace(sub_name.as_str());
                if sub_label.is_empty() {
                    continue;
                }
                if rules.is_stop(&sub_label) {
                    tracing::info!("Stop marker '{}' ends the text scan", sub_label);
                    return entries;
                }
                entries.push(RawEntry::numbered(sub_label, sub_numeral.as_str()));
            }
        }

        entries
    }
}

// A numeral glued to a preceding digit or dot (the "1.1" inside "15.1.1") is
// not the start of an entry.
fn at_numeral_boundary(text: &str, start: usize) -> bool {
    !text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

impl ExtractionStrategy for PatternTextStrategy {
    fn name(&self) -> &'static str {
        "pattern-text"
    }

    fn scan<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<RawEntry> {
        let text = match select_first_of(view, &self.container_selectors).into_iter().next() {
            Some(container) => container.normalized_text(),
            None => {
                tracing::debug!("No table-of-contents container, scanning the whole document text");
                view.normalized_text()
            }
        };
        self.scan_text(&text, rules)
    }
}
