// src/extractors/heading_run.rs
use super::config::{or_defaults, SelectorConfig};
use super::filter::FilterRules;
use super::label::{starts_with_marker, strip_marker_word};
use super::{is_list, leaf_items, select_first_of, ExtractionStrategy};
use crate::document::DocumentView;
use crate::outline::RawEntry;

const DEFAULT_CONTAINERS: &[&str] = &["div.tab-content", "div.report-segmentation"];

/// Outline encoded as a flat run of siblings: "By ..." headings each followed
/// by one or more lists.
#[derive(Debug, Clone)]
pub struct HeadingRunStrategy {
    container_selectors: Vec<String>,
}

impl Default for HeadingRunStrategy {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

impl HeadingRunStrategy {
    pub fn from_config(selectors: &SelectorConfig) -> Self {
        Self {
            container_selectors: or_defaults(&selectors.heading_container, DEFAULT_CONTAINERS),
        }
    }
}

// Layout wrappers (a tab pane, a section) whose own text is empty are
// transparent; their children continue the run in document order.
fn is_wrapper<V: DocumentView>(element: &V) -> bool {
    matches!(
        element.tag().as_str(),
        "div" | "section" | "article" | "main" | "aside"
    ) && element.text().is_empty()
}

/// The container's children with wrappers flattened away.
fn run_elements<V: DocumentView>(container: &V) -> Vec<V> {
    let mut run = Vec::new();
    let mut work: Vec<V> = container.children().into_iter().rev().collect();
    while let Some(element) = work.pop() {
        if is_wrapper(&element) {
            work.extend(element.children().into_iter().rev());
        } else {
            run.push(element);
        }
    }
    run
}

impl ExtractionStrategy for HeadingRunStrategy {
    fn name(&self) -> &'static str {
        "heading-run"
    }

    fn scan<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<RawEntry> {
        let containers = select_first_of(view, &self.container_selectors);
        if containers.is_empty() {
            tracing::debug!("No heading-run container found");
            return Vec::new();
        }

        let mut entries = Vec::new();
        let mut heading_open = false;

        'containers: for container in containers {
            for sibling in run_elements(&container) {
                let text = sibling.normalized_text();
                if text.is_empty() {
                    continue;
                }
                if rules.is_stop(&text) {
                    tracing::info!("Stop marker '{}' ends the sibling scan", text);
                    break 'containers;
                }
                if is_list(&sibling) {
                    // Lists before the first heading have no group to join.
                    if !heading_open {
                        continue;
                    }
                    for item in leaf_items(&sibling) {
                        let label = item.normalized_text();
                        if !label.is_empty() {
                            entries.push(RawEntry::at_level(label, 1));
                        }
                    }
                } else if starts_with_marker(&text) {
                    entries.push(RawEntry::at_level(strip_marker_word(&text).to_uppercase(), 0));
                    heading_open = true;
                }
            }
        }

        entries
    }
}
