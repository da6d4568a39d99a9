// src/extractors/table_row.rs
use super::config::{or_defaults, SelectorConfig};
use super::filter::FilterRules;
use super::label::{collapse_whitespace, starts_with_marker, strip_marker_word};
use super::{is_list, leaf_items, select_first_of, ExtractionStrategy};
use crate::document::DocumentView;
use crate::outline::RawEntry;

const DEFAULT_ROWS: &[&str] = &["#industrycoverage table tr", "table tr"];
const DEFAULT_GLYPHS: &[&str] = &["\u{b7}", "o", "\u{a7}"];

/// Outline encoded as table rows: a "By ..." heading cell on the left, and
/// glyph-prefixed blocks on the right whose glyph gives the depth. A row
/// without a heading may instead carry several bold "By ..." heads in its
/// content cell, each followed by a list.
#[derive(Debug, Clone)]
pub struct TableRowStrategy {
    row_selectors: Vec<String>,
    glyphs: Vec<String>,
    /// Lower-cased; rows are ignored until a first cell contains it.
    start_marker: Option<String>,
}

impl Default for TableRowStrategy {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

impl TableRowStrategy {
    pub fn from_config(selectors: &SelectorConfig) -> Self {
        Self {
            row_selectors: or_defaults(&selectors.table_row, DEFAULT_ROWS),
            glyphs: or_defaults(&selectors.table_glyphs, DEFAULT_GLYPHS),
            start_marker: selectors
                .table_start_marker
                .as_deref()
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty()),
        }
    }

    /// Depth and label for a glyph-prefixed block. A glyph that is itself a
    /// letter only counts when followed by whitespace.
    pub fn match_glyph(&self, text: &str) -> Option<(usize, String)> {
        let text = text.trim_start();
        for (index, glyph) in self.glyphs.iter().enumerate() {
            if glyph.is_empty() {
                continue;
            }
            let Some(rest) = text.strip_prefix(glyph.as_str()) else {
                continue;
            };
            let letter_glyph = glyph.chars().last().is_some_and(char::is_alphanumeric);
            if letter_glyph && !rest.starts_with(char::is_whitespace) {
                continue;
            }
            let label = collapse_whitespace(rest);
            if label.is_empty() {
                continue;
            }
            return Some((index + 1, label));
        }
        None
    }

    fn heading_text<V: DocumentView>(cell: &V) -> String {
        let strong = cell
            .select("strong")
            .iter()
            .map(|s| s.normalized_text())
            .collect::<Vec<_>>()
            .join(" ");
        let strong = collapse_whitespace(&strong);
        if !strong.is_empty() {
            return strong;
        }
        cell.select("p")
            .into_iter()
            .map(|p| p.normalized_text())
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| cell.normalized_text())
    }

    // Bold text of a paragraph that opens with the marker.
    fn strong_head<V: DocumentView>(block: &V) -> Option<String> {
        if block.tag() != "p" {
            return None;
        }
        let strong = block
            .select("strong, b")
            .iter()
            .map(|s| s.normalized_text())
            .collect::<Vec<_>>()
            .join(" ");
        let strong = collapse_whitespace(&strong);
        starts_with_marker(&strong).then_some(strong)
    }

    /// Scans a content cell holding several heads, each owning the next
    /// list. Returns `false` once a stop marker is reached.
    fn scan_heads<V: DocumentView>(content: &V, rules: &FilterRules, entries: &mut Vec<RawEntry>) -> bool {
        let mut head_open = false;
        for block in content.children() {
            if is_list(&block) {
                if head_open {
                    for item in leaf_items(&block) {
                        let label = item.normalized_text();
                        if !label.is_empty() {
                            entries.push(RawEntry::at_level(label, 1));
                        }
                    }
                    head_open = false;
                }
                continue;
            }
            let text = block.normalized_text();
            if rules.is_stop(&text) {
                tracing::info!("Stop marker '{}' ends the table scan", text);
                return false;
            }
            if let Some(head) = Self::strong_head(&block) {
                entries.push(RawEntry::at_level(strip_marker_word(&head), 0));
                head_open = true;
            }
        }
        true
    }

    fn blocks<V: DocumentView>(cell: &V) -> Vec<V> {
        let paragraphs = cell.select("p");
        if paragraphs.is_empty() {
            cell.children()
        } else {
            paragraphs
        }
    }
}

impl ExtractionStrategy for TableRowStrategy {
    fn name(&self) -> &'static str {
        "table-row"
    }

    fn scan<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<RawEntry> {
        let rows = select_first_of(view, &self.row_selectors);
        tracing::debug!("Found {} table rows", rows.len());
        let mut entries = Vec::new();
        let mut started = self.start_marker.is_none();

        'rows: for row in rows {
            let cells: Vec<V> = row
                .children()
                .into_iter()
                .filter(|c| matches!(c.tag().as_str(), "td" | "th"))
                .collect();
            if cells.is_empty() {
                continue;
            }
            if let (false, Some(marker)) = (started, &self.start_marker) {
                if !cells[0].normalized_text().to_lowercase().contains(marker.as_str()) {
                    continue;
                }
                tracing::debug!("Start marker '{}' found, reading rows", marker);
                started = true;
            }
            // A leading rowspan cell is a section label spanning several rows.
            let heading_index = if cells.len() >= 3 && cells[0].attr("rowspan").is_some() { 1 } else { 0 };
            let heading_cell = &cells[heading_index];
            let heading = Self::heading_text(heading_cell);
            if rules.is_stop(&heading) {
                tracing::info!("Stop marker '{}' ends the table scan", heading);
                break;
            }
            let content_cell = cells.get(heading_index + 1).unwrap_or(heading_cell);
            if !starts_with_marker(&heading) {
                if !Self::scan_heads(content_cell, rules, &mut entries) {
                    break;
                }
                continue;
            }
            entries.push(RawEntry::at_level(strip_marker_word(&heading), 0));

            let mut found_glyph = false;
            for block in Self::blocks(content_cell) {
                let text = block.normalized_text();
                if text.is_empty() {
                    continue;
                }
                if rules.is_stop(&text) {
                    tracing::info!("Stop marker '{}' ends the table scan", text);
                    break 'rows;
                }
                if let Some((depth, label)) = self.match_glyph(&text) {
                    found_glyph = true;
                    entries.push(RawEntry::at_level(label, depth));
                }
            }

            if !found_glyph {
                for item in leaf_items(content_cell) {
                    let label = item.normalized_text();
                    if !label.is_empty() {
                        entries.push(RawEntry::at_level(label, 1));
                    }
                }
            }
        }

        entries
    }
}
