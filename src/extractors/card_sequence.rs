// src/extractors/card_sequence.rs
use super::config::{or_defaults, SelectorConfig};
use super::filter::FilterRules;
use super::label::{classification_name, is_classification_heading, is_fully_parenthesized, strip_numbering};
use super::{is_list, item_text, list_items, select_first_of, ExtractionStrategy};
use crate::document::DocumentView;
use crate::outline::RawEntry;

const DEFAULT_GROUPS: &[&str] = &["div.accordion-item", "div.card", "details"];
const DEFAULT_TITLES: &[&str] = &[".TOCcustHead", ".accordion-header", ".card-header", "summary"];
const DEFAULT_BODIES: &[&str] = &["ul.toc_list", ".accordion-body ul", ".card-body ul", "ul, ol"];

/// Outline encoded as a sequence of collapsible groups, each with a title
/// and a body list.
#[derive(Debug, Clone)]
pub struct CardSequenceStrategy {
    group_selectors: Vec<String>,
    title_selectors: Vec<String>,
    body_selectors: Vec<String>,
}

impl Default for CardSequenceStrategy {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

impl CardSequenceStrategy {
    pub fn from_config(selectors: &SelectorConfig) -> Self {
        Self {
            group_selectors: or_defaults(&selectors.card_group, DEFAULT_GROUPS),
            title_selectors: or_defaults(&selectors.card_title, DEFAULT_TITLES),
            body_selectors: or_defaults(&selectors.card_body, DEFAULT_BODIES),
        }
    }

    fn item_label<V: DocumentView>(item: &V) -> String {
        let head = item
            .select(".bulletsHead")
            .into_iter()
            .map(|h| h.normalized_text())
            .find(|text| !text.is_empty());
        strip_numbering(&head.unwrap_or_else(|| item_text(item)))
    }

    // Third-level labels: `.bullets` spans plus any nested list items.
    fn item_children<V: DocumentView>(item: &V) -> Vec<String> {
        let mut labels: Vec<String> = item
            .select(".bullets")
            .into_iter()
            .map(|b| strip_numbering(&b.normalized_text()))
            .collect();
        for sub in item.children().into_iter().filter(is_list) {
            labels.extend(list_items(&sub).iter().map(|li| strip_numbering(&li.normalized_text())));
        }
        labels.retain(|label| !label.is_empty());
        labels
    }
}

impl ExtractionStrategy for CardSequenceStrategy {
    fn name(&self) -> &'static str {
        "card-sequence"
    }

    fn scan<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<RawEntry> {
        let groups = select_first_of(view, &self.group_selectors);
        tracing::debug!("Found {} card groups", groups.len());
        let mut entries = Vec::new();

        'groups: for group in groups {
            let Some(title) = select_first_of(&group, &self.title_selectors).into_iter().next() else {
                continue;
            };
            let title_text = strip_numbering(&title.normalized_text());
            if title_text.is_empty() || is_fully_parenthesized(&title_text) {
                continue;
            }
            if rules.is_stop(&title_text) {
                tracing::info!("Stop marker '{}' ends the card scan", title_text);
                break;
            }
            // A regional chapter is dropped whole; later cards still count.
            if rules.is_regional(&title_text) {
                tracing::debug!("Skipping regional card '{}'", title_text);
                continue;
            }
            if !is_classification_heading(&title_text) {
                tracing::debug!("Skipping non-classification card '{}'", title_text);
                continue;
            }
            let Some(name) = classification_name(&title_text) else {
                continue;
            };
            entries.push(RawEntry::at_level(name.to_uppercase(), 0));

            let Some(body) = select_first_of(&group, &self.body_selectors).into_iter().next() else {
                continue;
            };
            for item in list_items(&body) {
                let label = Self::item_label(&item);
                if rules.is_stop(&label) {
                    tracing::info!("Stop marker '{}' ends the card scan", label);
                    break 'groups;
                }
                entries.push(RawEntry::at_level(label, 1));
                for child in Self::item_children(&item) {
                    if rules.is_stop(&child) {
                        break 'groups;
                    }
                    entries.push(RawEntry::at_level(child, 2));
                }
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::extractors::SourceShape;

    const CARDS: &str = r#"
        <div class="accordion-item">
          <div class="TOCcustHead">1 Introduction</div>
          <div class="accordion-body"><ul class="toc_list"><li>Study Objectives</li></ul></div>
        </div>
        <div class="accordion-item">
          <div class="TOCcustHead">6 Battery Market, By Chemistry (Page No. - 88)</div>
          <div class="accordion-body">
            <ul class="toc_list">
              <li><span class="bulletsHead">6.1 Lithium-ion</span>
                  <span class="bullets">6.1.1 NMC</span><span class="bullets">6.1.2 LFP</span></li>
              <li><span class="bulletsHead">6.2 Lead Acid</span></li>
            </ul>
          </div>
        </div>
        <div class="accordion-item">
          <div class="TOCcustHead">(Page No. - 90)</div>
        </div>
        <div class="accordion-item">
          <div class="TOCcustHead">7 Battery Market, By Region</div>
          <div class="accordion-body"><ul class="toc_list"><li>North America</li></ul></div>
        </div>
        <div class="accordion-item">
          <div class="TOCcustHead">8 Battery Market, By Capacity</div>
          <div class="accordion-body"><ul class="toc_list"><li>High</li><li>Low</li></ul></div>
        </div>
        <div class="accordion-item">
          <div class="TOCcustHead">9 Competitive Landscape</div>
          <div class="accordion-body"><ul class="toc_list"><li>Market Share</li></ul></div>
        </div>
        <div class="accordion-item">
          <div class="TOCcustHead">10 Battery Market, By Voltage</div>
          <div class="accordion-body"><ul class="toc_list"><li>Never</li><li>Read</li></ul></div>
        </div>"#;

    #[test]
    fn test_scan_skips_regional_cards_and_stops_at_marker() {
        let document = Document::parse(CARDS);
        let rules = SourceShape::CardSequence.default_rules();
        let labels: Vec<String> = CardSequenceStrategy::default()
            .scan(&document.root(), &rules)
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(
            labels,
            vec!["CHEMISTRY", "Lithium-ion", "NMC", "LFP", "Lead Acid", "CAPACITY", "High", "Low"]
        );
    }

    #[test]
    fn test_extract_nests_three_levels() {
        let document = Document::parse(CARDS);
        let rules = SourceShape::CardSequence.default_rules();
        let forest = CardSequenceStrategy::default().extract(&document.root(), &rules);
        let labels: Vec<_> = forest.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["CHEMISTRY", "CAPACITY"]);
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[0].children[0].children.len(), 2);
        assert_eq!(forest[1].children.len(), 2);
    }

    #[test]
    fn test_lone_bullet_fails_occupancy() {
        let html = r#"
            <div class="accordion-item">
              <div class="TOCcustHead">5 Sensor Market, By Type</div>
              <div class="accordion-body">
                <ul class="toc_list">
                  <li><span class="bulletsHead">5.1 Optical</span><span class="bullets">5.1.1 Fiber Only</span></li>
                  <li><span class="bulletsHead">5.2 Thermal</span></li>
                </ul>
              </div>
            </div>"#;
        let document = Document::parse(html);
        let rules = SourceShape::CardSequence.default_rules();
        let forest = CardSequenceStrategy::default().extract(&document.root(), &rules);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 2);
        assert!(forest[0].children[0].children.is_empty(), "single grandchild is dropped");
    }

    #[test]
    fn test_plain_card_markup() {
        let html = r#"
            <div class="card">
              <div class="card-header">By Deployment</div>
              <div class="card-body"><ul><li>Cloud</li><li>On-premise</li></ul></div>
            </div>
            <div class="card">
              <div class="card-header">By Empty</div>
            </div>"#;
        let document = Document::parse(html);
        let rules = SourceShape::CardSequence.default_rules();
        let forest = CardSequenceStrategy::default().extract(&document.root(), &rules);
        assert_eq!(forest.len(), 1, "heading without children is not emitted");
        assert_eq!(forest[0].label, "DEPLOYMENT");
    }
}
