// src/extractors/filter.rs
//! Stateless filter rules shared by every strategy.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::label::{collapse_whitespace, is_fully_parenthesized, word_count};
use crate::outline::OutlineNode;

// Geography phrases, bare geography headings, and labels ending in a known
// region or country name (whole words only).
static REGIONAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)regional\s+outlook|region\s+outlook|country\s+outlook|\bregional\b",
        r"|\bby\s+(?:region|country|geograph)",
        r"|^(?:regions?|countr(?:y|ies)|geograph(?:y|ies|ical)|key\s+countries)$",
        r"|(?:^|[^\w.])(?:north\s+america|europe|asia[\s-]*pacific|latin\s+america|middle\s+east|africa",
        r"|emea|apac|u\.s\.|us|usa|united\s+states|canada|mexico|germany|uk|united\s+kingdom",
        r"|france|italy|spain|china|india|japan|south\s+korea|brazil|australia|russia",
        r"|saudi\s+arabia|uae|gcc\s+countries)$",
    ))
    .expect("Failed to compile REGIONAL_RE")
});

static STOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)regional\s+coverage|regional\s+analysis|company\s+profiles|competitive\s+landscape")
        .expect("Failed to compile STOP_RE")
});

static BOILERPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)introduction|\bprimary\s+insights\b|,\s*\d{4}$").expect("Failed to compile BOILERPLATE_RE")
});

/// Deepest `max_depth` a caller may ask for.
pub const DEPTH_CEILING: usize = 16;

/// Whether a top-level heading survives once all of its children are filtered away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitMode {
    Always,
    RequireChildren,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Labels with more words than this are dropped...
    pub word_limit: usize,
    /// ...from this depth down.
    pub word_limit_min_depth: usize,
    /// Minimum raw size of a sibling group.
    pub min_occupancy: usize,
    /// Shallowest depth whose groups are held to `min_occupancy`.
    pub occupancy_min_depth: usize,
    /// Keep a group whose raw size is exactly one.
    pub single_child_fallback: bool,
    pub emit_mode: EmitMode,
    /// Drop "Introduction", "Primary Insights", year-suffixed and parenthesized labels.
    pub drop_boilerplate: bool,
    /// Deepest level the strategy models; deeper groups are truncated.
    pub max_depth: usize,
    /// Case-insensitive substrings that end the scan, on top of the built-in ones.
    pub extra_stop_markers: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            word_limit: 6,
            word_limit_min_depth: 1,
            min_occupancy: 2,
            occupancy_min_depth: 1,
            single_child_fallback: false,
            emit_mode: EmitMode::Always,
            drop_boilerplate: false,
            max_depth: 3,
            extra_stop_markers: Vec::new(),
        }
    }
}

/// Caller-supplied adjustments applied over a strategy's default rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOverrides {
    pub word_limit: Option<usize>,
    pub word_limit_min_depth: Option<usize>,
    pub min_occupancy: Option<usize>,
    pub occupancy_min_depth: Option<usize>,
    pub single_child_fallback: Option<bool>,
    pub emit_mode: Option<EmitMode>,
    pub drop_boilerplate: Option<bool>,
    pub max_depth: Option<usize>,
    pub extra_stop_markers: Vec<String>,
}

impl FilterRules {
    pub fn with_overrides(mut self, overrides: &FilterOverrides) -> Self {
        if let Some(v) = overrides.word_limit {
            self.word_limit = v;
        }
        if let Some(v) = overrides.word_limit_min_depth {
            self.word_limit_min_depth = v;
        }
        if let Some(v) = overrides.min_occupancy {
            self.min_occupancy = v;
        }
        if let Some(v) = overrides.occupancy_min_depth {
            self.occupancy_min_depth = v;
        }
        if let Some(v) = overrides.single_child_fallback {
            self.single_child_fallback = v;
        }
        if let Some(v) = overrides.emit_mode {
            self.emit_mode = v;
        }
        if let Some(v) = overrides.drop_boilerplate {
            self.drop_boilerplate = v;
        }
        if let Some(v) = overrides.max_depth {
            if v > DEPTH_CEILING {
                tracing::warn!("max_depth {} lowered to {}", v, DEPTH_CEILING);
            }
            self.max_depth = v.min(DEPTH_CEILING);
        }
        self.extra_stop_markers
            .extend(overrides.extra_stop_markers.iter().cloned());
        self
    }

    pub fn is_regional(&self, label: &str) -> bool {
        REGIONAL_RE.is_match(label.trim())
    }

    pub fn is_stop(&self, label: &str) -> bool {
        if STOP_RE.is_match(label) {
            return true;
        }
        let lower = label.to_lowercase();
        self.extra_stop_markers
            .iter()
            .any(|marker| !marker.is_empty() && lower.contains(&marker.to_lowercase()))
    }

    pub fn exceeds_word_limit(&self, label: &str, depth: usize) -> bool {
        depth >= self.word_limit_min_depth && word_count(label) > self.word_limit
    }

    pub fn is_boilerplate(&self, label: &str) -> bool {
        self.drop_boilerplate && (BOILERPLATE_RE.is_match(label) || is_fully_parenthesized(label))
    }

    /// Occupancy is judged on the group's raw size, before any member is filtered.
    pub fn passes_occupancy(&self, raw_size: usize, depth: usize) -> bool {
        if depth < self.occupancy_min_depth || raw_size >= self.min_occupancy {
            return true;
        }
        self.single_child_fallback && raw_size == 1
    }

    /// Applies every structural rule to a raw forest.
    pub fn prune(&self, forest: Vec<OutlineNode>) -> Vec<OutlineNode> {
        self.prune_group(forest, 0)
    }

    // Recursion depth is bounded by `max_depth`, itself capped at `DEPTH_CEILING`.
    fn prune_group(&self, group: Vec<OutlineNode>, depth: usize) -> Vec<OutlineNode> {
        if group.is_empty() {
            return group;
        }
        if depth > self.max_depth {
            tracing::debug!("Truncating {} entries below depth {}", group.len(), self.max_depth);
            return Vec::new();
        }
        if !self.passes_occupancy(group.len(), depth) {
            tracing::debug!(
                "Dropping sibling group of {} at depth {} (needs {})",
                group.len(),
                depth,
                self.min_occupancy
            );
            return Vec::new();
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut kept = Vec::with_capacity(group.len());

        for node in group {
            let label = collapse_whitespace(&node.label);
            if label.is_empty() {
                continue;
            }
            if self.is_regional(&label) {
                tracing::debug!("Excluding regional entry '{}' with its subtree", label);
                continue;
            }
            if self.exceeds_word_limit(&label, depth) {
                tracing::debug!("Dropping over-long entry '{}'", label);
                continue;
            }
            if self.is_boilerplate(&label) {
                tracing::debug!("Dropping boilerplate entry '{}'", label);
                continue;
            }
            let key = label.to_lowercase();
            if seen.contains(&key) {
                tracing::debug!("Dropping duplicate entry '{}'", label);
                continue;
            }

            let children = self.prune_group(node.children, depth + 1);
            if depth == 0 && children.is_empty() && self.emit_mode == EmitMode::RequireChildren {
                tracing::debug!("Dropping heading '{}' with no surviving children", label);
                continue;
            }

            seen.insert(key);
            kept.push(OutlineNode {
                label,
                raw_numbering: node.raw_numbering,
                depth,
                children,
            });
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, depth: usize) -> OutlineNode {
        OutlineNode::new(label, depth)
    }

    #[test]
    fn test_regional_predicate() {
        let rules = FilterRules::default();
        for label in [
            "By Region",
            "Region",
            "Regional Outlook (Revenue, USD Million)",
            "North America",
            "Rest of Europe",
            "Middle East & Africa",
            "U.S.",
            "Country Outlook",
        ] {
            assert!(rules.is_regional(label), "{} should be regional", label);
        }
        for label in ["Citrus", "Bus Bars", "Product Type", "Status Monitoring", "Automotive"] {
            assert!(!rules.is_regional(label), "{} should not be regional", label);
        }
    }

    #[test]
    fn test_stop_markers() {
        let mut rules = FilterRules::default();
        assert!(rules.is_stop("Regional Coverage"));
        assert!(rules.is_stop("16 COMPANY PROFILES"));
        assert!(!rules.is_stop("BY REGION"));
        rules.extra_stop_markers.push("by region".to_string());
        assert!(rules.is_stop("12 BATTERY MARKET, BY REGION"));
    }

    #[test]
    fn test_overrides_merge() {
        let rules = FilterRules::default().with_overrides(&FilterOverrides {
            word_limit: Some(3),
            emit_mode: Some(EmitMode::RequireChildren),
            extra_stop_markers: vec!["appendix".to_string()],
            ..FilterOverrides::default()
        });
        assert_eq!(rules.word_limit, 3);
        assert_eq!(rules.emit_mode, EmitMode::RequireChildren);
        assert_eq!(rules.min_occupancy, 2);
        assert!(rules.is_stop("Appendix"));
    }

    #[test]
    fn test_max_depth_override_is_capped() {
        let rules = FilterRules::default().with_overrides(&FilterOverrides {
            max_depth: Some(usize::MAX),
            ..FilterOverrides::default()
        });
        assert_eq!(rules.max_depth, DEPTH_CEILING);

        let mut chain = leaf("Deepest", DEPTH_CEILING + 4);
        for depth in (0..DEPTH_CEILING + 4).rev() {
            chain = leaf(&format!("Level {}", depth), depth).with_children(vec![chain]);
        }
        let rules = FilterRules {
            single_child_fallback: true,
            ..rules
        };
        let mut node = &rules.prune(vec![chain])[0];
        let mut levels = 0;
        while let Some(child) = node.children.first() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, DEPTH_CEILING);
    }

    #[test]
    fn test_prune_regional_subtree_and_occupancy() {
        let rules = FilterRules::default();
        let forest = vec![
            leaf("Segment A", 0).with_children(vec![leaf("Sub A1", 1), leaf("Sub A2", 1)]),
            leaf("Segment B", 0).with_children(vec![leaf("Lonely", 1)]),
            leaf("Components", 0).with_children(vec![
                leaf("Chips", 1),
                leaf("Europe", 1).with_children(vec![leaf("Germany", 2), leaf("France", 2)]),
            ]),
        ];
        let pruned = rules.prune(forest);
        assert_eq!(pruned.len(), 3);
        assert_eq!(pruned[0].children.len(), 2);
        assert!(pruned[1].children.is_empty(), "single child fails occupancy");
        assert_eq!(pruned[2].children.len(), 1, "regional child excluded after the raw count passed");
        assert_eq!(pruned[2].children[0].label, "Chips");
    }

    #[test]
    fn test_prune_word_limit_after_occupancy() {
        let rules = FilterRules::default();
        let forest = vec![leaf("Heading", 0).with_children(vec![
            leaf("Short one", 1),
            leaf("This label is far too long to keep", 1),
        ])];
        let pruned = rules.prune(forest);
        assert_eq!(pruned[0].children.len(), 1);
        assert_eq!(pruned[0].children[0].label, "Short one");
    }

    #[test]
    fn test_prune_require_children_and_duplicates() {
        let rules = FilterRules {
            emit_mode: EmitMode::RequireChildren,
            ..FilterRules::default()
        };
        let forest = vec![
            leaf("Empty", 0),
            leaf("Type", 0).with_children(vec![leaf("X", 1), leaf("x ", 1), leaf("Y", 1)]),
            leaf("TYPE", 0).with_children(vec![leaf("Z", 1), leaf("W", 1)]),
        ];
        let pruned = rules.prune(forest);
        assert_eq!(pruned.len(), 1);
        let labels: Vec<_> = pruned[0].children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["X", "Y"]);
    }

    #[test]
    fn test_single_child_fallback_and_truncation() {
        let rules = FilterRules {
            single_child_fallback: true,
            max_depth: 1,
            ..FilterRules::default()
        };
        let forest = vec![leaf("Heading", 0).with_children(vec![
            leaf("Only", 1).with_children(vec![leaf("Too deep", 2), leaf("Also deep", 2)]),
        ])];
        let pruned = rules.prune(forest);
        assert_eq!(pruned[0].children.len(), 1);
        assert!(pruned[0].children[0].children.is_empty());
    }

    #[test]
    fn test_boilerplate() {
        let rules = FilterRules {
            drop_boilerplate: true,
            ..FilterRules::default()
        };
        assert!(rules.is_boilerplate("Introduction"));
        assert!(rules.is_boilerplate("Key Primary Insights"));
        assert!(rules.is_boilerplate("Market Share Analysis, 2024"));
        assert!(rules.is_boilerplate("(Page No. - 12)"));
        assert!(!rules.is_boilerplate("Lithium-ion"));
        assert!(!FilterRules::default().is_boilerplate("Introduction"));
    }
}
