// src/extractors/mod.rs
pub mod card_sequence;
pub mod config;
pub mod filter;
pub mod heading_run;
pub mod label;
pub mod nested_list;
pub mod pattern_text;
pub mod table_row;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::DocumentView;
use crate::outline::{flatten, normalize, segments, OutlineNode, RawEntry, SegmentMap};
use crate::utils::error::ExtractError;

// Re-export key extraction types for convenience
pub use card_sequence::CardSequenceStrategy;
pub use config::{ExtractConfig, SelectorConfig};
pub use filter::{EmitMode, FilterOverrides, FilterRules};
pub use heading_run::HeadingRunStrategy;
pub use nested_list::NestedListStrategy;
pub use pattern_text::PatternTextStrategy;
pub use table_row::TableRowStrategy;

/// The structural archetype a caller says a document follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceShape {
    NestedList,
    CardSequence,
    TableRow,
    HeadingRun,
    PatternText,
}

impl SourceShape {
    pub const ALL: [SourceShape; 5] = [
        SourceShape::NestedList,
        SourceShape::CardSequence,
        SourceShape::TableRow,
        SourceShape::HeadingRun,
        SourceShape::PatternText,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SourceShape::NestedList => "nested-list",
            SourceShape::CardSequence => "card-sequence",
            SourceShape::TableRow => "table-row",
            SourceShape::HeadingRun => "heading-run",
            SourceShape::PatternText => "pattern-text",
        }
    }

    /// Baseline filter behaviour for documents of this shape.
    pub fn default_rules(&self) -> FilterRules {
        let base = FilterRules::default();
        match self {
            SourceShape::NestedList => FilterRules {
                max_depth: 2,
                ..base
            },
            SourceShape::CardSequence => FilterRules {
                emit_mode: EmitMode::RequireChildren,
                drop_boilerplate: true,
                max_depth: 2,
                ..base
            },
            SourceShape::TableRow => FilterRules {
                word_limit_min_depth: 2,
                single_child_fallback: true,
                drop_boilerplate: true,
                max_depth: 3,
                ..base
            },
            SourceShape::HeadingRun => FilterRules {
                emit_mode: EmitMode::RequireChildren,
                max_depth: 1,
                ..base
            },
            SourceShape::PatternText => FilterRules {
                max_depth: 2,
                ..base
            },
        }
    }

    /// Whether flattened entries get one space of indent per depth level.
    pub fn default_indent(&self) -> bool {
        matches!(self, SourceShape::PatternText)
    }
}

impl fmt::Display for SourceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SourceShape {
    type Err = ExtractError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "nested-list" | "list" => Ok(SourceShape::NestedList),
            "card-sequence" | "accordion" | "cards" => Ok(SourceShape::CardSequence),
            "table-row" | "symbol-table" | "table" => Ok(SourceShape::TableRow),
            "heading-run" | "sibling-scan" => Ok(SourceShape::HeadingRun),
            "pattern-text" | "pattern" | "text" => Ok(SourceShape::PatternText),
            _ => Err(ExtractError::UnknownShape(tag.to_string())),
        }
    }
}

/// One archetype's traversal.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;

    /// Reads candidate entries in document order. Stops for good at the first
    /// stop marker.
    fn scan<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<RawEntry>;

    /// Scans, nests and prunes into the filtered raw forest.
    fn extract<V: DocumentView>(&self, view: &V, rules: &FilterRules) -> Vec<OutlineNode> {
        let entries = self.scan(view, rules);
        if entries.is_empty() {
            tracing::warn!("{}: no outline structure found", self.name());
            return Vec::new();
        }
        tracing::debug!("{}: scanned {} candidate entries", self.name(), entries.len());
        rules.prune(normalize::nest(entries, rules.max_depth))
    }
}

/// The two artifacts that leave the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub shape: SourceShape,
    pub table_of_contents: Vec<String>,
    pub segments: SegmentMap,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.table_of_contents.is_empty()
    }
}

/// Extracts an outline from `view`, choosing the strategy by shape tag.
///
/// Fails only for an unrecognised tag; a document without the expected
/// structure yields an empty [`Extraction`].
pub fn extract<V: DocumentView>(
    view: &V,
    shape_tag: &str,
    config: &ExtractConfig,
) -> Result<Extraction, ExtractError> {
    let shape = shape_tag.parse::<SourceShape>()?;
    Ok(extract_shape(view, shape, config))
}

pub fn extract_shape<V: DocumentView>(view: &V, shape: SourceShape, config: &ExtractConfig) -> Extraction {
    let rules = shape.default_rules().with_overrides(&config.rules);
    let selectors = &config.selectors;

    let forest = match shape {
        SourceShape::NestedList => NestedListStrategy::from_config(selectors).extract(view, &rules),
        SourceShape::CardSequence => CardSequenceStrategy::from_config(selectors).extract(view, &rules),
        SourceShape::TableRow => TableRowStrategy::from_config(selectors).extract(view, &rules),
        SourceShape::HeadingRun => HeadingRunStrategy::from_config(selectors).extract(view, &rules),
        SourceShape::PatternText => PatternTextStrategy::from_config(selectors).extract(view, &rules),
    };

    finish(shape, &forest, config.indent.unwrap_or_else(|| shape.default_indent()))
}

/// Extracts from a bare text blob with the pattern-text strategy.
pub fn extract_text(text: &str, config: &ExtractConfig) -> Extraction {
    let shape = SourceShape::PatternText;
    let rules = shape.default_rules().with_overrides(&config.rules);
    let strategy = PatternTextStrategy::from_config(&config.selectors);
    let entries = strategy.scan_text(text, &rules);
    let forest = rules.prune(normalize::nest(entries, rules.max_depth));
    finish(shape, &forest, config.indent.unwrap_or_else(|| shape.default_indent()))
}

fn finish(shape: SourceShape, forest: &[OutlineNode], indent: bool) -> Extraction {
    let entries = normalize::renumber(forest);
    let table_of_contents = flatten::flatten(&entries, indent);
    let segments = segments::group(&table_of_contents);
    tracing::info!(
        "{}: extracted {} outline entries, {} segments",
        shape,
        table_of_contents.len(),
        segments.len()
    );
    Extraction {
        shape,
        table_of_contents,
        segments,
    }
}

// --- Traversal helpers shared by the strategies ---

/// Matches of the first selector in `selectors` that matches anything.
pub(crate) fn select_first_of<V: DocumentView>(view: &V, selectors: &[String]) -> Vec<V> {
    for selector in selectors {
        let found = view.select(selector);
        if !found.is_empty() {
            tracing::trace!("Selector '{}' matched {} elements", selector, found.len());
            return found;
        }
    }
    Vec::new()
}

pub(crate) fn is_list<V: DocumentView>(view: &V) -> bool {
    matches!(view.tag().as_str(), "ul" | "ol")
}

/// Direct `li` children of a list.
pub(crate) fn list_items<V: DocumentView>(list: &V) -> Vec<V> {
    list.children().into_iter().filter(|c| c.tag() == "li").collect()
}

/// `li` descendants that contain no further `li`.
pub(crate) fn leaf_items<V: DocumentView>(view: &V) -> Vec<V> {
    view.select("li")
        .into_iter()
        .filter(|li| li.select("li").is_empty())
        .collect()
}

/// Item text preferring an emphasized child, then the item's own text, then
/// the first non-list child.
pub(crate) fn item_text<V: DocumentView>(item: &V) -> String {
    let children = item.children();
    if let Some(strong) = children.iter().find(|c| matches!(c.tag().as_str(), "strong" | "b")) {
        let text = strong.normalized_text();
        if !text.is_empty() {
            return text;
        }
    }
    let own = item.text();
    if !own.is_empty() {
        return own;
    }
    children
        .iter()
        .filter(|c| !is_list(*c))
        .map(|c| c.normalized_text())
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}
