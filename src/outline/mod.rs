// src/outline/mod.rs
//! Outline data model and the post-extraction pipeline:
//! nesting/renumbering ([`normalize`]), rendering ([`flatten`]) and the
//! two-level grouping ([`segments`]).

pub mod flatten;
pub mod normalize;
pub mod segments;

use serde::{Deserialize, Serialize};

pub use segments::SegmentMap;

/// A node of the raw forest produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub label: String,
    /// Dotted numeral copied verbatim from the source, e.g. `"5.1.2"`.
    pub raw_numbering: Option<String>,
    pub depth: usize,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(label: impl Into<String>, depth: usize) -> Self {
        Self {
            label: label.into(),
            raw_numbering: None,
            depth,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }
}

/// A canonical entry: gapless 1-based path plus label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub path: Vec<usize>,
    pub label: String,
}

impl OutlineEntry {
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// How a strategy knows where a flat entry sits in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthSignal {
    /// Depth read directly from structure (list nesting, glyph, heading/body).
    Level(usize),
    /// Depth implied by the dot-count of a source numeral.
    Numeral(String),
}

/// One candidate entry in document order, before nesting and filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub label: String,
    pub signal: DepthSignal,
}

impl RawEntry {
    pub fn at_level(label: impl Into<String>, depth: usize) -> Self {
        Self {
            label: label.into(),
            signal: DepthSignal::Level(depth),
        }
    }

    pub fn numbered(label: impl Into<String>, numeral: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            signal: DepthSignal::Numeral(numeral.into()),
        }
    }
}
