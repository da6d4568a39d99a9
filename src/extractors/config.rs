// src/extractors/config.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::filter::FilterOverrides;
use crate::utils::error::AppError;

/// Caller-side knobs layered over the per-shape defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub rules: FilterOverrides,
    /// Indent flattened entries by depth. Unset means the shape's default.
    pub indent: Option<bool>,
    pub selectors: SelectorConfig,
}

/// Selector candidate lists. Each list is tried in order and the first
/// selector that matches anything wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub list_container: Option<Vec<String>>,
    pub card_group: Option<Vec<String>>,
    pub card_title: Option<Vec<String>>,
    pub card_body: Option<Vec<String>>,
    pub table_row: Option<Vec<String>>,
    /// Leading glyphs; position `i` in the list means depth `i + 1`.
    pub table_glyphs: Option<Vec<String>>,
    /// Table rows are ignored until a first cell contains this text.
    pub table_start_marker: Option<String>,
    pub heading_container: Option<Vec<String>>,
    pub text_container: Option<Vec<String>>,
}

impl ExtractConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|e| AppError::Config(format!("Invalid config: {}", e)))
    }
}

/// The override list when set, otherwise the built-in defaults.
pub(crate) fn or_defaults(custom: &Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    match custom {
        Some(list) if !list.is_empty() => list.clone(),
        _ => defaults.iter().map(|s| s.to_string()).collect(),
    }
}
