// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::extractors::{Extraction, SourceShape};
use crate::outline::SegmentMap;
use crate::utils::error::StorageError;

/// What gets written for one processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub source: String,
    pub shape: SourceShape,
    pub table_of_contents: Vec<String>,
    pub segments: SegmentMap,
    pub extraction_timestamp: String,
}

impl OutlineRecord {
    pub fn new(source: impl Into<String>, extraction: Extraction) -> Self {
        Self {
            source: source.into(),
            shape: extraction.shape,
            table_of_contents: extraction.table_of_contents,
            segments: extraction.segments,
            extraction_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager, creating `base_dir` if needed.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory for per-document debug artifacts.
    pub fn debug_dir(&self) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join("debug");
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        }
        Ok(dir)
    }

    /// Writes the record as pretty JSON to `<base_dir>/<source stem>.json`.
    pub fn save_outline(&self, record: &OutlineRecord) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.json", record_stem(&record.source)));

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved outline to {}", file_path.display());
        Ok(file_path)
    }
}

/// File stem of a source path, reduced to characters safe in a file name.
pub fn record_stem(source: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source);
    let sanitized = sanitize_filename(stem);
    if sanitized.is_empty() {
        "outline".to_string()
    } else {
        sanitized
    }
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect::<String>()
        .trim_matches(|c| c == '_' || c == '.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("toc_extractor_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_sanitize_and_stem() {
        assert_eq!(sanitize_filename("battery market (2024)"), "battery_market__2024");
        assert_eq!(record_stem("pages/solar-report.html"), "solar-report");
        assert_eq!(record_stem("???"), "outline");
    }

    #[test]
    fn test_save_outline_writes_json() {
        let dir = scratch_dir("save");
        let storage = StorageManager::new(&dir).unwrap();
        assert!(dir.exists());

        let mut segments = SegmentMap::new();
        segments.insert("Product Type".to_string(), vec!["X".to_string(), "Y".to_string()]);
        let extraction = Extraction {
            shape: SourceShape::HeadingRun,
            table_of_contents: vec!["1. PRODUCT TYPE".into(), "1.1. X".into(), "1.2. Y".into()],
            segments,
        };
        let record = OutlineRecord::new("input/report.html", extraction);
        let path = storage.save_outline(&record).unwrap();
        assert_eq!(path, dir.join("report.json"));

        let written: OutlineRecord = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, record);
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["shape"], "heading-run");

        fs::remove_dir_all(&dir).unwrap();
    }
}
