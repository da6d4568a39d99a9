// src/lib.rs
pub mod document;
pub mod extractors;
pub mod outline;
pub mod storage;
pub mod utils;

pub use document::{Document, DocumentView, HtmlView};
pub use extractors::{extract, extract_shape, extract_text, ExtractConfig, Extraction, SourceShape};
pub use outline::{OutlineEntry, OutlineNode, SegmentMap};
pub use utils::{AppError, ExtractError, StorageError};
