// src/main.rs
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use toc_extractor::extractors::{self, ExtractConfig, SourceShape};
use toc_extractor::storage::{record_stem, OutlineRecord, StorageManager};
use toc_extractor::utils::{self, html_debug, AppError};
use toc_extractor::Document;

/// Command Line Interface for the outline extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input documents (HTML, or .txt for a plain text blob)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Structural shape of the inputs: nested-list, card-sequence, table-row,
    /// heading-run or pattern-text
    #[arg(short, long)]
    shape: String,

    /// JSON file with filter overrides and selector lists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for extracted outlines
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Override the maximum number of words per label
    #[arg(long)]
    word_limit: Option<usize>,

    /// Never indent flattened entries
    #[arg(long)]
    no_indent: bool,

    /// Debug mode - save annotated HTML files and log filter decisions
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG wins; --debug raises the crate's default level)
    utils::logging::setup_logging(args.debug);
    tracing::info!("Starting processing for args: {:?}", args);

    let shape: SourceShape = args.shape.parse()?;

    // 3. Build the extraction config: file first, then CLI flags on top
    let mut config = match &args.config {
        Some(path) => ExtractConfig::from_json_file(path)?,
        None => ExtractConfig::default(),
    };
    if let Some(limit) = args.word_limit {
        config.rules.word_limit = Some(limit);
    }
    if args.no_indent {
        config.indent = Some(false);
    }

    // 4. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 5. Process each input
    let mut success_count = 0;
    let mut failure_count = 0;

    for input in &args.input {
        tracing::info!("Processing {} as {}", input.display(), shape);
        match process_file(input, shape, &config, &storage, args.debug) {
            Ok(path) => {
                success_count += 1;
                tracing::info!("Saved outline to: {}", path.display());
            }
            Err(e) => {
                failure_count += 1;
                tracing::error!("Failed to process {}: {}", input.display(), e);
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract an outline from any of {} inputs",
            failure_count
        )));
    }

    Ok(())
}

fn process_file(
    input: &Path,
    shape: SourceShape,
    config: &ExtractConfig,
    storage: &StorageManager,
    debug: bool,
) -> Result<PathBuf, AppError> {
    let content = fs::read_to_string(input)?;
    tracing::info!("Read {} bytes", content.len());

    let is_text = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    if debug && !is_text {
        let debug_path = storage
            .debug_dir()?
            .join(format!("{}_annotated.html", record_stem(&input.to_string_lossy())));
        if let Err(e) = html_debug::create_debug_html(&content, &debug_path, html_debug::OUTLINE_DEBUG_PATTERNS) {
            tracing::warn!("Failed to create debug HTML: {}", e);
        }
    }

    let extraction = if is_text && shape == SourceShape::PatternText {
        extractors::extract_text(&content, config)
    } else {
        let document = if is_text {
            Document::from_text(&content)
        } else {
            Document::parse(&content)
        };
        extractors::extract_shape(&document.root(), shape, config)
    };

    if extraction.is_empty() {
        tracing::warn!("No outline found in {}", input.display());
    }

    let record = OutlineRecord::new(input.to_string_lossy(), extraction);
    Ok(storage.save_outline(&record)?)
}
