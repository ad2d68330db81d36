use std::path::Path;

use pdfreflow::{Document, DocumentResult, ReflowOptions};
use tracing_subscriber::EnvFilter;

use crate::page_range::parse_page_range;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` flags pick the level.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Load a decoded document from a JSON file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is missing or
/// is not valid page JSON. A missing `filename` defaults to the file's name.
pub fn load_document(file: &Path) -> Result<Document, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    let data = std::fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })?;
    let mut document: Document = serde_json::from_str(&data).map_err(|e| {
        eprintln!("Error: failed to parse page data: {e}");
        1
    })?;
    if document.filename.is_none() {
        document.filename = file.file_name().map(|n| n.to_string_lossy().into_owned());
    }
    tracing::info!(pages = document.page_count(), "loaded document");
    Ok(document)
}

/// Keep only the pages selected by an optional range string.
pub fn select_pages(document: Document, pages: Option<&str>) -> Result<Document, i32> {
    let Some(range) = pages else {
        return Ok(document);
    };
    let indices = parse_page_range(range, document.page_count()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let Document { filename, pages } = document;
    let selected = pages
        .into_iter()
        .enumerate()
        .filter(|(i, _)| indices.binary_search(i).is_ok())
        .map(|(_, page)| page)
        .collect();
    Ok(Document {
        filename,
        pages: selected,
    })
}

/// Load, select pages and extract in one step.
pub fn run_document(
    file: &Path,
    pages: Option<&str>,
    options: &ReflowOptions,
) -> Result<DocumentResult, i32> {
    let document = select_pages(load_document(file)?, pages)?;
    let result = document.extract(options);
    for warning in result.warnings() {
        tracing::warn!("{warning}");
    }
    Ok(result)
}

/// Serialize to JSON, reporting failures on stderr.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, i32> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
