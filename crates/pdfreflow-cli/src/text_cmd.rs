use std::path::Path;

use pdfreflow::ReflowOptions;

use crate::cli::TextFormat;
use crate::shared::{run_document, to_json};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &TextFormat,
    options: &ReflowOptions,
) -> Result<(), i32> {
    let result = run_document(file, pages, options)?;

    match format {
        TextFormat::Text => {
            print!("{}", result.to_plain_text());
        }
        TextFormat::Json => {
            let pages: Vec<serde_json::Value> = result
                .pages
                .iter()
                .map(|page| {
                    serde_json::json!({
                        "page": page.page_number,
                        "text": page.text,
                        "likely_scanned": page.likely_scanned,
                        "error": page.error,
                    })
                })
                .collect();
            println!("{}", to_json(&pages, false)?);
        }
    }

    Ok(())
}
