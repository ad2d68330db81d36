use std::path::Path;

use pdfreflow::ReflowOptions;

use crate::shared::{run_document, to_json};

pub fn run(file: &Path, pages: Option<&str>, options: &ReflowOptions) -> Result<(), i32> {
    let result = run_document(file, pages, options)?;
    println!("{}", to_json(&result.metadata, true)?);
    Ok(())
}
