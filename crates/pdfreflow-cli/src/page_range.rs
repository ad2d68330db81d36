/// Parse a page range string like "1,3-5" into a sorted list of 0-indexed page positions.
///
/// Input is 1-indexed (user-facing) and counts pages in file order. Output is
/// 0-indexed (internal). Returns an error for invalid input (page 0, reversed
/// or malformed ranges, pages past the end).
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            Some((start_str, end_str)) => (parse_page(start_str)?, parse_page(end_str)?),
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };

        if start > end {
            return Err(format!("invalid range: '{part}' (start after end)"));
        }
        if end > page_count {
            return Err(format!(
                "page {end} exceeds document page count ({page_count})"
            ));
        }
        pages.extend((start..=end).map(|p| p - 1));
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page(text: &str) -> Result<usize, String> {
    let page: usize = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{}'", text.trim()))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    Ok(page)
}
