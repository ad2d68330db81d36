//! Integration tests for whole-document extraction.
//!
//! These tests feed synthetic decoded pages (words plus ruling lines) through
//! the full pipeline: column segmentation, line assembly, lattice and stream
//! detection, ranking, and the cross-page merge.

mod common;

use common::{HEADER, LEFT_COLUMN, PageBuilder, RIGHT_COLUMN, two_page_report};
use pdfreflow::{
    CellValue, Document, MergeMode, ReflowOptions, Ruling, Strategy, WarningCode,
};

fn extract(pages: Vec<pdfreflow::Page>) -> pdfreflow::DocumentResult {
    Document::new(pages).extract(&ReflowOptions::default())
}

#[test]
fn two_page_report_text_keeps_column_order() {
    let result = extract(two_page_report());

    assert_eq!(result.pages.len(), 2);
    let expected_page1 = format!("{}\n\n{}", LEFT_COLUMN.join("\n"), RIGHT_COLUMN.join("\n"));
    assert_eq!(result.pages[0].text, expected_page1);
    assert_eq!(result.pages[1].text, "Continued from page one");
}

#[test]
fn two_page_report_merges_into_one_table() {
    let result = extract(two_page_report());

    assert_eq!(result.pages[0].tables.len(), 1);
    assert_eq!(result.pages[0].tables[0].strategy, Strategy::Lattice);
    assert_eq!(result.pages[1].tables.len(), 1);
    assert_eq!(result.pages[1].tables[0].strategy, Strategy::Stream);

    assert_eq!(result.tables.len(), 1);
    let table = &result.tables[0];
    assert_eq!(table.header, HEADER.map(String::from).to_vec());
    assert_eq!(table.origin_pages, vec![1, 2]);
    assert_eq!(table.modes(), vec![MergeMode::New, MergeMode::Appended]);
    assert_eq!(table.rows.len(), 4);
    assert!(table.rows.iter().all(|r| r.len() == 3));

    assert_eq!(table.rows[0][0], CellValue::Text("Bolt".to_string()));
    assert_eq!(table.rows[0][1], CellValue::Number(10.0));
    assert_eq!(table.rows[0][2], CellValue::Number(0.5));
    assert_eq!(table.rows[2][0], CellValue::Text("Washer".to_string()));
    assert_eq!(table.rows[3][2], CellValue::Number(0.15));
}

#[test]
fn two_page_report_plain_text_and_metadata() {
    let result = Document::new(two_page_report())
        .with_filename("report.pdf")
        .extract(&ReflowOptions::default());

    let plain = result.to_plain_text();
    assert!(plain.starts_with("=== PAGE 1 ===\nSales rose in the third quarter\n"));
    assert!(plain.contains("\n\n=== PAGE 2 ===\nContinued from page one\n\n"));
    assert!(!plain.contains("Bolt"));

    let meta = &result.metadata;
    assert_eq!(meta.filename.as_deref(), Some("report.pdf"));
    assert_eq!(meta.pages_total, 2);
    assert_eq!(meta.tables_found, 2);
    assert_eq!(meta.images_found, 1);
    assert_eq!(meta.page_stats[0].images, 1);
    assert!(meta.page_stats.iter().all(|s| !s.likely_scanned));
    assert_eq!(meta.page_stats[1].text_chars, "Continued from page one".len());

    let summaries = result.table_summaries();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.label == "Table_1"));
    assert_eq!(summaries[0].mode, MergeMode::New);
    assert_eq!(summaries[1].mode, MergeMode::Appended);
    assert_eq!(summaries[1].rows, 2);
    assert_eq!(summaries[1].columns, 3);
}

#[test]
fn changed_header_starts_a_new_table() {
    let pages = vec![
        PageBuilder::new(1)
            .table(100.0, &[HEADER, ["Bolt", "10", "0,50"]], true)
            .build(),
        PageBuilder::new(2)
            .table(100.0, &[["item", "QTY", "price"], ["Nut", "2", "1"]], false)
            .build(),
        PageBuilder::new(3)
            .table(100.0, &[["Name", "Role", "Team"], ["Ann", "Lead", "Core"]], false)
            .build(),
    ];
    let result = extract(pages);

    assert_eq!(result.tables.len(), 2);
    assert_eq!(result.tables[0].modes(), vec![MergeMode::New, MergeMode::Appended]);
    assert_eq!(result.tables[0].origin_pages, vec![1, 2]);
    assert_eq!(result.tables[1].modes(), vec![MergeMode::New]);
    assert_eq!(result.tables[1].header, vec!["Name", "Role", "Team"]);
}

#[test]
fn table_on_non_adjacent_page_is_not_rejoined() {
    let pages = vec![
        PageBuilder::new(1)
            .table(100.0, &[HEADER, ["Bolt", "10", "0,50"]], true)
            .build(),
        PageBuilder::new(2)
            .table(100.0, &[["Name", "Role", "Team"], ["Ann", "Lead", "Core"]], true)
            .build(),
        PageBuilder::new(3)
            .table(100.0, &[HEADER, ["Nut", "2", "1"]], true)
            .build(),
    ];
    let result = extract(pages);
    assert_eq!(result.tables.len(), 3);
    assert!(result.tables.iter().all(|t| t.modes() == vec![MergeMode::New]));
}

#[test]
fn three_prose_columns_keep_their_text() {
    let columns: [[&str; 4]; 3] = [
        ["Markets opened", "higher on Monday after", "a quiet week of", "trading in Asia"],
        ["Rates held steady", "as the bank waited", "for more signs of", "slowing price growth"],
        ["Weather stays", "mild through the", "weekend with light", "rain in the north"],
    ];
    let page = PageBuilder::new(1)
        .column(40.0, 100.0, &columns[0])
        .column(230.0, 100.0, &columns[1])
        .column(420.0, 100.0, &columns[2])
        .build();
    let result = extract(vec![page]);

    let expected = columns.map(|c| c.join("\n")).join("\n\n");
    assert_eq!(result.pages[0].text, expected);
    assert!(result.pages[0].tables.is_empty());
    assert!(result.tables.is_empty());
    assert_eq!(result.metadata.tables_found, 0);
}

#[test]
fn empty_page_is_likely_scanned() {
    let pages = vec![
        PageBuilder::new(1).images(1).build(),
        PageBuilder::new(2).line(72.0, 100.0, "Page 2").build(),
    ];
    let result = extract(pages);

    assert_eq!(result.pages[0].text, "");
    assert!(result.pages[0].likely_scanned);
    assert!(result.pages[1].likely_scanned);
    assert_eq!(result.to_plain_text(), "=== PAGE 1 ===\n\n\n=== PAGE 2 ===\nPage 2\n\n");
    assert!(result.tables.is_empty());
}

#[test]
fn broken_ruling_falls_back_to_stream() {
    let page = PageBuilder::new(1)
        .table(100.0, &[HEADER, ["Bolt", "10", "0,50"], ["Nut", "25", "0,20"]], true)
        .ruling(Ruling::vertical(f64::NAN, 0.0, 50.0))
        .build();
    let result = extract(vec![page]);

    let warnings: Vec<_> = result.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::StrategyFailure);
    assert_eq!(warnings[0].strategy, Some(Strategy::Lattice));
    assert_eq!(warnings[0].page, Some(1));

    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].segments[0].strategy, Strategy::Stream);
    assert_eq!(result.tables[0].rows.len(), 2);
    assert!(result.pages[0].error.is_none());
}

#[test]
fn word_order_does_not_change_output() {
    let forward = extract(two_page_report());
    let reversed = extract(
        two_page_report()
            .into_iter()
            .map(|page| {
                let mut words = page.words().to_vec();
                words.reverse();
                pdfreflow::Page::with_geometry(
                    page.page_number(),
                    page.width(),
                    page.height(),
                    words,
                    page.rulings().to_vec(),
                    page.rects().to_vec(),
                )
                .with_image_count(page.image_count())
            })
            .collect(),
    );
    assert_eq!(forward.to_plain_text(), reversed.to_plain_text());
    assert_eq!(forward.tables, reversed.tables);
}

#[test]
fn sequential_run_matches_parallel_run() {
    let doc = Document::new(two_page_report());
    let parallel = doc.extract(&ReflowOptions::default());
    let sequential = doc.extract(&ReflowOptions {
        parallel: false,
        ..ReflowOptions::default()
    });
    assert_eq!(parallel, sequential);
}
