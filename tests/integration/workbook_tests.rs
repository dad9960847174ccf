/*!
 * Workbook loading tests against generated .xlsx files
 */

use anyhow::Result;
use sheetalign::errors::WorkbookError;
use sheetalign::workbook::WorkbookReader;
use sheetalign::workbook::rich_text::RichTextIndex;

use crate::common::{self, TestCell};

/// Plain text cells are read with their escaped markup
#[test]
fn test_open_withPlainWorkbook_shouldReadFirstTwoColumns() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_plain_workbook(
        temp_dir.path(),
        "plain.xlsx",
        &[(Some("Fish & chips"), Some("Ryba a hranolky")), (None, Some("pokračování"))],
    )?;

    let sheet = WorkbookReader::open(&path)?;

    assert_eq!(sheet.row_range(), Some(0..=1));
    let source = sheet.cell(0, 0).expect("source cell");
    assert_eq!(source.value, "Fish & chips");
    assert_eq!(source.markup, "Fish &amp; chips");
    assert!(sheet.cell(1, 0).is_none());
    assert_eq!(sheet.cell(1, 1).map(|c| c.value.as_str()), Some("pokračování"));

    Ok(())
}

/// Rich text cells keep their runs as spans
#[test]
fn test_open_withRichText_shouldRenderFontSizeSpans() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_workbook(
        temp_dir.path(),
        "rich.xlsx",
        &[(
            TestCell::Rich(vec![(12.0, false, "Hello "), (9.0, true, "topic")]),
            TestCell::Text("Ahoj"),
        )],
    )?;

    let sheet = WorkbookReader::open(&path)?;

    let source = sheet.cell(0, 0).expect("source cell");
    assert_eq!(source.value, "Hello topic");
    assert!(source.markup.contains(r#"<span style="font-size:12pt;">Hello </span>"#));
    assert!(source.markup.contains(r#"<span style="font-size:9pt;"><b>topic</b></span>"#));
    assert_eq!(sheet.cell(0, 1).map(|c| c.markup.as_str()), Some("Ahoj"));

    Ok(())
}

/// Only cells with formatted runs end up in the rich-text index
#[test]
fn test_richTextIndex_load_shouldOnlyIndexFormattedCells() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let plain = common::create_plain_workbook(temp_dir.path(), "plain.xlsx", &[(Some("a"), Some("b"))])?;
    let rich = common::create_workbook(
        temp_dir.path(),
        "rich.xlsx",
        &[(TestCell::Rich(vec![(12.0, false, "Hi "), (9.0, false, "there")]), TestCell::Text("Ahoj"))],
    )?;

    assert!(RichTextIndex::load(&plain)?.is_empty());

    let index = RichTextIndex::load(&rich)?;
    assert!(!index.is_empty());
    assert_eq!(index.len(), 1);
    assert!(index.markup(0, 0).is_some());
    assert!(index.markup(0, 1).is_none());

    Ok(())
}

/// A non-workbook file is reported as an open error
#[test]
fn test_open_withGarbageFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.xlsx", "not a zip archive")?;

    let result = WorkbookReader::open(&path);

    assert!(matches!(result, Err(WorkbookError::Open(_))));
    Ok(())
}
