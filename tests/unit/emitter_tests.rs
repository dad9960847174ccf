/*!
 * Tests for the row scan and the XML document
 */

use anyhow::Result;
use sheetalign::alignment::AlignmentEmitter;
use sheetalign::app_config::Config;
use sheetalign::workbook::Sheet;

fn corpus_config() -> Config {
    Config {
        strip_tags: Vec::new(),
        replace_tags: Vec::new(),
        divide_by: Vec::new(),
        row_tag_name: "seg".to_string(),
        parent_tag_name: "corpus".to_string(),
        language: vec!["cat".to_string(), "cze".to_string()],
        ..Config::default()
    }
}

#[test]
fn test_toXml_withTwoFullRows_shouldEmitFourLinkedSegments() -> Result<()> {
    let config = corpus_config();
    let sheet = Sheet::from_pairs(&[(Some("hola"), Some("ahoj")), (Some("adéu"), Some("sbohem"))]);

    let xml = AlignmentEmitter::new(&config)?.emit(&sheet)?.to_xml();

    let expected = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n",
        "<corpus>\n",
        "  <seg id=\"H-0-1\" corresp=\"H-1-1\" xml:lang=\"cat\">hola</seg>\n",
        "  <seg id=\"H-1-1\" corresp=\"H-0-1\" xml:lang=\"cze\">ahoj</seg>\n",
        "  <seg id=\"A-0-2\" corresp=\"A-1-2\" xml:lang=\"cat\">adéu</seg>\n",
        "  <seg id=\"A-1-2\" corresp=\"A-0-2\" xml:lang=\"cze\">sbohem</seg>\n",
        "</corpus>\n",
    );
    assert_eq!(xml, expected);
    Ok(())
}

#[test]
fn test_emit_everyPair_shouldHaveReciprocalDistinctIds() -> Result<()> {
    let config = corpus_config();
    let rows: Vec<(String, String)> = (0..50).map(|i| (format!("src {i}"), format!("tgt {i}"))).collect();
    let pairs: Vec<(Option<&str>, Option<&str>)> =
        rows.iter().map(|(s, t)| (Some(s.as_str()), Some(t.as_str()))).collect();
    let sheet = Sheet::from_pairs(&pairs);

    let document = AlignmentEmitter::new(&config)?.emit(&sheet)?;

    assert_eq!(document.pairs.len(), 50);
    for pair in &document.pairs {
        assert_ne!(pair.source.id, pair.target.id);
        assert_eq!(pair.source.corresp, pair.target.id);
        assert_eq!(pair.target.corresp, pair.source.id);
    }
    Ok(())
}

#[test]
fn test_emit_continuationRow_shouldMergeAndEmitNothingForIt() -> Result<()> {
    let config = corpus_config();
    let sheet = Sheet::from_pairs(&[
        (Some("x"), Some("y")),
        (None, None),
        (None, None),
        (None, None),
        (Some("A1"), Some("B1")),
        (None, Some("B2")),
    ]);

    let document = AlignmentEmitter::new(&config)?.emit(&sheet)?;

    assert_eq!(document.pairs.len(), 2);
    assert_eq!(document.pairs[1].row, 4);
    assert_eq!(document.pairs[1].target.content, "B1 B2");
    assert_eq!(document.segments().count(), 4);
    assert!(!document.to_xml().contains("-6\""));
    Ok(())
}

#[test]
fn test_emit_emptyRows_shouldNeverAppear() -> Result<()> {
    let config = corpus_config();
    let sheet = Sheet::from_pairs(&[(None, None), (Some("a"), Some("b")), (None, None)]);

    let document = AlignmentEmitter::new(&config)?.emit(&sheet)?;

    assert_eq!(document.pairs.len(), 1);
    assert_eq!(document.pairs[0].source.id, "A-0-2");
    assert_eq!(document.summary.empty_rows, 2);
    assert_eq!(document.summary.rows_scanned, 3);
    Ok(())
}

#[test]
fn test_emit_withEmptySheet_shouldProduceEmptyParent() -> Result<()> {
    let config = corpus_config();
    let sheet = Sheet::new("Empty");

    let xml = AlignmentEmitter::new(&config)?.emit(&sheet)?.to_xml();

    assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<corpus>\n</corpus>\n");
    Ok(())
}

#[test]
fn test_emit_withDefaultRules_shouldDivideSegments() -> Result<()> {
    let config = Config::default();
    let sheet = Sheet::from_pairs(&[(Some("Title: subtitle"), Some("Titul: podtitul"))]);

    let document = AlignmentEmitter::new(&config)?.emit(&sheet)?;

    assert_eq!(document.pairs[0].source.content, "Title <appendix>subtitle</appendix>");
    assert_eq!(document.pairs[0].target.content, "Titul <appendix>podtitul</appendix>");
    assert_eq!(document.pairs[0].source.language, None);
    Ok(())
}

#[test]
fn test_emit_withSingleLanguage_shouldOnlyTagSourceColumn() -> Result<()> {
    let config = Config { language: vec!["en".to_string()], ..corpus_config() };
    let sheet = Sheet::from_pairs(&[(Some("a"), Some("b"))]);

    let xml = AlignmentEmitter::new(&config)?.emit(&sheet)?.to_xml();

    assert!(xml.contains("<seg id=\"A-0-1\" corresp=\"A-1-1\" xml:lang=\"en\">a</seg>"));
    assert!(xml.contains("<seg id=\"A-1-1\" corresp=\"A-0-1\">b</seg>"));
    Ok(())
}
