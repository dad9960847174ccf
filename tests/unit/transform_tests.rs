/*!
 * Tests for the cell transform stages and markup normalization
 */

use anyhow::Result;
use sheetalign::alignment::{CellFormatter, CellTextTransformer, MarkupNormalizer, TagPattern};
use sheetalign::app_config::{Config, DivideRule};

const SAMPLES: &[&str] = &[
    "",
    "plain",
    "Hello: world",
    "a &amp; b",
    "  padded  ",
    "ünïcødé ✓ 中文",
    "line<br/>break",
];

/// Remove everything between `<` and `>` to compare visible text
fn visible_text(markup: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[test]
fn test_stripTags_ofWrappedPlainText_shouldReturnOriginal() -> Result<()> {
    let rule = TagPattern::parse(r#"<span style="font-size:12pt;">"#)?;

    for sample in SAMPLES.iter().filter(|s| !s.contains('<')) {
        let wrapped = rule.wrap(sample);
        assert_eq!(CellTextTransformer::strip_tags(&wrapped, std::slice::from_ref(&rule)), *sample);
    }

    Ok(())
}

#[test]
fn test_stripTags_withSingleQuotedMarkup_shouldStillMatch() -> Result<()> {
    let rule = TagPattern::parse(r#"<span style="font-size:12pt;">"#)?;

    let result = CellTextTransformer::strip_tags("<span style='font-size:12pt;'>x</span> y", &[rule]);

    assert_eq!(result, "x y");
    Ok(())
}

#[test]
fn test_stripTags_withNestedSameNameTags_shouldKeepInnerSpans() -> Result<()> {
    let rule = TagPattern::parse(r#"<span style="font-size:12pt;">"#)?;
    let markup = r#"<span style="font-size:12pt;">a <span style="color:red">b</span> c</span>"#;

    let result = CellTextTransformer::strip_tags(markup, &[rule]);

    assert_eq!(result, r#"a <span style="color:red">b</span> c"#);
    Ok(())
}

#[test]
fn test_replaceTags_shouldPreserveVisibleText() -> Result<()> {
    let from = TagPattern::parse(r#"<span style="font-size:9pt;">"#)?;
    let to = TagPattern::parse("<topic>")?;
    let rules = [(from.clone(), to)];

    for sample in SAMPLES.iter().filter(|s| !s.contains('<')) {
        let markup = format!("before {} after", from.wrap(sample));
        let replaced = CellTextTransformer::replace_tags(&markup, &rules);

        assert_eq!(visible_text(&replaced), visible_text(&markup));
        assert!(replaced.contains(&format!("<topic>{}</topic>", sample)));
    }

    Ok(())
}

#[test]
fn test_divideBy_withDefaultRule_shouldWrapTail() {
    let rules = [DivideRule::new(": ", "appendix")];
    assert_eq!(
        CellTextTransformer::divide_by("Hello: world", &rules),
        "Hello <appendix>world</appendix>"
    );
}

#[test]
fn test_divideBy_withOnlySecondDelimiterPresent_shouldBeUnchanged() {
    let rules = [DivideRule::new(": ", "appendix"), DivideRule::new(" - ", "note")];
    assert_eq!(CellTextTransformer::divide_by("Hello - world", &rules), "Hello - world");
}

#[test]
fn test_divideBy_shouldOnlySplitAtFirstOccurrence() {
    let rules = [DivideRule::new(": ", "appendix")];
    assert_eq!(
        CellTextTransformer::divide_by("a: b: c", &rules),
        "a <appendix>b: c</appendix>"
    );
}

#[test]
fn test_normalize_shouldBeIdempotent() -> Result<()> {
    let inputs = [
        "plain",
        "<b>bold</b> and <i>italic",
        "<span style='font-size:9pt;'>x</span>",
        "<p><br></p>",
        "stray</em> close",
        "a &amp; b &lt; c",
        r#"<a t="x<y">R&D</a>"#,
    ];

    for input in inputs {
        let once = MarkupNormalizer::normalize(input)?;
        let twice = MarkupNormalizer::normalize(&once)?;
        assert_eq!(once, twice, "normalizing {:?} twice changed it", input);
    }

    Ok(())
}

#[test]
fn test_format_withDefaultConfig_shouldStripReplaceAndDivide() -> Result<()> {
    let formatter = CellFormatter::new(Config::default().rule_set()?, false);
    let markup = concat!(
        r#"<span style="font-size:12pt;">Chapter: one </span>"#,
        r#"<span style="font-size:9pt;">topic</span>"#
    );

    let result = formatter.format(markup)?;

    assert_eq!(result, "Chapter <appendix>one <topic>topic</topic></appendix>");
    Ok(())
}

#[test]
fn test_format_withDefaultConfigOnUnderlinedSpan_shouldKeepAttributeIntact() -> Result<()> {
    let formatter = CellFormatter::new(Config::default().rule_set()?, false);
    let markup = r#"<span style="text-decoration: underline;font-size:12pt;">Note</span>"#;

    assert_eq!(formatter.format(markup)?, markup);
    Ok(())
}

#[test]
fn test_format_withDefaultConfigOnUnderlinedSpanWithDelimiter_shouldDivideText() -> Result<()> {
    let formatter = CellFormatter::new(Config::default().rule_set()?, false);
    let markup = r#"<span style="text-decoration: underline;font-size:12pt;">Note: one</span>"#;

    assert_eq!(
        formatter.format(markup)?,
        r#"<span style="text-decoration: underline;font-size:12pt;">Note <appendix>one</appendix></span>"#
    );
    Ok(())
}

#[test]
fn test_format_withLessThanInAttribute_shouldEscapeIt() -> Result<()> {
    let formatter = CellFormatter::dirty();
    assert_eq!(formatter.format(r#"<a t="x<y">z</a>"#)?, r#"<a t="x&lt;y">z</a>"#);
    Ok(())
}

#[test]
fn test_format_withDirtyFormatter_shouldKeepSpans() -> Result<()> {
    let formatter = CellFormatter::dirty();
    let markup = r#"<span style="font-size:12pt;">Chapter: one</span>"#;

    assert_eq!(formatter.format(markup)?, markup);
    Ok(())
}
