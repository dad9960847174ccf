/*!
 * Row scan and document assembly.
 *
 * Every fully populated row yields an `AlignmentPair`: a source and a target
 * segment whose `corresp` attributes point at each other. One-sided rows are
 * either absorbed into the preceding pair by continuation merging or reported,
 * fully empty rows are skipped.
 */

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use indicatif::ProgressBar;
use log::{debug, warn};
use quick_xml::escape::escape;

use crate::alignment::continuation::{ContinuationColumns, RowContinuationResolver};
use crate::alignment::transform::CellFormatter;
use crate::app_config::Config;
use crate::errors::{ConfigError, TransformError};
use crate::workbook::{Cell, Sheet};

/// One side of an aligned translation unit
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: String,
    pub corresp: String,
    pub language: Option<String>,
    pub content: String,
}

impl Segment {
    fn write_xml(&self, tag: &str, out: &mut String) {
        out.push_str("  <");
        out.push_str(tag);
        out.push_str(" id=\"");
        out.push_str(&escape(&self.id));
        out.push_str("\" corresp=\"");
        out.push_str(&escape(&self.corresp));
        out.push('"');
        if let Some(language) = &self.language {
            out.push_str(" xml:lang=\"");
            out.push_str(&escape(language));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.content);
        out.push_str("</");
        out.push_str(tag);
        out.push_str(">\n");
    }
}

/// The two reciprocal segments of one row
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentPair {
    /// 0-based row the pair is anchored at
    pub row: u32,
    pub source: Segment,
    pub target: Segment,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub rows_scanned: usize,
    pub pairs: usize,
    pub merged_rows: usize,
    pub empty_rows: usize,
    pub unpaired_rows: usize,
}

/// The aligned corpus, ready to be serialized
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub parent_tag: String,
    pub row_tag: String,
    pub pairs: Vec<AlignmentPair>,
    pub summary: EmitSummary,
}

impl Document {
    /// All segments in output order: row by row, source before target
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.pairs.iter().flat_map(|pair| [&pair.source, &pair.target])
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push('<');
        out.push_str(&self.parent_tag);
        out.push_str(">\n");
        for segment in self.segments() {
            segment.write_xml(&self.row_tag, &mut out);
        }
        out.push_str("</");
        out.push_str(&self.parent_tag);
        out.push_str(">\n");
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

/// `{Initial}-{column}-{row}` with the uppercased first character of the
/// source cell and the 1-based row number
pub fn segment_id(source_value: &str, column: u32, row: u32) -> String {
    let initial: String = source_value
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    format!("{}-{}-{}", initial, column, row + 1)
}

/// Drives the row scan and builds the document
pub struct AlignmentEmitter<'a> {
    config: &'a Config,
    formatter: CellFormatter,
    progress: Option<ProgressBar>,
}

impl<'a> AlignmentEmitter<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ConfigError> {
        let formatter = CellFormatter::new(config.rule_set()?, config.dirty);
        Ok(Self {
            config,
            formatter,
            progress: None,
        })
    }

    /// Advance `progress` once per scanned row
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scan the sheet's whole used range
    pub fn emit(&self, sheet: &Sheet) -> Result<Document, TransformError> {
        match sheet.row_range() {
            Some(rows) => self.emit_range(sheet, rows),
            None => Ok(self.document(Vec::new(), EmitSummary::default())),
        }
    }

    pub fn emit_range(&self, sheet: &Sheet, rows: RangeInclusive<u32>) -> Result<Document, TransformError> {
        let resolver = RowContinuationResolver::new(sheet, &self.formatter);
        let mut pairs = Vec::new();
        let mut absorbed = HashSet::new();
        let mut summary = EmitSummary::default();

        for row in rows {
            summary.rows_scanned += 1;
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }

            match (sheet.cell(row, 0), sheet.cell(row, 1)) {
                (Some(source), Some(target)) => {
                    let pair = self.build_pair(&resolver, row, source, target, &mut absorbed)?;
                    pairs.push(pair);
                }
                (None, None) => {
                    warn!("[{}]\tRow is empty", row + 1);
                    summary.empty_rows += 1;
                }
                (source, _) => {
                    let side = if source.is_some() { "Second" } else { "First" };
                    if absorbed.contains(&row) {
                        debug!("[{}]\t{} cell is empty, content was merged into a previous row", row + 1, side);
                    } else if !self.config.merge_continuations {
                        debug!("[{}]\t{} cell is empty, row ignored", row + 1, side);
                        summary.unpaired_rows += 1;
                    } else {
                        warn!("[{}]\t{} cell is empty and there is no row to merge it into", row + 1, side);
                        summary.unpaired_rows += 1;
                    }
                }
            }
        }

        summary.pairs = pairs.len();
        summary.merged_rows = absorbed.len();
        Ok(self.document(pairs, summary))
    }

    fn build_pair(
        &self,
        resolver: &RowContinuationResolver<'_>,
        row: u32,
        source: &Cell,
        target: &Cell,
        absorbed: &mut HashSet<u32>,
    ) -> Result<AlignmentPair, TransformError> {
        let source_id = segment_id(&source.value, 0, row);
        let target_id = segment_id(&source.value, 1, row);

        let mut source_content = self.formatter.format(&source.markup).map_err(|e| e.at(row, 0))?;
        let mut target_content = self.formatter.format(&target.markup).map_err(|e| e.at(row, 1))?;

        if self.config.merge_continuations {
            let target_tail = resolver.resolve(row, ContinuationColumns::TARGET)?;
            let source_tail = resolver.resolve(row, ContinuationColumns::SOURCE)?;

            target_content.push_str(&target_tail.suffix);
            source_content.push_str(&source_tail.suffix);
            absorbed.extend(target_tail.rows.iter().chain(&source_tail.rows).copied());
        }

        Ok(AlignmentPair {
            row,
            source: Segment {
                id: source_id.clone(),
                corresp: target_id.clone(),
                language: self.config.language_for_column(0).map(str::to_string),
                content: source_content,
            },
            target: Segment {
                id: target_id,
                corresp: source_id,
                language: self.config.language_for_column(1).map(str::to_string),
                content: target_content,
            },
        })
    }

    fn document(&self, pairs: Vec<AlignmentPair>, summary: EmitSummary) -> Document {
        Document {
            parent_tag: self.config.parent_tag_name.clone(),
            row_tag: self.config.row_tag_name.clone(),
            pairs,
            summary,
        }
    }
}
