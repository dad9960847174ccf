/*!
 * Row continuation merging.
 *
 * When the text of one column spans several physical rows, the follow-up rows
 * only have a cell in that column. Those cells are appended, in row order and
 * separated by single spaces, to the segment of the last fully populated row.
 */

use log::info;

use crate::alignment::transform::CellFormatter;
use crate::errors::TransformError;
use crate::workbook::Sheet;

/// Which column must be empty and which one carries the continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationColumns {
    pub empty: u32,
    pub content: u32,
}

impl ContinuationColumns {
    /// Continuations of the target column (source column empty)
    pub const TARGET: Self = Self { empty: 0, content: 1 };

    /// Continuations of the source column (target column empty)
    pub const SOURCE: Self = Self { empty: 1, content: 0 };
}

/// Content gathered from follow-up rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Continuation {
    /// Text to append verbatim to the anchor segment
    pub suffix: String,

    /// Rows whose cell was absorbed, in increasing order
    pub rows: Vec<u32>,
}

impl Continuation {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Walks forward from an anchor row collecting one-sided follow-up rows
pub struct RowContinuationResolver<'a> {
    sheet: &'a Sheet,
    formatter: &'a CellFormatter,
}

impl<'a> RowContinuationResolver<'a> {
    pub fn new(sheet: &'a Sheet, formatter: &'a CellFormatter) -> Self {
        Self { sheet, formatter }
    }

    /// Collect the continuation of `columns.content` after `start_row`
    ///
    /// Stops at the first row where the empty column has a cell, where the
    /// content column has none, or at the end of the used range.
    pub fn resolve(&self, start_row: u32, columns: ContinuationColumns) -> Result<Continuation, TransformError> {
        let Some(last_row) = self.sheet.last_row() else {
            return Ok(Continuation::default());
        };

        let mut continuation = Continuation::default();
        let mut cursor = start_row;

        while cursor < last_row {
            let next = cursor + 1;
            if self.sheet.cell(next, columns.empty).is_some() {
                break;
            }
            let Some(cell) = self.sheet.cell(next, columns.content) else {
                break;
            };

            let content = self
                .formatter
                .format(&cell.markup)
                .map_err(|e| e.at(next, columns.content))?;

            info!(
                "[{}]\tHas one cell empty, the other cell: \"{}\" was appended to the row #{}",
                next + 1,
                content,
                start_row + 1
            );

            continuation.suffix.push(' ');
            continuation.suffix.push_str(&content);
            continuation.rows.push(next);
            cursor = next;
        }

        Ok(continuation)
    }
}
