use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use log::{debug, info};

use crate::errors::WorkbookError;
use crate::workbook::rich_text::RichTextIndex;
use crate::workbook::sheet::{Cell, Sheet, escape_markup};

// @module: Workbook loading

/// Columns read from every row: source and target
const COLUMNS: [u32; 2] = [0, 1];

/// Loads the first worksheet of a workbook into a `Sheet`
pub struct WorkbookReader;

impl WorkbookReader {
    /// Open `path` and read its first worksheet
    ///
    /// Any format calamine understands is accepted. For `.xlsx`/`.xlsm`
    /// packages rich-text cells additionally carry their formatting as markup.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Sheet, WorkbookError> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(|e| WorkbookError::Open(e.to_string()))?;

        let name = workbook.sheet_names().first().cloned().ok_or(WorkbookError::NoSheet)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(WorkbookError::NoSheet)?
            .map_err(|e| WorkbookError::Sheet {
                sheet: name.clone(),
                message: e.to_string(),
            })?;

        let rich = if Self::is_package(path) {
            RichTextIndex::load(path)?
        } else {
            RichTextIndex::default()
        };

        let sheet = Self::sheet_from_range(&name, &range, &rich);
        info!("Loaded worksheet '{}' from {} ({} cells)", name, path.display(), sheet.len());
        if rich.is_empty() {
            debug!("No rich-text cells in {}, markup is derived from plain values", path.display());
        }
        Ok(sheet)
    }

    /// Build a `Sheet` from the first two columns of a calamine range
    pub fn sheet_from_range(name: &str, range: &Range<Data>, rich: &RichTextIndex) -> Sheet {
        let mut sheet = Sheet::new(name);
        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            debug!("Worksheet '{}' is empty", name);
            return sheet;
        };

        sheet.set_row_range(start.0..=end.0);
        for row in start.0..=end.0 {
            for col in COLUMNS {
                let Some(data) = range.get_value((row, col)) else {
                    continue;
                };
                if matches!(data, Data::Empty) {
                    continue;
                }

                let value = cell_text(data);
                let markup = match rich.markup(row, col) {
                    Some(markup) => markup.to_string(),
                    None => escape_markup(&value),
                };
                sheet.insert(Cell::new(row, col, markup, value));
            }
        }
        sheet
    }

    fn is_package(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm"))
            .unwrap_or(false)
    }
}

/// Formatted text of a cell value
fn cell_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
