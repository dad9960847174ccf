use std::collections::HashMap;
use std::ops::RangeInclusive;

// @module: In-memory view of the first worksheet

/// One populated cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    // @field: 0-based row index
    pub row: u32,

    // @field: 0-based column index
    pub col: u32,

    // @field: Cell content as markup (rich text rendered as spans, plain text escaped)
    pub markup: String,

    // @field: Cell content as plain text
    pub value: String,
}

impl Cell {
    pub fn new(row: u32, col: u32, markup: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            markup: markup.into(),
            value: value.into(),
        }
    }

    /// A cell whose markup is its escaped plain text
    pub fn plain(row: u32, col: u32, value: &str) -> Self {
        Self::new(row, col, escape_markup(value), value)
    }
}

/// A read-only grid of cells plus the declared used range
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    rows: Option<RangeInclusive<u32>>,
    cells: HashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: None,
            cells: HashMap::new(),
        }
    }

    /// Build a two-column sheet from `(source, target)` rows starting at row 0
    pub fn from_pairs(pairs: &[(Option<&str>, Option<&str>)]) -> Self {
        let mut sheet = Self::new("Sheet1");
        for (row, (source, target)) in pairs.iter().enumerate() {
            let row = row as u32;
            if let Some(source) = source {
                sheet.insert(Cell::plain(row, 0, source));
            }
            if let Some(target) = target {
                sheet.insert(Cell::plain(row, 1, target));
            }
        }
        if !pairs.is_empty() {
            sheet.set_row_range(0..=(pairs.len() as u32 - 1));
        }
        sheet
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the used range; rows outside it are never scanned
    pub fn set_row_range(&mut self, rows: RangeInclusive<u32>) {
        self.rows = Some(rows);
    }

    /// The declared used range, `None` for an empty sheet
    pub fn row_range(&self) -> Option<RangeInclusive<u32>> {
        self.rows.clone()
    }

    /// Last row of the used range
    pub fn last_row(&self) -> Option<u32> {
        self.rows.as_ref().map(|rows| *rows.end())
    }

    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert((cell.row, cell.col), cell);
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Escape text for use as markup, turning line breaks into `<br/>`
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => out.push_str("<br/>"),
            _ => out.push(c),
        }
    }
    out
}
