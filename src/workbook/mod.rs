/*!
 * Workbook input.
 *
 * - `sheet`: the in-memory cell grid the alignment works on
 * - `reader`: loads the first worksheet of a workbook file with calamine
 * - `rich_text`: renders rich-text shared strings of `.xlsx` packages as markup
 */

pub mod sheet;
pub mod reader;
pub mod rich_text;

pub use reader::WorkbookReader;
pub use sheet::{Cell, Sheet, escape_markup};
