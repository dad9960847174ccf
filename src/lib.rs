/*!
 * # sheetalign - bilingual spreadsheets to aligned XML corpora
 *
 * A Rust library that turns a two-column translation workbook into a
 * TEI-style parallel corpus.
 *
 * ## Features
 *
 * - Read the first sheet of `.xlsx`, `.xlsm`, `.xls` and `.ods` workbooks
 * - Keep rich-text formatting of `.xlsx` cells as markup
 * - Strip, replace and divide markup with configurable tag rules
 * - Normalize every cell into a well-formed fragment
 * - Merge one-sided follow-up rows into the preceding pair
 * - Emit reciprocal `id`/`corresp` segments with optional `xml:lang`
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and rule compilation
 * - `workbook`: Workbook loading and rich-text rendering
 * - `alignment`: Cell transforms, normalization, continuation merging and emission:
 *   - `alignment::tags`: Structural tag pattern matching
 *   - `alignment::transform`: Strip / replace / divide rules
 *   - `alignment::normalize`: Fragment normalization
 *   - `alignment::continuation`: One-sided row merging
 *   - `alignment::emitter`: Row scan and document assembly
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod workbook;
pub mod alignment;
pub mod app_controller;

// Re-export main types for easier usage
pub use app_config::{Config, DivideRule, ReplaceRule, TagRuleSet};
pub use alignment::{AlignmentEmitter, CellFormatter, CellTextTransformer, Document, EmitSummary, MarkupNormalizer};
pub use app_controller::Controller;
pub use errors::{AppError, ConfigError, TransformError, WorkbookError};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use workbook::{Sheet, WorkbookReader};
