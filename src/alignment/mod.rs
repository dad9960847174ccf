/*!
 * Alignment of bilingual spreadsheet rows.
 *
 * This module turns the cells of a two-column sheet into paired segments:
 * - `tags`: structural matching of configured tag patterns
 * - `transform`: strip / replace / divide rules applied to one cell
 * - `normalize`: canonical re-serialization of a markup fragment
 * - `continuation`: merging of one-sided follow-up rows
 * - `emitter`: the row scan and document assembly
 */

pub mod tags;
pub mod transform;
pub mod normalize;
pub mod continuation;
pub mod emitter;

// Re-export main types
pub use continuation::{Continuation, ContinuationColumns, RowContinuationResolver};
pub use emitter::{AlignmentEmitter, AlignmentPair, Document, EmitSummary, Segment};
pub use normalize::MarkupNormalizer;
pub use tags::TagPattern;
pub use transform::{CellFormatter, CellTextTransformer};
