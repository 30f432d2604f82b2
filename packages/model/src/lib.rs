//! # Blockdeck Model
//!
//! Content model shared by the presentation and case-study builders.
//!
//! ```text
//! Document ─┬─ Slide ─┬─ Block (heading)
//!           │         ├─ Block (stat-card)
//!           │         └─ …
//!           └─ Slide ── …
//! ```
//!
//! The model only constructs, looks up and (de)serializes values. All
//! editing goes through `blockdeck-editor`.

pub mod block;
pub mod document;
pub mod error;
pub mod id_generator;
pub mod patch;

pub use block::{
    Align, Block, BlockContent, BlockKind, BlockStyle, CalloutTone, ChartKind, ChartSpec,
    DataPoint, Quotation, SpecRow, Stat, TextSize, DEFAULT_HEADING_LEVEL,
};
pub use document::{Background, Document, DocumentKind, Slide, Transition};
pub use error::{ModelError, ModelResult};
pub use id_generator::{get_document_id, IDGenerator};
pub use patch::ContentPatch;
