//! # Blockdeck Editor
//!
//! Editing engine for block documents (presentations and case studies).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Document → Slide → Block             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Apply mutations atomically               │
//! │  - Bounded undo/redo of document snapshots  │
//! │  - Navigation and selection                 │
//! │  - Post-effects keep the view consistent    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ export: snapshot → JSON, outline, …         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is the source of truth**: view state is derived and
//!    repaired after every change
//! 2. **Every slide and block has a unique id**: ids are minted by the
//!    session and never reused within a document
//! 3. **A document is never empty**: the last slide cannot be deleted
//! 4. **Forgiving operations**: invalid references are ignored, not fatal
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockdeck_editor::{EditSession, EditorConfig};
//! use blockdeck_model::{BlockKind, ContentPatch, DocumentKind};
//!
//! let mut session = EditSession::new("Launch", DocumentKind::Presentation, EditorConfig::default());
//! let slide = session.current_slide().id.clone();
//!
//! let heading = session.add_block(&slide, BlockKind::Heading, None).unwrap();
//! session.update_block(&slide, &heading, ContentPatch::new().set("text", "Q3 results"), None);
//!
//! session.undo();
//! session.redo();
//! ```

mod config;
mod errors;
mod export;
mod mutations;
mod post_effects;
mod session;
mod undo_stack;

pub use config::EditorConfig;
pub use errors::EditorError;
pub use export::{ExportAdapter, ExportError, JsonExporter, OutlineExporter};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use post_effects::{Change, PostEffect, PostEffectEngine, ViewState};
pub use session::{EditSession, NewBlock};
pub use undo_stack::{HistoryEntry, UndoStack, DEFAULT_CAPACITY};
