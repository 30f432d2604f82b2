//! # Undo/Redo Stack
//!
//! Bounded, linear history of whole-document snapshots.
//!
//! ## Design
//!
//! - Before a history-worthy mutation is committed, the pre-mutation
//!   document is pushed as an entry
//! - Entries `[..undo_len]` are past states, entries `[undo_len..]` are
//!   undone states waiting for redo
//! - Undo swaps the live document with the newest past entry; redo swaps it
//!   back. The swapped-out live document becomes the redo (or undo) target,
//!   so `undo(); redo();` always returns to the exact prior value
//! - A new entry discards the redo branch
//! - When over capacity the oldest entry is evicted
//! - Batches group several mutations into a single entry
//! - Transient edits are not entries; the stack remembers the state before
//!   the first one so they can be checkpointed on demand
//!
//! Snapshots are cheap because documents share unchanged slides.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let previous = std::mem::replace(&mut doc, next);
//! stack.record(previous, "Add slide");
//!
//! stack.undo(&mut doc);
//! stack.redo(&mut doc);
//! ```

use blockdeck_model::Document;
use tracing::debug;

/// Default number of undo levels
pub const DEFAULT_CAPACITY: usize = 50;

const PENDING_EDITS_LABEL: &str = "Edit content";

/// One history slot
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The document on the far side of the step this entry undoes/redoes
    pub document: Document,

    /// Description of the step
    pub label: String,
}

#[derive(Debug, Clone)]
struct Batch {
    label: String,
    recorded: bool,
}

/// Undo/redo stack for document editing
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: Vec<HistoryEntry>,

    /// Number of entries undo can step back through
    undo_len: usize,

    /// Maximum number of entries (0 = unlimited)
    capacity: usize,

    /// State before the current run of transient edits
    pending: Option<Document>,

    /// Currently building a batch
    batch: Option<Batch>,
}

impl UndoStack {
    /// Create a new undo stack with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an undo stack with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            undo_len: 0,
            capacity,
            pending: None,
            batch: None,
        }
    }

    /// Record the pre-mutation document of a history-worthy change.
    ///
    /// Returns whether a new entry was pushed (inside a batch only the
    /// first change pushes).
    pub fn record(&mut self, previous: Document, label: impl Into<String>) -> bool {
        // The snapshot already contains any transient edits.
        self.pending = None;

        let mut label = label.into();
        if let Some(batch) = &mut self.batch {
            if batch.recorded {
                return false;
            }
            batch.recorded = true;
            label = batch.label.clone();
        }

        // New action invalidates the redo branch
        self.entries.truncate(self.undo_len);
        self.entries.push(HistoryEntry {
            document: previous,
            label,
        });

        // Trim if exceeded capacity
        if self.capacity > 0 && self.entries.len() > self.capacity {
            self.entries.remove(0);
        }

        self.undo_len = self.entries.len();
        true
    }

    /// Remember `before` as the base of a transient edit run, unless a run
    /// is already in progress
    pub fn note_transient(&mut self, before: &Document) {
        if self.pending.is_none() {
            self.pending = Some(before.clone());
        }
    }

    /// Whether transient edits were made since the last checkpoint
    pub fn has_pending_edits(&self) -> bool {
        self.pending.is_some()
    }

    /// Turn the pending transient edit run into a history entry.
    ///
    /// `current` is the live document; nothing is recorded if the edits
    /// cancelled out.
    pub fn checkpoint(&mut self, current: &Document) -> bool {
        match self.pending.take() {
            Some(base) if &base != current => self.record(base, PENDING_EDITS_LABEL),
            _ => false,
        }
    }

    /// Start a batch; every change until [`end_batch`](Self::end_batch)
    /// becomes one entry
    pub fn begin_batch(&mut self, label: impl Into<String>) {
        self.batch = Some(Batch {
            label: label.into(),
            recorded: false,
        });
    }

    /// End the current batch
    pub fn end_batch(&mut self) {
        self.batch = None;
    }

    pub fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    /// Undo the most recent entry, swapping it with `current`
    pub fn undo(&mut self, current: &mut Document) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.interrupt();

        self.undo_len -= 1;
        std::mem::swap(current, &mut self.entries[self.undo_len].document);
        debug!(
            label = %self.entries[self.undo_len].label,
            remaining = self.undo_len,
            "undo"
        );
        true
    }

    /// Redo the most recently undone entry, swapping it with `current`
    pub fn redo(&mut self, current: &mut Document) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.interrupt();

        std::mem::swap(current, &mut self.entries[self.undo_len].document);
        debug!(label = %self.entries[self.undo_len].label, "redo");
        self.undo_len += 1;
        true
    }

    /// Undo/redo end any batch and forget the transient base: the live
    /// document (with its edits) is kept in the swapped entry instead.
    fn interrupt(&mut self) {
        if self.batch.take().is_some() {
            debug!("batch interrupted by undo/redo");
        }
        self.pending = None;
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_len > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.undo_len < self.entries.len()
    }

    /// Index of the entry undo would restore (`None` when nothing to undo)
    pub fn index(&self) -> Option<usize> {
        self.undo_len.checked_sub(1)
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_len
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.entries.len() - self.undo_len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.undo_len = 0;
        self.pending = None;
        self.batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_label(&self) -> Option<&str> {
        self.index().map(|i| self.entries[i].label.as_str())
    }

    /// Get description of the next redo operation
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.undo_len)
            .map(|entry| entry.label.as_str())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdeck_model::{DocumentKind, IDGenerator};

    fn named(name: &str) -> Document {
        let mut ids = IDGenerator::from_seed("u");
        Document::new(&mut ids, name, DocumentKind::Presentation)
    }

    /// Commit `next` the way the session does
    fn commit(stack: &mut UndoStack, doc: &mut Document, next: &str) {
        let previous = std::mem::replace(doc, named(next));
        stack.record(previous, format!("to {}", next));
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.capacity(), DEFAULT_CAPACITY);
        assert_eq!(stack.index(), None);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut stack = UndoStack::new();
        let mut doc = named("v0");

        commit(&mut stack, &mut doc, "v1");
        commit(&mut stack, &mut doc, "v2");
        assert_eq!(stack.undo_label(), Some("to v2"));

        assert!(stack.undo(&mut doc));
        assert_eq!(doc.name, "v1");
        assert_eq!(stack.redo_label(), Some("to v2"));

        assert!(stack.undo(&mut doc));
        assert_eq!(doc.name, "v0");
        assert!(!stack.undo(&mut doc));

        assert!(stack.redo(&mut doc));
        assert_eq!(doc.name, "v1");
        assert!(stack.redo(&mut doc));
        assert_eq!(doc.name, "v2");
        assert!(!stack.redo(&mut doc));
    }

    #[test]
    fn test_new_entry_clears_redo() {
        let mut stack = UndoStack::new();
        let mut doc = named("v0");

        commit(&mut stack, &mut doc, "v1");
        commit(&mut stack, &mut doc, "v2");
        stack.undo(&mut doc);
        assert_eq!(stack.redo_levels(), 1);

        commit(&mut stack, &mut doc, "v3");
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_redo());
        assert_eq!(stack.len(), 2);

        stack.undo(&mut doc);
        assert_eq!(doc.name, "v1");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stack = UndoStack::with_capacity(2);
        let mut doc = named("v0");

        for i in 1..=3 {
            commit(&mut stack, &mut doc, &format!("v{}", i));
        }

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.index(), Some(1));
        let names: Vec<&str> = stack.entries().iter().map(|e| e.document.name.as_str()).collect();
        assert_eq!(names, vec!["v1", "v2"]);
    }

    #[test]
    fn test_batch_records_once() {
        let mut stack = UndoStack::new();
        let mut doc = named("v0");

        stack.begin_batch("Apply theme");
        commit(&mut stack, &mut doc, "v1");
        commit(&mut stack, &mut doc, "v2");
        commit(&mut stack, &mut doc, "v3");
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_label(), Some("Apply theme"));

        stack.undo(&mut doc);
        assert_eq!(doc.name, "v0");
        stack.redo(&mut doc);
        assert_eq!(doc.name, "v3");
    }

    #[test]
    fn test_checkpoint_pending_edits() {
        let mut stack = UndoStack::new();
        let mut doc = named("v0");

        stack.note_transient(&doc);
        doc.name = "typing".to_string();
        stack.note_transient(&doc);
        doc.name = "typed".to_string();
        assert!(stack.has_pending_edits());

        assert!(stack.checkpoint(&doc));
        assert!(!stack.has_pending_edits());
        assert_eq!(stack.undo_label(), Some(PENDING_EDITS_LABEL));

        stack.undo(&mut doc);
        assert_eq!(doc.name, "v0");
    }

    #[test]
    fn test_checkpoint_skips_cancelled_edits() {
        let mut stack = UndoStack::new();
        let doc = named("v0");

        stack.note_transient(&doc);
        assert!(!stack.checkpoint(&doc));
        assert!(stack.is_empty());
    }
}
