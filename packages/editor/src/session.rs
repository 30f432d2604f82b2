//! # Edit Session
//!
//! The stateful controller behind the presentation and case-study builders.
//!
//! An EditSession holds the current document, navigation and selection
//! state, the undo/redo history and the id generator. UI code calls the
//! operations below in response to input and re-renders from the
//! accessors.
//!
//! Operations are forgiving: an unknown id, an out-of-range index or an
//! attempt to delete the last slide leaves everything unchanged. The reason
//! is logged at `debug` level; [`EditSession::apply`] returns it to callers
//! that want it.

use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::export::{ExportAdapter, ExportError};
use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::post_effects::{Change, PostEffectEngine, ViewState};
use crate::undo_stack::UndoStack;
use blockdeck_model::{
    Background, Block, BlockContent, BlockKind, BlockStyle, ContentPatch, Document, DocumentKind,
    IDGenerator, ModelResult, Slide, Transition,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// What to put in a new block
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub content: BlockContent,
    pub style: Option<BlockStyle>,
}

impl NewBlock {
    pub fn new(content: BlockContent) -> Self {
        Self {
            content,
            style: None,
        }
    }

    /// A block of `kind` with its default content
    pub fn of_kind(kind: BlockKind) -> Self {
        Self::new(kind.default_content())
    }

    /// A block of `kind` whose default content is overridden by `patch`
    pub fn partial(kind: BlockKind, patch: &ContentPatch) -> ModelResult<Self> {
        Ok(Self::new(kind.default_content().patched(patch)?))
    }

    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = Some(style);
        self
    }
}

impl From<BlockContent> for NewBlock {
    fn from(content: BlockContent) -> Self {
        Self::new(content)
    }
}

impl From<BlockKind> for NewBlock {
    fn from(kind: BlockKind) -> Self {
        Self::of_kind(kind)
    }
}

/// Single-user edit session
#[derive(Debug)]
pub struct EditSession {
    document: Document,
    view: ViewState,
    history: UndoStack,
    ids: IDGenerator,
    effects: PostEffectEngine,
    config: EditorConfig,

    /// Increments on each applied mutation
    version: u64,
}

impl EditSession {
    /// Start a session on a fresh single-slide document
    pub fn new(name: impl Into<String>, kind: DocumentKind, config: EditorConfig) -> Self {
        let name = name.into();
        let mut ids = IDGenerator::new(&format!("{}:{}", name, current_timestamp()));
        let document = Document::new(&mut ids, name, kind);

        Self {
            document,
            view: ViewState::default(),
            history: UndoStack::with_capacity(config.history_capacity),
            ids,
            effects: PostEffectEngine::new(),
            config,
            version: 0,
        }
    }

    /// Start a session on an existing (e.g. persisted) document
    pub fn open(document: Document, config: EditorConfig) -> Result<Self, EditorError> {
        document.validate()?;

        let mut session = Self {
            ids: IDGenerator::from_seed(document.id.clone()),
            document,
            view: ViewState::default(),
            history: UndoStack::with_capacity(config.history_capacity),
            effects: PostEffectEngine::new(),
            config,
            version: 0,
        };
        session.observe_ids();
        Ok(session)
    }

    /// Replace the whole document (e.g. after loading from storage).
    ///
    /// History is cleared, the first slide becomes current and the
    /// selection is dropped.
    pub fn replace_document(&mut self, document: Document) -> Result<(), EditorError> {
        document.validate()?;

        self.ids = IDGenerator::from_seed(document.id.clone());
        self.document = document;
        self.observe_ids();
        self.history.clear();
        self.view = ViewState::default();
        self.version += 1;
        debug!(document = %self.document.id, "document replaced");
        Ok(())
    }

    fn observe_ids(&mut self) {
        for id in self.document.ids() {
            self.ids.observe(id);
        }
    }

    // ---------------------------------------------------------------------
    // Accessors

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A copy of the current document for an exporter or a save
    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }

    pub fn current_slide_index(&self) -> usize {
        self.view.current_slide_index
    }

    pub fn current_slide(&self) -> &Slide {
        &self.document.slides[self.view.current_slide_index]
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.view.selected_block_id.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        let id = self.view.selected_block_id.as_deref()?;
        self.document.find_block(id).map(|(_, block)| block)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn has_pending_edits(&self) -> bool {
        self.history.has_pending_edits()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Mutation pipeline

    /// Apply a mutation and report why it was rejected, if it was.
    ///
    /// History-worthy mutations record the pre-mutation document;
    /// transient ones edit the live document in place.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let recorded = if mutation.is_transient() {
            let before = self.document.clone();
            mutation.apply(&mut self.document)?;
            self.history.note_transient(&before);
            trace!(mutation = mutation.label(), "transient edit");
            false
        } else {
            mutation.validate(&self.document)?;
            if self.config.checkpoint_transient_edits {
                self.history.checkpoint(&self.document);
            }

            let mut next = self.document.clone();
            mutation.apply(&mut next)?;
            let previous = std::mem::replace(&mut self.document, next);
            let recorded = self.history.record(previous, mutation.label());
            debug!(mutation = mutation.label(), recorded, "applied");
            recorded
        };

        self.version += 1;
        self.effects
            .run(Change::Applied(&mutation), &self.document, &mut self.view);

        Ok(MutationResult {
            version: self.version,
            recorded,
        })
    }

    /// Apply a sequence of mutations as one undo step, all or nothing.
    ///
    /// On the first rejection everything (document, view, history) is
    /// restored and the error returned.
    pub fn apply_all(
        &mut self,
        mutations: impl IntoIterator<Item = Mutation>,
        label: impl Into<String>,
    ) -> Result<usize, EditorError> {
        let saved = (
            self.document.clone(),
            self.view.clone(),
            self.history.clone(),
            self.version,
        );

        self.history.begin_batch(label);
        let mut applied = 0;
        for mutation in mutations {
            if let Err(err) = self.apply(mutation) {
                debug!(%err, applied, "batch rolled back");
                (self.document, self.view, self.history, self.version) = saved;
                return Err(err.into());
            }
            applied += 1;
        }
        self.history.end_batch();

        Ok(applied)
    }

    /// Apply, logging and swallowing a rejection
    fn attempt(&mut self, mutation: Mutation) -> bool {
        let label = mutation.label();
        match self.apply(mutation) {
            Ok(_) => true,
            Err(err) => {
                debug!(mutation = label, %err, "ignored");
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Document and slide operations

    pub fn rename_document(&mut self, name: impl Into<String>) -> bool {
        self.attempt(Mutation::RenameDocument { name: name.into() })
    }

    /// Insert an empty slide after `after_index` (or at the end) and move
    /// to it. Returns the new slide id.
    pub fn add_slide(&mut self, after_index: Option<usize>) -> Option<String> {
        let len = self.document.slides.len();
        let index = after_index.map_or(len, |i| i.saturating_add(1).min(len));
        let slide = Slide::empty(self.ids.new_id());
        let id = slide.id.clone();

        self.attempt(Mutation::InsertSlide { index, slide })
            .then_some(id)
    }

    /// Delete a slide unless it is the last one
    pub fn delete_slide(&mut self, slide_id: &str) -> bool {
        self.attempt(Mutation::RemoveSlide {
            slide_id: slide_id.to_string(),
        })
    }

    /// Copy a slide (fresh ids throughout) right after the original and
    /// move to the copy. Returns the copy's id.
    pub fn duplicate_slide(&mut self, slide_id: &str) -> Option<String> {
        let Some(block_count) = self.document.slide(slide_id).map(|s| s.blocks.len()) else {
            debug!(slide_id, "duplicate of unknown slide ignored");
            return None;
        };

        let new_slide_id = self.ids.new_id();
        let new_block_ids = self.ids.new_ids(block_count);

        self.attempt(Mutation::DuplicateSlide {
            slide_id: slide_id.to_string(),
            new_slide_id: new_slide_id.clone(),
            new_block_ids,
        })
        .then_some(new_slide_id)
    }

    pub fn reorder_slides(&mut self, from: usize, to: usize) -> bool {
        self.attempt(Mutation::MoveSlide { from, to })
    }

    pub fn update_slide_background(&mut self, slide_id: &str, background: Background) -> bool {
        self.attempt(Mutation::SetSlideBackground {
            slide_id: slide_id.to_string(),
            background,
        })
    }

    pub fn update_slide_transition(
        &mut self,
        slide_id: &str,
        transition: Option<Transition>,
    ) -> bool {
        self.attempt(Mutation::SetSlideTransition {
            slide_id: slide_id.to_string(),
            transition,
        })
    }

    /// Transient: edit speaker notes. Empty notes clear the field.
    pub fn update_slide_notes(&mut self, slide_id: &str, notes: impl Into<String>) -> bool {
        self.attempt(Mutation::SetSlideNotes {
            slide_id: slide_id.to_string(),
            notes: Some(notes.into()),
        })
    }

    // ---------------------------------------------------------------------
    // Block operations

    /// Select a block, or clear the selection with `None`
    pub fn select_block(&mut self, block_id: Option<&str>) {
        self.view.selected_block_id = block_id.map(str::to_string);
    }

    /// Add a block after `after_block_id` (or at the end) and select it.
    /// Returns the new block id.
    pub fn add_block(
        &mut self,
        slide_id: &str,
        block: impl Into<NewBlock>,
        after_block_id: Option<&str>,
    ) -> Option<String> {
        let NewBlock { content, style } = block.into();
        let mut block = Block::new(self.ids.new_id(), content);
        block.style = style;
        let id = block.id.clone();

        self.attempt(Mutation::InsertBlock {
            slide_id: slide_id.to_string(),
            after_block_id: after_block_id.map(str::to_string),
            block,
        })
        .then_some(id)
    }

    /// Transient: merge a content patch (and optionally a style patch)
    /// into a block
    pub fn update_block(
        &mut self,
        slide_id: &str,
        block_id: &str,
        content: ContentPatch,
        style: Option<BlockStyle>,
    ) -> bool {
        self.attempt(Mutation::UpdateBlock {
            slide_id: slide_id.to_string(),
            block_id: block_id.to_string(),
            content,
            style,
        })
    }

    pub fn delete_block(&mut self, slide_id: &str, block_id: &str) -> bool {
        self.attempt(Mutation::RemoveBlock {
            slide_id: slide_id.to_string(),
            block_id: block_id.to_string(),
        })
    }

    /// Copy a block right after the original. Returns the copy's id.
    pub fn duplicate_block(&mut self, slide_id: &str, block_id: &str) -> Option<String> {
        let new_block_id = self.ids.new_id();

        self.attempt(Mutation::DuplicateBlock {
            slide_id: slide_id.to_string(),
            block_id: block_id.to_string(),
            new_block_id: new_block_id.clone(),
        })
        .then_some(new_block_id)
    }

    pub fn reorder_blocks(&mut self, slide_id: &str, from: usize, to: usize) -> bool {
        self.attempt(Mutation::MoveBlock {
            slide_id: slide_id.to_string(),
            from,
            to,
        })
    }

    // ---------------------------------------------------------------------
    // History

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.document);
        if undone {
            self.restored();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.document);
        if redone {
            self.restored();
        }
        redone
    }

    /// Record pending transient edits as their own undo step
    pub fn commit_pending_edits(&mut self) -> bool {
        self.history.checkpoint(&self.document)
    }

    /// Group the following history-worthy operations into one undo step
    pub fn begin_batch(&mut self, label: impl Into<String>) {
        self.history.begin_batch(label);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn restored(&mut self) {
        self.version += 1;
        self.effects
            .run(Change::Restored, &self.document, &mut self.view);
    }

    // ---------------------------------------------------------------------
    // Navigation

    /// Move to a slide; the index is clamped into range. A selection on
    /// another slide is dropped.
    pub fn set_current_slide(&mut self, index: usize) {
        let last = self.document.slides.len() - 1;
        self.view.current_slide_index = index.min(last);

        let off_slide = self
            .view
            .selected_block_id
            .as_deref()
            .is_some_and(|id| !self.current_slide().contains_block(id));
        if off_slide {
            self.view.selected_block_id = None;
        }
    }

    pub fn next_slide(&mut self) {
        self.set_current_slide(self.view.current_slide_index.saturating_add(1));
    }

    pub fn previous_slide(&mut self) {
        self.set_current_slide(self.view.current_slide_index.saturating_sub(1));
    }

    // ---------------------------------------------------------------------
    // Export

    /// Hand a snapshot of the current document to an export adapter
    pub fn export_with<A: ExportAdapter>(&self, adapter: &A) -> Result<A::Output, ExportError> {
        let snapshot = self.snapshot();
        debug!(adapter = adapter.name(), "export");
        adapter.export(&snapshot)
    }
}

fn current_timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}
