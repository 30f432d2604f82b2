//! # Post-Effect System
//!
//! Every document change may leave the view state pointing somewhere
//! stale. Post-effects run after each applied mutation and after each
//! undo/redo to bring it back in line:
//! - Adding or duplicating a slide → focus the new slide
//! - Reordering slides → follow the moved slide
//! - Adding a block → select it
//! - Any change → keep the current slide index in range, drop a selection
//!   whose block is gone
//!
//! Post-effects are:
//! - **Deterministic**: the same change always yields the same view
//! - **View-only**: they never touch the document or history

use crate::mutations::Mutation;
use blockdeck_model::Document;

/// Navigation and selection state that lives next to the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub current_slide_index: usize,
    pub selected_block_id: Option<String>,
}

/// What just happened to the document
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    /// A mutation was applied
    Applied(&'a Mutation),

    /// The document was swapped by undo/redo or replaced wholesale
    Restored,
}

/// Post-effect that can be triggered by a document change
pub trait PostEffect: std::fmt::Debug {
    fn apply(&self, change: Change<'_>, doc: &Document, view: &mut ViewState);
}

/// Move to a slide that was just inserted or duplicated
#[derive(Debug)]
pub struct FocusInsertedSlide;

impl PostEffect for FocusInsertedSlide {
    fn apply(&self, change: Change<'_>, doc: &Document, view: &mut ViewState) {
        let new_id = match change {
            Change::Applied(Mutation::InsertSlide { slide, .. }) => &slide.id,
            Change::Applied(Mutation::DuplicateSlide { new_slide_id, .. }) => new_slide_id,
            _ => return,
        };

        if let Some(index) = doc.slide_index(new_id) {
            view.current_slide_index = index;
        }
    }
}

/// Follow a slide to its new position
#[derive(Debug)]
pub struct FollowMovedSlide;

impl PostEffect for FollowMovedSlide {
    fn apply(&self, change: Change<'_>, _doc: &Document, view: &mut ViewState) {
        if let Change::Applied(Mutation::MoveSlide { to, .. }) = change {
            view.current_slide_index = *to;
        }
    }
}

/// Select a block that was just added
#[derive(Debug)]
pub struct SelectInsertedBlock;

impl PostEffect for SelectInsertedBlock {
    fn apply(&self, change: Change<'_>, _doc: &Document, view: &mut ViewState) {
        if let Change::Applied(Mutation::InsertBlock { block, .. }) = change {
            view.selected_block_id = Some(block.id.clone());
        }
    }
}

/// Keep the current slide index within `0..slides.len()`
#[derive(Debug)]
pub struct ClampSlideIndex;

impl PostEffect for ClampSlideIndex {
    fn apply(&self, _change: Change<'_>, doc: &Document, view: &mut ViewState) {
        let last = doc.slides.len().saturating_sub(1);
        view.current_slide_index = view.current_slide_index.min(last);
    }
}

/// Clear a selection whose block no longer exists
#[derive(Debug)]
pub struct ClearStaleSelection;

impl PostEffect for ClearStaleSelection {
    fn apply(&self, _change: Change<'_>, doc: &Document, view: &mut ViewState) {
        let stale = view
            .selected_block_id
            .as_deref()
            .is_some_and(|id| !doc.contains_block(id));

        if stale {
            view.selected_block_id = None;
        }
    }
}

/// Post-effect engine that runs all registered effects in order
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![
                Box::new(FocusInsertedSlide),
                Box::new(FollowMovedSlide),
                Box::new(SelectInsertedBlock),
                Box::new(ClampSlideIndex),
                Box::new(ClearStaleSelection),
            ],
        }
    }

    /// Run every effect against the changed document
    pub fn run(&self, change: Change<'_>, doc: &Document, view: &mut ViewState) {
        for effect in &self.effects {
            effect.apply(change, doc, view);
        }
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
