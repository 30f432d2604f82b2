//! # Document Mutations
//!
//! Semantic operations on a block document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one editor operation
//! 2. **Deterministic**: fresh ids are minted by the caller and carried in
//!    the mutation, so replaying a mutation log reproduces the same document
//! 3. **Atomic**: a mutation either applies completely or leaves the
//!    document untouched
//!
//! ## Mutation Semantics
//!
//! ### History-worthy vs transient
//! - `SetSlideNotes` and `UpdateBlock` are transient: they run per
//!   keystroke and never create an undo checkpoint
//! - Everything else is recorded in history, even when it sets a value to
//!   what it already was (the undo step is then a no-op)
//! - A transient edit that changes nothing fails with `Unchanged`
//!
//! ### Slides
//! - A document always keeps at least one slide; removing the last one fails
//! - Inserted slide ids must be unused
//!
//! ### Blocks
//! - `InsertBlock` places the block after `after_block_id`, or at the end
//!   when that id is absent or unknown
//! - A block kind must be available in the document's kind
//! - Content patches are shallow merges that cannot change the block kind

use blockdeck_model::{
    Background, Block, BlockKind, BlockStyle, ContentPatch, Document, DocumentKind, Slide,
    Transition,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace the document name
    RenameDocument { name: String },

    /// Insert a fully built slide at `index`
    InsertSlide { index: usize, slide: Slide },

    /// Remove a slide (never the last one)
    RemoveSlide { slide_id: String },

    /// Deep-copy a slide right after itself.
    /// `new_block_ids` renames the copied blocks in order.
    DuplicateSlide {
        slide_id: String,
        new_slide_id: String,
        new_block_ids: Vec<String>,
    },

    /// Move the slide at `from` to `to`
    MoveSlide { from: usize, to: usize },

    SetSlideBackground {
        slide_id: String,
        background: Background,
    },

    SetSlideTransition {
        slide_id: String,
        transition: Option<Transition>,
    },

    /// Transient
    SetSlideNotes {
        slide_id: String,
        notes: Option<String>,
    },

    /// Insert a block after `after_block_id` (or at the end)
    InsertBlock {
        slide_id: String,
        after_block_id: Option<String>,
        block: Block,
    },

    /// Transient: merge a content patch and optional style patch
    UpdateBlock {
        slide_id: String,
        block_id: String,
        content: ContentPatch,
        style: Option<BlockStyle>,
    },

    RemoveBlock { slide_id: String, block_id: String },

    /// Copy a block (same content and style) right after itself
    DuplicateBlock {
        slide_id: String,
        block_id: String,
        new_block_id: String,
    },

    /// Move the block at `from` to `to` within one slide
    MoveBlock {
        slide_id: String,
        from: usize,
        to: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Slide not found: {0}")]
    SlideNotFound(String),

    #[error("Block {block_id} not found in slide {slide_id}")]
    BlockNotFound { slide_id: String, block_id: String },

    #[error("Cannot remove the only slide")]
    LastSlide,

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Only transient edits report this; history-worthy mutations that
    /// change nothing still apply
    #[error("Edit would not change the document")]
    Unchanged,

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("{kind} blocks are not available in {document} documents")]
    KindUnavailable {
        kind: BlockKind,
        document: DocumentKind,
    },

    #[error("Content patch rejected: {0}")]
    ContentMismatch(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Mutation {
    /// Transient mutations bypass history
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Mutation::SetSlideNotes { .. } | Mutation::UpdateBlock { .. }
        )
    }

    /// Human-readable label, used for undo/redo menu entries
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::RenameDocument { .. } => "Rename document",
            Mutation::InsertSlide { .. } => "Add slide",
            Mutation::RemoveSlide { .. } => "Delete slide",
            Mutation::DuplicateSlide { .. } => "Duplicate slide",
            Mutation::MoveSlide { .. } => "Reorder slides",
            Mutation::SetSlideBackground { .. } => "Change background",
            Mutation::SetSlideTransition { .. } => "Change transition",
            Mutation::SetSlideNotes { .. } => "Edit notes",
            Mutation::InsertBlock { .. } => "Add block",
            Mutation::UpdateBlock { .. } => "Edit block",
            Mutation::RemoveBlock { .. } => "Delete block",
            Mutation::DuplicateBlock { .. } => "Duplicate block",
            Mutation::MoveBlock { .. } => "Reorder blocks",
        }
    }

    /// Apply mutation to the document.
    ///
    /// Every check runs before the first write, so on error `doc` is
    /// unchanged.
    pub fn apply(&self, doc: &mut Document) -> Result<(), MutationError> {
        match self {
            Mutation::RenameDocument { name } => Self::apply_rename(doc, name),

            Mutation::InsertSlide { index, slide } => {
                Self::apply_insert_slide(doc, *index, slide)
            }

            Mutation::RemoveSlide { slide_id } => Self::apply_remove_slide(doc, slide_id),

            Mutation::DuplicateSlide {
                slide_id,
                new_slide_id,
                new_block_ids,
            } => Self::apply_duplicate_slide(doc, slide_id, new_slide_id, new_block_ids),

            Mutation::MoveSlide { from, to } => move_item(&mut doc.slides, *from, *to),

            Mutation::SetSlideBackground {
                slide_id,
                background,
            } => Self::apply_slide_field(doc, slide_id, |slide| {
                replace_field(&mut slide.background, background.clone())
            })
            .map(|_| ()),

            Mutation::SetSlideTransition {
                slide_id,
                transition,
            } => Self::apply_slide_field(doc, slide_id, |slide| {
                replace_field(&mut slide.transition, *transition)
            })
            .map(|_| ()),

            Mutation::SetSlideNotes { slide_id, notes } => {
                let notes = notes.clone().filter(|n| !n.is_empty());
                let changed = Self::apply_slide_field(doc, slide_id, |slide| {
                    replace_field(&mut slide.notes, notes)
                })?;
                if changed {
                    Ok(())
                } else {
                    Err(MutationError::Unchanged)
                }
            }

            Mutation::InsertBlock {
                slide_id,
                after_block_id,
                block,
            } => Self::apply_insert_block(doc, slide_id, after_block_id.as_deref(), block),

            Mutation::UpdateBlock {
                slide_id,
                block_id,
                content,
                style,
            } => Self::apply_update_block(doc, slide_id, block_id, content, style.as_ref()),

            Mutation::RemoveBlock { slide_id, block_id } => {
                let index = Self::block_index(doc, slide_id, block_id)?;
                let slide = Self::slide_mut(doc, slide_id)?;
                slide.blocks.remove(index);
                Ok(())
            }

            Mutation::DuplicateBlock {
                slide_id,
                block_id,
                new_block_id,
            } => Self::apply_duplicate_block(doc, slide_id, block_id, new_block_id),

            Mutation::MoveBlock { slide_id, from, to } => {
                check_move(*from, *to, Self::slide(doc, slide_id)?.blocks.len())?;
                if from == to {
                    return Ok(());
                }
                let slide = Self::slide_mut(doc, slide_id)?;
                move_item(&mut slide.blocks, *from, *to)
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        // Slides are shared copy-on-write, so a scratch copy only clones
        // the slide the mutation touches.
        let mut scratch = doc.clone();
        self.apply(&mut scratch)
    }

    fn apply_rename(doc: &mut Document, name: &str) -> Result<(), MutationError> {
        if doc.name != name {
            doc.name = name.to_string();
        }
        Ok(())
    }

    fn apply_insert_slide(
        doc: &mut Document,
        index: usize,
        slide: &Slide,
    ) -> Result<(), MutationError> {
        if index > doc.slides.len() {
            return Err(MutationError::IndexOutOfRange {
                index,
                len: doc.slides.len(),
            });
        }
        if doc.slide_index(&slide.id).is_some() {
            return Err(MutationError::DuplicateId(slide.id.clone()));
        }
        check_unique_blocks(slide)?;

        for block in &slide.blocks {
            check_kind(doc, block.kind())?;
            check_content(block)?;
        }

        doc.slides.insert(index, Arc::new(slide.clone()));
        Ok(())
    }

    fn apply_remove_slide(doc: &mut Document, slide_id: &str) -> Result<(), MutationError> {
        let index = doc
            .slide_index(slide_id)
            .ok_or_else(|| MutationError::SlideNotFound(slide_id.to_string()))?;

        if doc.slides.len() == 1 {
            return Err(MutationError::LastSlide);
        }

        doc.slides.remove(index);
        Ok(())
    }

    fn apply_duplicate_slide(
        doc: &mut Document,
        slide_id: &str,
        new_slide_id: &str,
        new_block_ids: &[String],
    ) -> Result<(), MutationError> {
        let index = doc
            .slide_index(slide_id)
            .ok_or_else(|| MutationError::SlideNotFound(slide_id.to_string()))?;

        if doc.slide_index(new_slide_id).is_some() {
            return Err(MutationError::DuplicateId(new_slide_id.to_string()));
        }

        let copy = doc.slides[index]
            .duplicate(new_slide_id, new_block_ids)
            .ok_or_else(|| {
                MutationError::InvalidStructure(format!(
                    "expected {} block ids, got {}",
                    doc.slides[index].blocks.len(),
                    new_block_ids.len()
                ))
            })?;
        check_unique_blocks(&copy)?;

        doc.slides.insert(index + 1, Arc::new(copy));
        Ok(())
    }

    /// Returns whether the field changed. An unchanged field leaves the
    /// slide shared with history snapshots.
    fn apply_slide_field(
        doc: &mut Document,
        slide_id: &str,
        update: impl FnOnce(&mut Slide) -> bool,
    ) -> Result<bool, MutationError> {
        let mut slide = Self::slide(doc, slide_id)?.clone();
        if !update(&mut slide) {
            return Ok(false);
        }
        *Self::slide_mut(doc, slide_id)? = slide;
        Ok(true)
    }

    fn apply_insert_block(
        doc: &mut Document,
        slide_id: &str,
        after_block_id: Option<&str>,
        block: &Block,
    ) -> Result<(), MutationError> {
        check_kind(doc, block.kind())?;
        check_content(block)?;

        let slide = Self::slide(doc, slide_id)?;
        if slide.contains_block(&block.id) {
            return Err(MutationError::DuplicateId(block.id.clone()));
        }

        let index = after_block_id
            .and_then(|id| slide.block_index(id))
            .map(|i| i + 1)
            .unwrap_or(slide.blocks.len());

        Self::slide_mut(doc, slide_id)?
            .blocks
            .insert(index, block.clone());
        Ok(())
    }

    fn apply_update_block(
        doc: &mut Document,
        slide_id: &str,
        block_id: &str,
        patch: &ContentPatch,
        style: Option<&BlockStyle>,
    ) -> Result<(), MutationError> {
        let index = Self::block_index(doc, slide_id, block_id)?;
        let mut block = Self::slide(doc, slide_id)?.blocks[index].clone();

        if !patch.is_empty() {
            block.content = block
                .content
                .patched(patch)
                .map_err(|e| MutationError::ContentMismatch(e.to_string()))?;
        }
        if let Some(style) = style {
            block.merge_style(style);
        }

        let slide = Self::slide(doc, slide_id)?;
        if slide.blocks[index] == block {
            return Err(MutationError::Unchanged);
        }

        Self::slide_mut(doc, slide_id)?.blocks[index] = block;
        Ok(())
    }

    fn apply_duplicate_block(
        doc: &mut Document,
        slide_id: &str,
        block_id: &str,
        new_block_id: &str,
    ) -> Result<(), MutationError> {
        let index = Self::block_index(doc, slide_id, block_id)?;
        let slide = Self::slide(doc, slide_id)?;
        if slide.contains_block(new_block_id) {
            return Err(MutationError::DuplicateId(new_block_id.to_string()));
        }

        let copy = slide.blocks[index].duplicate(new_block_id);
        Self::slide_mut(doc, slide_id)?
            .blocks
            .insert(index + 1, copy);
        Ok(())
    }

    fn slide<'a>(doc: &'a Document, slide_id: &str) -> Result<&'a Slide, MutationError> {
        doc.slide(slide_id)
            .ok_or_else(|| MutationError::SlideNotFound(slide_id.to_string()))
    }

    fn slide_mut<'a>(doc: &'a mut Document, slide_id: &str) -> Result<&'a mut Slide, MutationError> {
        doc.slide_mut(slide_id)
            .ok_or_else(|| MutationError::SlideNotFound(slide_id.to_string()))
    }

    fn block_index(doc: &Document, slide_id: &str, block_id: &str) -> Result<usize, MutationError> {
        Self::slide(doc, slide_id)?
            .block_index(block_id)
            .ok_or_else(|| MutationError::BlockNotFound {
                slide_id: slide_id.to_string(),
                block_id: block_id.to_string(),
            })
    }
}

fn check_move(from: usize, to: usize, len: usize) -> Result<(), MutationError> {
    for index in [from, to] {
        if index >= len {
            return Err(MutationError::IndexOutOfRange { index, len });
        }
    }
    Ok(())
}

/// Move `items[from]` to position `to`, shifting everything in between
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), MutationError> {
    check_move(from, to, items.len())?;

    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

fn replace_field<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

fn check_kind(doc: &Document, kind: BlockKind) -> Result<(), MutationError> {
    if kind.is_available_in(doc.kind) {
        Ok(())
    } else {
        Err(MutationError::KindUnavailable {
            kind,
            document: doc.kind,
        })
    }
}

fn check_content(block: &Block) -> Result<(), MutationError> {
    block
        .content
        .validate()
        .map_err(|e| MutationError::ContentMismatch(e.to_string()))
}

fn check_unique_blocks(slide: &Slide) -> Result<(), MutationError> {
    for (i, block) in slide.blocks.iter().enumerate() {
        if slide.blocks[..i].iter().any(|b| b.id == block.id) {
            return Err(MutationError::DuplicateId(block.id.clone()));
        }
    }
    Ok(())
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Whether a history checkpoint was created
    pub recorded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdeck_model::{BlockContent, DataPoint, IDGenerator};

    fn doc_with_slides(n: usize) -> Document {
        let mut ids = IDGenerator::from_seed("t");
        let mut doc = Document::new(&mut ids, "Test", DocumentKind::Presentation);
        for _ in 1..n {
            doc.slides.push(Arc::new(Slide::empty(ids.new_id())));
        }
        doc
    }

    fn slide_ids(doc: &Document) -> Vec<&str> {
        doc.slides.iter().map(|s| s.id.as_str()).collect()
    }

    fn paragraph(id: &str) -> Block {
        Block::new(
            id,
            BlockContent::Paragraph {
                text: id.to_string(),
            },
        )
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateBlock {
            slide_id: "s-1".to_string(),
            block_id: "b-1".to_string(),
            content: ContentPatch::new().set("text", "Hello World"),
            style: None,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_transient_classification() {
        let notes = Mutation::SetSlideNotes {
            slide_id: "s".to_string(),
            notes: None,
        };
        let remove = Mutation::RemoveSlide {
            slide_id: "s".to_string(),
        };
        assert!(notes.is_transient());
        assert!(!remove.is_transient());
    }

    #[test]
    fn test_move_slide_shifts_intervening() {
        let mut doc = doc_with_slides(4);
        let before = slide_ids(&doc).iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Mutation::MoveSlide { from: 0, to: 2 }.apply(&mut doc).unwrap();

        assert_eq!(
            slide_ids(&doc),
            vec![
                before[1].as_str(),
                before[2].as_str(),
                before[0].as_str(),
                before[3].as_str()
            ]
        );
    }

    #[test]
    fn test_move_out_of_range_is_rejected() {
        let mut doc = doc_with_slides(2);
        let before = doc.clone();
        assert_eq!(
            Mutation::MoveSlide { from: 0, to: 5 }.apply(&mut doc),
            Err(MutationError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_last_slide_is_rejected() {
        let mut doc = doc_with_slides(1);
        let before = doc.clone();
        let slide_id = doc.slides[0].id.clone();

        assert_eq!(
            Mutation::RemoveSlide { slide_id }.apply(&mut doc),
            Err(MutationError::LastSlide)
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_insert_block_after_and_at_end() {
        let mut doc = doc_with_slides(1);
        let slide_id = doc.slides[0].id.clone();

        for (id, after) in [("a", None), ("c", Some("a")), ("b", Some("a")), ("d", Some("gone"))] {
            Mutation::InsertBlock {
                slide_id: slide_id.clone(),
                after_block_id: after.map(str::to_string),
                block: paragraph(id),
            }
            .apply(&mut doc)
            .unwrap();
        }

        let order: Vec<&str> = doc.slides[0].blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_insert_unavailable_kind_is_rejected() {
        let mut doc = doc_with_slides(1);
        let slide_id = doc.slides[0].id.clone();

        let result = Mutation::InsertBlock {
            slide_id,
            after_block_id: None,
            block: Block::new("x", BlockKind::IdentityCard.default_content()),
        }
        .apply(&mut doc);

        assert_eq!(
            result,
            Err(MutationError::KindUnavailable {
                kind: BlockKind::IdentityCard,
                document: DocumentKind::Presentation
            })
        );
    }

    #[test]
    fn test_insert_non_finite_chart_value_is_rejected() {
        let mut doc = doc_with_slides(1);
        let slide_id = doc.slides[0].id.clone();
        let before = doc.clone();

        let mut block = Block::new("c", BlockKind::Chart.default_content());
        if let BlockContent::Chart { chart } = &mut block.content {
            chart.series.push(DataPoint::new("Q4", f64::NAN));
        }

        let result = Mutation::InsertBlock {
            slide_id,
            after_block_id: None,
            block: block.clone(),
        }
        .apply(&mut doc);
        assert!(matches!(result, Err(MutationError::ContentMismatch(_))));

        let slide = Slide::empty("s-new").with_blocks(vec![block]);
        let result = Mutation::InsertSlide { index: 0, slide }.apply(&mut doc);
        assert!(matches!(result, Err(MutationError::ContentMismatch(_))));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_update_block_rejects_bad_patch_without_touching_doc() {
        let mut doc = doc_with_slides(1);
        let slide_id = doc.slides[0].id.clone();
        Mutation::InsertBlock {
            slide_id: slide_id.clone(),
            after_block_id: None,
            block: paragraph("p"),
        }
        .apply(&mut doc)
        .unwrap();
        let before = doc.clone();

        let result = Mutation::UpdateBlock {
            slide_id,
            block_id: "p".to_string(),
            content: ContentPatch::new().set("text", 42),
            style: None,
        }
        .apply(&mut doc);

        assert!(matches!(result, Err(MutationError::ContentMismatch(_))));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_unchanged_background_does_not_unshare_slide() {
        let doc = doc_with_slides(1);
        let mut copy = doc.clone();
        let slide_id = doc.slides[0].id.clone();

        let result = Mutation::SetSlideBackground {
            slide_id,
            background: Background::default(),
        }
        .apply(&mut copy);

        assert_eq!(result, Ok(()));
        assert!(Arc::ptr_eq(&doc.slides[0], &copy.slides[0]));
    }

    #[test]
    fn test_same_value_edits_apply_as_no_ops() {
        let mut doc = doc_with_slides(2);
        let slide_id = doc.slides[0].id.clone();
        Mutation::InsertBlock {
            slide_id: slide_id.clone(),
            after_block_id: None,
            block: paragraph("p"),
        }
        .apply(&mut doc)
        .unwrap();
        let before = doc.clone();

        let mutations = [
            Mutation::RenameDocument {
                name: "Test".to_string(),
            },
            Mutation::MoveSlide { from: 1, to: 1 },
            Mutation::MoveBlock {
                slide_id: slide_id.clone(),
                from: 0,
                to: 0,
            },
            Mutation::SetSlideTransition {
                slide_id: slide_id.clone(),
                transition: None,
            },
        ];
        for mutation in mutations {
            assert_eq!(mutation.apply(&mut doc), Ok(()));
        }

        assert_eq!(doc, before);
        assert!(Arc::ptr_eq(&doc.slides[0], &before.slides[0]));
    }

    #[test]
    fn test_same_value_transient_edits_are_unchanged() {
        let mut doc = doc_with_slides(1);
        let slide_id = doc.slides[0].id.clone();
        Mutation::InsertBlock {
            slide_id: slide_id.clone(),
            after_block_id: None,
            block: paragraph("p"),
        }
        .apply(&mut doc)
        .unwrap();

        let notes = Mutation::SetSlideNotes {
            slide_id: slide_id.clone(),
            notes: Some(String::new()),
        };
        let update = Mutation::UpdateBlock {
            slide_id,
            block_id: "p".to_string(),
            content: ContentPatch::new().set("text", "p"),
            style: None,
        };

        assert_eq!(notes.apply(&mut doc), Err(MutationError::Unchanged));
        assert_eq!(update.apply(&mut doc), Err(MutationError::Unchanged));
    }

    #[test]
    fn test_validate_leaves_document_untouched() {
        let doc = doc_with_slides(2);
        let mutation = Mutation::MoveSlide { from: 1, to: 0 };
        assert!(mutation.validate(&doc).is_ok());
        assert_eq!(doc.slides.len(), 2);
        assert_eq!(doc.slides[0].id, "t-1");
    }
}
