//! Tests for longer editing sequences
//!
//! This tests:
//! - Slide and block reordering
//! - Duplicate independence
//! - Bounded history and branch discard
//! - Batches and transient edit checkpoints

use blockdeck_editor::{EditSession, EditorConfig};
use blockdeck_model::{BlockContent, BlockKind, ContentPatch, DocumentKind};

fn session_with(config: EditorConfig) -> EditSession {
    EditSession::new("Sequences", DocumentKind::Presentation, config)
}

fn session() -> EditSession {
    session_with(EditorConfig::default())
}

fn slide_ids(session: &EditSession) -> Vec<String> {
    session
        .document()
        .slides
        .iter()
        .map(|s| s.id.clone())
        .collect()
}

fn block_text(session: &EditSession, slide_index: usize, block_index: usize) -> String {
    session.document().slides[slide_index].blocks[block_index]
        .content
        .preview()
}

#[test]
fn test_reorder_slides_example() {
    let mut session = session();
    let a = session.current_slide().id.clone();
    let b = session.add_slide(None).unwrap();
    let c = session.add_slide(None).unwrap();
    let d = session.add_slide(None).unwrap();

    assert!(session.reorder_slides(0, 2));

    assert_eq!(slide_ids(&session), vec![b, c, a, d]);
    assert_eq!(session.current_slide_index(), 2);
}

#[test]
fn test_reorder_blocks_example() {
    let mut session = session();
    let slide = session.current_slide().id.clone();
    let h = session.add_block(&slide, BlockKind::Heading, None).unwrap();
    let p = session.add_block(&slide, BlockKind::Paragraph, None).unwrap();
    let q = session.add_block(&slide, BlockKind::Quote, None).unwrap();

    assert!(session.reorder_blocks(&slide, 2, 0));

    let order: Vec<&str> = session.current_slide().blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(order, vec![q.as_str(), h.as_str(), p.as_str()]);

    // Out of range moves are ignored
    let levels = session.history().undo_levels();
    assert!(!session.reorder_blocks(&slide, 0, 3));
    assert_eq!(session.history().undo_levels(), levels);

    // A same-position move still takes an undo step
    let before = session.snapshot();
    assert!(session.reorder_blocks(&slide, 1, 1));
    assert_eq!(session.history().undo_levels(), levels + 1);
    assert!(session.undo());
    assert_eq!(session.document(), &before);
}

#[test]
fn test_reorder_slide_onto_itself_follows_target() {
    let mut session = session();
    session.add_slide(None).unwrap();
    session.add_slide(None).unwrap();
    session.set_current_slide(0);

    assert!(session.reorder_slides(2, 2));
    assert_eq!(session.current_slide_index(), 2);
    assert_eq!(session.undo_label(), Some("Reorder slides"));
}

#[test]
fn test_same_value_rename_undoes_only_itself() {
    let mut session = session();
    session.add_slide(None).unwrap();
    let two_slides = session.snapshot();

    assert!(session.rename_document("Sequences"));
    assert!(session.undo());
    assert_eq!(session.document(), &two_slides);

    assert!(session.undo());
    assert_eq!(session.document().slides.len(), 1);
}

#[test]
fn test_duplicate_slide_is_independent() {
    let mut session = session();
    let original = session.current_slide().id.clone();
    let block = session.add_block(&original, BlockKind::Paragraph, None).unwrap();
    assert!(session.update_block(&original, &block, ContentPatch::new().set("text", "Original"), None));

    let copy = session.duplicate_slide(&original).unwrap();
    assert_eq!(session.current_slide_index(), 1);
    assert_eq!(session.current_slide().id, copy);

    let copied_block = session.current_slide().blocks[0].id.clone();
    assert_ne!(copied_block, block);
    assert!(session.update_block(&copy, &copied_block, ContentPatch::new().set("text", "Changed"), None));

    assert_eq!(block_text(&session, 0, 0), "Original");
    assert_eq!(block_text(&session, 1, 0), "Changed");
}

#[test]
fn test_duplicate_block_lands_after_original() {
    let mut session = session();
    let slide = session.current_slide().id.clone();
    let first = session.add_block(&slide, BlockKind::StatCard, None).unwrap();
    let last = session.add_block(&slide, BlockKind::Divider, None).unwrap();

    let copy = session.duplicate_block(&slide, &first).unwrap();

    let order: Vec<&str> = session.current_slide().blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(order, vec![first.as_str(), copy.as_str(), last.as_str()]);
    assert_eq!(
        session.current_slide().blocks[0].content,
        session.current_slide().blocks[1].content
    );
}

#[test]
fn test_history_is_bounded_fifo() {
    let mut session = session_with(EditorConfig {
        history_capacity: 3,
        ..EditorConfig::default()
    });

    for i in 0..6 {
        assert!(session.rename_document(format!("v{}", i)));
        assert!(session.history().len() <= 3);
    }

    // Oldest entries were evicted; the newest three remain
    let names: Vec<&str> = session
        .history()
        .entries()
        .iter()
        .map(|e| e.document.name.as_str())
        .collect();
    assert_eq!(names, vec!["v2", "v3", "v4"]);

    while session.undo() {}
    assert_eq!(session.document().name, "v2");
}

#[test]
fn test_unbounded_history() {
    let mut session = session_with(EditorConfig {
        history_capacity: 0,
        ..EditorConfig::default()
    });

    for i in 0..80 {
        session.rename_document(format!("v{}", i));
    }
    assert_eq!(session.history().undo_levels(), 80);
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut session = session();
    session.rename_document("one");
    session.rename_document("two");

    assert!(session.undo());
    assert!(session.can_redo());

    session.add_slide(None);
    assert!(!session.can_redo());
    assert!(!session.redo());
    assert_eq!(session.document().name, "one");
}

#[test]
fn test_batch_undoes_as_one_step() {
    let mut session = session();
    let before = session.snapshot();
    let slide = session.current_slide().id.clone();

    session.begin_batch("Insert title slide");
    session.add_block(&slide, BlockKind::Heading, None).unwrap();
    session.add_block(&slide, BlockKind::Subheading, None).unwrap();
    session.add_slide(None).unwrap();
    session.end_batch();

    assert_eq!(session.history().undo_levels(), 1);
    assert_eq!(session.undo_label(), Some("Insert title slide"));

    assert!(session.undo());
    assert_eq!(session.document(), &before);
    assert_eq!(session.redo_label(), Some("Insert title slide"));
}

#[test]
fn test_transient_edits_checkpoint_before_next_step() {
    let mut session = session();
    let slide = session.current_slide().id.clone();
    let block = session.add_block(&slide, BlockKind::Paragraph, None).unwrap();

    for text in ["H", "He", "Hel", "Hello"] {
        session.update_block(&slide, &block, ContentPatch::new().set("text", text), None);
    }
    assert_eq!(session.history().undo_levels(), 1);
    assert!(session.has_pending_edits());

    session.add_slide(None).unwrap();
    assert!(!session.has_pending_edits());
    assert_eq!(session.history().undo_levels(), 3);

    // Undo the slide, then the typing as one step, then the block
    assert!(session.undo());
    assert_eq!(session.undo_label(), Some("Edit content"));
    assert!(session.undo());
    assert_eq!(block_text(&session, 0, 0), "Enter your text here...");
    assert!(session.redo());
    assert_eq!(block_text(&session, 0, 0), "Hello");
}

#[test]
fn test_transient_edits_fold_into_next_step_without_checkpoints() {
    let mut session = session_with(EditorConfig {
        checkpoint_transient_edits: false,
        ..EditorConfig::default()
    });
    let slide = session.current_slide().id.clone();
    let block = session.add_block(&slide, BlockKind::Paragraph, None).unwrap();

    session.update_block(&slide, &block, ContentPatch::new().set("text", "Typed"), None);
    session.add_slide(None).unwrap();
    assert_eq!(session.history().undo_levels(), 2);

    // The typing is part of the state the slide insert recorded
    assert!(session.undo());
    assert_eq!(block_text(&session, 0, 0), "Typed");
}

#[test]
fn test_undo_keeps_uncommitted_edits_for_redo() {
    let mut session = session();
    let slide = session.current_slide().id.clone();
    let block = session.add_block(&slide, BlockKind::Heading, None).unwrap();
    session.update_block(&slide, &block, ContentPatch::new().set("text", "Draft"), None);

    assert!(session.undo());
    assert!(session.current_slide().blocks.is_empty());

    assert!(session.redo());
    assert_eq!(
        session.current_slide().blocks[0].content,
        BlockContent::Heading {
            text: "Draft".to_string(),
            level: 2,
        }
    );
}

#[test]
fn test_commit_pending_edits() {
    let mut session = session();
    let slide = session.current_slide().id.clone();

    assert!(!session.commit_pending_edits());
    session.update_slide_notes(&slide, "Pause for questions");
    assert!(session.commit_pending_edits());
    assert_eq!(session.undo_label(), Some("Edit content"));

    assert!(session.undo());
    assert_eq!(session.current_slide().notes, None);
}

#[test]
fn test_slide_index_clamped_after_delete_and_undo() {
    let mut session = session();
    session.add_slide(None).unwrap();
    let last = session.add_slide(None).unwrap();
    assert_eq!(session.current_slide_index(), 2);

    assert!(session.delete_slide(&last));
    assert_eq!(session.current_slide_index(), 1);

    // Removing every other slide always leaves one
    while session.delete_slide(&slide_ids(&session)[0]) {}
    assert_eq!(session.document().slides.len(), 1);
    assert_eq!(session.current_slide_index(), 0);

    while session.undo() {}
    assert_eq!(session.document().slides.len(), 1);
    while session.redo() {}
    assert_eq!(session.document().slides.len(), 1);
}
