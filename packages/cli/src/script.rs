//! Edit scripts: one JSON command per line, replayed against an edit session.
//!
//! ```text
//! {"op": "add-slide"}
//! {"op": "add-block", "type": "heading", "content": {"text": "Results"}}
//! {"op": "update-block", "block": 0, "content": {"level": 1}}
//! {"op": "move-slide", "from": 1, "to": 0}
//! {"op": "undo"}
//! ```
//!
//! Slides and blocks are referenced by index or by id. A missing `slide`
//! means the current slide. Blank lines and lines starting with `#` are
//! skipped.

use blockdeck_editor::{EditSession, NewBlock};
use blockdeck_model::{Background, BlockKind, BlockStyle, ContentPatch, ModelResult, Transition};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
}

/// A slide or block, by position or by id
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum EditCommand {
    Rename {
        name: String,
    },
    AddSlide {
        #[serde(default)]
        after: Option<usize>,
    },
    DeleteSlide {
        #[serde(default)]
        slide: Option<Target>,
    },
    DuplicateSlide {
        #[serde(default)]
        slide: Option<Target>,
    },
    MoveSlide {
        from: usize,
        to: usize,
    },
    SetBackground {
        #[serde(default)]
        slide: Option<Target>,
        background: Background,
    },
    SetTransition {
        #[serde(default)]
        slide: Option<Target>,
        transition: Option<Transition>,
    },
    SetNotes {
        #[serde(default)]
        slide: Option<Target>,
        notes: String,
    },
    GoTo {
        index: usize,
    },
    Next,
    Previous,
    AddBlock {
        #[serde(default)]
        slide: Option<Target>,
        #[serde(rename = "type")]
        kind: BlockKind,
        #[serde(default)]
        content: ContentPatch,
        #[serde(default)]
        style: Option<BlockStyle>,
        #[serde(default)]
        after: Option<Target>,
    },
    UpdateBlock {
        #[serde(default)]
        slide: Option<Target>,
        block: Target,
        #[serde(default)]
        content: ContentPatch,
        #[serde(default)]
        style: Option<BlockStyle>,
    },
    DeleteBlock {
        #[serde(default)]
        slide: Option<Target>,
        block: Target,
    },
    DuplicateBlock {
        #[serde(default)]
        slide: Option<Target>,
        block: Target,
    },
    MoveBlock {
        #[serde(default)]
        slide: Option<Target>,
        from: usize,
        to: usize,
    },
    Select {
        #[serde(default)]
        slide: Option<Target>,
        #[serde(default)]
        block: Option<Target>,
    },
    Undo,
    Redo,
    Commit,
    BeginBatch {
        label: String,
    },
    EndBatch,
}

impl EditCommand {
    pub fn op(&self) -> &'static str {
        match self {
            EditCommand::Rename { .. } => "rename",
            EditCommand::AddSlide { .. } => "add-slide",
            EditCommand::DeleteSlide { .. } => "delete-slide",
            EditCommand::DuplicateSlide { .. } => "duplicate-slide",
            EditCommand::MoveSlide { .. } => "move-slide",
            EditCommand::SetBackground { .. } => "set-background",
            EditCommand::SetTransition { .. } => "set-transition",
            EditCommand::SetNotes { .. } => "set-notes",
            EditCommand::GoTo { .. } => "go-to",
            EditCommand::Next => "next",
            EditCommand::Previous => "previous",
            EditCommand::AddBlock { .. } => "add-block",
            EditCommand::UpdateBlock { .. } => "update-block",
            EditCommand::DeleteBlock { .. } => "delete-block",
            EditCommand::DuplicateBlock { .. } => "duplicate-block",
            EditCommand::MoveBlock { .. } => "move-block",
            EditCommand::Select { .. } => "select",
            EditCommand::Undo => "undo",
            EditCommand::Redo => "redo",
            EditCommand::Commit => "commit",
            EditCommand::BeginBatch { .. } => "begin-batch",
            EditCommand::EndBatch => "end-batch",
        }
    }

    /// Run against a session. Returns whether the command changed anything;
    /// commands referring to missing slides or blocks are ignored.
    pub fn run(&self, session: &mut EditSession) -> ModelResult<bool> {
        let changed = match self {
            EditCommand::Rename { name } => session.rename_document(name.clone()),
            EditCommand::AddSlide { after } => session.add_slide(*after).is_some(),
            EditCommand::DeleteSlide { slide } => match slide_id(session, slide.as_ref()) {
                Some(id) => session.delete_slide(&id),
                None => false,
            },
            EditCommand::DuplicateSlide { slide } => match slide_id(session, slide.as_ref()) {
                Some(id) => session.duplicate_slide(&id).is_some(),
                None => false,
            },
            EditCommand::MoveSlide { from, to } => session.reorder_slides(*from, *to),
            EditCommand::SetBackground { slide, background } => {
                match slide_id(session, slide.as_ref()) {
                    Some(id) => session.update_slide_background(&id, background.clone()),
                    None => false,
                }
            }
            EditCommand::SetTransition { slide, transition } => {
                match slide_id(session, slide.as_ref()) {
                    Some(id) => session.update_slide_transition(&id, *transition),
                    None => false,
                }
            }
            EditCommand::SetNotes { slide, notes } => match slide_id(session, slide.as_ref()) {
                Some(id) => session.update_slide_notes(&id, notes.clone()),
                None => false,
            },
            EditCommand::GoTo { index } => navigate(session, |s| s.set_current_slide(*index)),
            EditCommand::Next => navigate(session, EditSession::next_slide),
            EditCommand::Previous => navigate(session, EditSession::previous_slide),
            EditCommand::AddBlock {
                slide,
                kind,
                content,
                style,
                after,
            } => {
                let Some(id) = slide_id(session, slide.as_ref()) else {
                    return Ok(false);
                };
                let mut block = NewBlock::partial(*kind, content)?;
                block.style = style.clone();
                let after = match after {
                    Some(target) => match block_id(session, &id, target) {
                        Some(after) => Some(after),
                        None => return Ok(false),
                    },
                    None => None,
                };
                session.add_block(&id, block, after.as_deref()).is_some()
            }
            EditCommand::UpdateBlock {
                slide,
                block,
                content,
                style,
            } => match block_ref(session, slide.as_ref(), block) {
                Some((slide_id, block_id)) => {
                    session.update_block(&slide_id, &block_id, content.clone(), style.clone())
                }
                None => false,
            },
            EditCommand::DeleteBlock { slide, block } => {
                match block_ref(session, slide.as_ref(), block) {
                    Some((slide_id, block_id)) => session.delete_block(&slide_id, &block_id),
                    None => false,
                }
            }
            EditCommand::DuplicateBlock { slide, block } => {
                match block_ref(session, slide.as_ref(), block) {
                    Some((slide_id, block_id)) => {
                        session.duplicate_block(&slide_id, &block_id).is_some()
                    }
                    None => false,
                }
            }
            EditCommand::MoveBlock { slide, from, to } => match slide_id(session, slide.as_ref()) {
                Some(id) => session.reorder_blocks(&id, *from, *to),
                None => false,
            },
            EditCommand::Select { slide, block } => {
                let before = session.selected_block_id().map(str::to_string);
                match block {
                    Some(target) => match block_ref(session, slide.as_ref(), target) {
                        Some((_, block_id)) => session.select_block(Some(&block_id)),
                        None => return Ok(false),
                    },
                    None => session.select_block(None),
                }
                before.as_deref() != session.selected_block_id()
            }
            EditCommand::Undo => session.undo(),
            EditCommand::Redo => session.redo(),
            EditCommand::Commit => session.commit_pending_edits(),
            EditCommand::BeginBatch { label } => {
                session.begin_batch(label.clone());
                true
            }
            EditCommand::EndBatch => {
                session.end_batch();
                true
            }
        };
        Ok(changed)
    }
}

/// Parse a script, skipping blank and comment lines. Each command is paired
/// with its 1-based line number.
pub fn parse_script(source: &str) -> Result<Vec<(usize, EditCommand)>, ScriptError> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text)
                .map(|command| (line, command))
                .map_err(|source| ScriptError::Parse { line, source })
        })
        .collect()
}

fn navigate(session: &mut EditSession, step: impl FnOnce(&mut EditSession)) -> bool {
    let before = session.current_slide_index();
    step(session);
    before != session.current_slide_index()
}

fn slide_id(session: &EditSession, target: Option<&Target>) -> Option<String> {
    let doc = session.document();
    match target {
        None => Some(session.current_slide().id.clone()),
        Some(Target::Index(index)) => doc.slide_at(*index).map(|s| s.id.clone()),
        Some(Target::Id(id)) => doc.slide(id).map(|s| s.id.clone()),
    }
}

fn block_id(session: &EditSession, slide_id: &str, target: &Target) -> Option<String> {
    let slide = session.document().slide(slide_id)?;
    match target {
        Target::Index(index) => slide.blocks.get(*index).map(|b| b.id.clone()),
        Target::Id(id) => slide.block(id).map(|b| b.id.clone()),
    }
}

fn block_ref(
    session: &EditSession,
    slide: Option<&Target>,
    block: &Target,
) -> Option<(String, String)> {
    let slide_id = slide_id(session, slide)?;
    let block_id = block_id(session, &slide_id, block)?;
    Some((slide_id, block_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdeck_editor::EditorConfig;
    use blockdeck_model::{BlockContent, DocumentKind};

    fn session() -> EditSession {
        EditSession::new("Script", DocumentKind::Presentation, EditorConfig::default())
    }

    fn run_all(session: &mut EditSession, source: &str) -> Vec<bool> {
        parse_script(source)
            .unwrap()
            .iter()
            .map(|(_, command)| command.run(session).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = r#"
            # title slide
            {"op": "rename", "name": "Q3"}

            {"op": "add-block", "type": "heading", "content": {"text": "Results"}}
            {"op": "undo"}
        "#;

        let commands = parse_script(script).unwrap();
        let lines: Vec<usize> = commands.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![3, 5, 6]);
        assert_eq!(commands[2].1, EditCommand::Undo);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_script("{\"op\": \"undo\"}\n{\"op\": \"fly\"}").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_targets_by_index_and_id() {
        let mut session = session();
        let results = run_all(
            &mut session,
            r#"
            {"op": "add-block", "type": "heading", "content": {"text": "Results", "level": 1}}
            {"op": "add-block", "type": "paragraph"}
            {"op": "add-slide"}
            {"op": "update-block", "slide": 0, "block": 1, "content": {"text": "Revenue grew"}}
            {"op": "move-block", "slide": 0, "from": 1, "to": 0}
            "#,
        );
        assert_eq!(results, vec![true; 5]);

        let first = &session.document().slides[0];
        assert_eq!(
            first.blocks[0].content,
            BlockContent::Paragraph {
                text: "Revenue grew".to_string()
            }
        );

        let id = first.id.clone();
        let by_id = format!(r#"{{"op": "delete-block", "slide": "{}", "block": 1}}"#, id);
        assert_eq!(run_all(&mut session, &by_id), vec![true]);
        assert_eq!(session.document().slides[0].blocks.len(), 1);
    }

    #[test]
    fn test_missing_targets_are_ignored() {
        let mut session = session();
        let results = run_all(
            &mut session,
            r#"
            {"op": "delete-slide"}
            {"op": "delete-block", "block": 3}
            {"op": "set-notes", "slide": 9, "notes": "x"}
            {"op": "select", "block": "nope"}
            {"op": "previous"}
            "#,
        );
        assert_eq!(results, vec![false; 5]);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_bad_content_is_an_error() {
        let mut session = session();
        let commands =
            parse_script(r#"{"op": "add-block", "type": "heading", "content": {"level": "big"}}"#)
                .unwrap();
        assert!(commands[0].1.run(&mut session).is_err());
    }

    #[test]
    fn test_batch_commands() {
        let mut session = session();
        run_all(
            &mut session,
            r#"
            {"op": "begin-batch", "label": "Outline"}
            {"op": "add-slide"}
            {"op": "add-slide"}
            {"op": "end-batch"}
            "#,
        );
        assert_eq!(session.document().slides.len(), 3);
        assert_eq!(session.undo_label(), Some("Outline"));
        assert_eq!(run_all(&mut session, r#"{"op": "undo"}"#), vec![true]);
        assert_eq!(session.document().slides.len(), 1);
    }
}
