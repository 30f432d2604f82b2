//! # Documents and slides
//!
//! A [`Document`] owns an ordered, never-empty list of slides; each [`Slide`]
//! owns an ordered list of blocks. Slides are held behind `Arc` so a cloned
//! document shares every slide with the original until one side writes to
//! it (`Arc::make_mut` copies just that slide). History snapshots rely on
//! this to stay cheap.

use crate::block::Block;
use crate::error::{ModelError, ModelResult};
use crate::id_generator::IDGenerator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Which builder a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    #[default]
    Presentation,
    CaseStudy,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Presentation => "presentation",
            DocumentKind::CaseStudy => "case-study",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slide background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Background {
    Solid(String),
    Gradient(String),
    Image(String),
}

impl Background {
    pub fn value(&self) -> &str {
        match self {
            Background::Solid(v) | Background::Gradient(v) | Background::Image(v) => v,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid("#FFFFFF".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    None,
    Fade,
    Slide,
    Zoom,
}

/// A slide (presentation) or page (case study)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub background: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    /// New slide with no blocks and the default background
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            blocks: Vec::new(),
            background: Background::default(),
            transition: None,
            notes: None,
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }

    pub fn contains_block(&self, block_id: &str) -> bool {
        self.block_index(block_id).is_some()
    }

    /// Deep copy under `new_id`, renaming blocks in order with `block_ids`.
    ///
    /// Returns `None` unless exactly one fresh id is supplied per block.
    pub fn duplicate(&self, new_id: impl Into<String>, block_ids: &[String]) -> Option<Slide> {
        if block_ids.len() != self.blocks.len() {
            return None;
        }

        Some(Slide {
            id: new_id.into(),
            blocks: self
                .blocks
                .iter()
                .zip(block_ids)
                .map(|(block, id)| block.duplicate(id.clone()))
                .collect(),
            background: self.background.clone(),
            transition: self.transition,
            notes: self.notes.clone(),
        })
    }
}

/// Root document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: DocumentKind,
    pub slides: Vec<Arc<Slide>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Document {
    /// New document with a single empty slide. The document id is the
    /// generator's seed.
    pub fn new(ids: &mut IDGenerator, name: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            id: ids.seed().to_string(),
            name: name.into(),
            kind,
            slides: vec![Arc::new(Slide::empty(ids.new_id()))],
            theme: None,
            metadata: None,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, slide_id: &str) -> Option<&Slide> {
        self.slides.iter().map(Arc::as_ref).find(|s| s.id == slide_id)
    }

    pub fn slide_at(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index).map(Arc::as_ref)
    }

    pub fn slide_index(&self, slide_id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == slide_id)
    }

    /// Mutable access to one slide; copies it first if a snapshot shares it
    pub fn slide_mut(&mut self, slide_id: &str) -> Option<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| s.id == slide_id)
            .map(Arc::make_mut)
    }

    /// Locate a block anywhere in the document
    pub fn find_block(&self, block_id: &str) -> Option<(&Slide, &Block)> {
        self.slides.iter().find_map(|slide| {
            slide.block(block_id).map(|block| (&**slide, block))
        })
    }

    pub fn contains_block(&self, block_id: &str) -> bool {
        self.find_block(block_id).is_some()
    }

    /// Every id in the document: its own, then slides and their blocks
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.slides.iter().flat_map(|slide| {
            std::iter::once(slide.id.as_str()).chain(slide.blocks.iter().map(|b| b.id.as_str()))
        }))
    }

    pub fn block_count(&self) -> usize {
        self.slides.iter().map(|s| s.blocks.len()).sum()
    }

    /// Check the structural invariants: at least one slide, unique slide
    /// ids, unique block ids within each slide, finite chart values.
    pub fn validate(&self) -> ModelResult<()> {
        if self.slides.is_empty() {
            return Err(ModelError::EmptyDocument);
        }

        let mut slide_ids = HashSet::new();
        for slide in &self.slides {
            if !slide_ids.insert(slide.id.as_str()) {
                return Err(ModelError::DuplicateSlide(slide.id.clone()));
            }

            let mut block_ids = HashSet::new();
            for block in &slide.blocks {
                if !block_ids.insert(block.id.as_str()) {
                    return Err(ModelError::DuplicateBlock {
                        slide_id: slide.id.clone(),
                        block_id: block.id.clone(),
                    });
                }
                block.content.validate()?;
            }
        }

        Ok(())
    }

    /// Parse and validate a persisted document
    pub fn from_json(source: &str) -> ModelResult<Self> {
        let doc: Document = serde_json::from_str(source)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
