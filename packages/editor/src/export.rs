//! # Export seam
//!
//! Renderers (HTML, PDF, PPTX) live outside the editor. They receive a
//! snapshot of the document taken at export time, so editing can continue
//! while an export is in flight.

use blockdeck_model::Document;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("{adapter} export failed: {message}")]
    Adapter {
        adapter: &'static str,
        message: String,
    },
}

/// Something that renders a finished document
pub trait ExportAdapter {
    type Output;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Render the document. Adapters only read it.
    fn export(&self, doc: &Document) -> Result<Self::Output, ExportError>;
}

/// Serializes the document tree as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl JsonExporter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl ExportAdapter for JsonExporter {
    type Output = String;

    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, doc: &Document) -> Result<String, ExportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(doc)?
        } else {
            serde_json::to_string(doc)?
        };
        Ok(json)
    }
}

/// Plain-text outline: one line per slide, one indented line per block
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineExporter;

impl ExportAdapter for OutlineExporter {
    type Output = String;

    fn name(&self) -> &'static str {
        "outline"
    }

    fn export(&self, doc: &Document) -> Result<String, ExportError> {
        let mut out = String::new();
        writeln!(out, "{} ({}, {} slides)", doc.name, doc.kind, doc.slides.len())?;

        for (index, slide) in doc.slides.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {} [{} blocks, {}]",
                index + 1,
                slide.id,
                slide.blocks.len(),
                slide.background.value()
            )?;

            for block in &slide.blocks {
                let preview = block.content.preview();
                if preview.is_empty() {
                    writeln!(out, "       - {}", block.kind())?;
                } else {
                    writeln!(out, "       - {}: {}", block.kind(), preview)?;
                }
            }
        }

        Ok(out)
    }
}
