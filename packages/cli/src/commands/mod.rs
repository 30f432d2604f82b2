pub mod apply;
pub mod export;
pub mod init;
pub mod inspect;
pub mod new;
pub mod replay;

pub use apply::{apply, ApplyArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use new::{new, NewArgs};
pub use replay::{replay, ReplayArgs};

use anyhow::{Context, Result};
use blockdeck_model::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a user-supplied path against the working directory
pub(crate) fn resolve(cwd: &str, path: &str) -> PathBuf {
    PathBuf::from(cwd).join(path)
}

pub(crate) fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let doc = Document::from_json(&content)
        .with_context(|| format!("Invalid document {}", path.display()))?;
    Ok(doc)
}

pub(crate) fn write_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, doc.to_json_pretty()?)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}
