use crate::block::BlockKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document has no slides")]
    EmptyDocument,

    #[error("Duplicate slide id: {0}")]
    DuplicateSlide(String),

    #[error("Duplicate block id {block_id} in slide {slide_id}")]
    DuplicateBlock { slide_id: String, block_id: String },

    #[error("Chart value for {label:?} is not a finite number")]
    NonFiniteValue { label: String },

    #[error("Patch does not fit a {kind} block: {reason}")]
    PatchMismatch { kind: BlockKind, reason: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
