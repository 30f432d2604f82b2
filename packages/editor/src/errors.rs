//! Error types for the editor

use crate::export::ExportError;
use blockdeck_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}
