use crate::undo_stack::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Editor tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Record pending transient edits as their own undo step before the
    /// next history-worthy change
    #[serde(default = "default_checkpoint")]
    pub checkpoint_transient_edits: bool,
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_checkpoint() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            checkpoint_transient_edits: default_checkpoint(),
        }
    }
}
