use blockdeck_editor::EditorConfig;
use blockdeck_model::DocumentKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "blockdeck.config.json";

/// Blockdeck configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// History and checkpoint settings for edit sessions
    #[serde(default)]
    pub editor: EditorConfig,

    /// Name given to documents created without one
    #[serde(default = "default_name")]
    pub default_name: String,

    /// Kind of documents created without `--kind`
    #[serde(default)]
    pub default_kind: DocumentKind,
}

fn default_name() -> String {
    "Untitled".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            default_name: default_name(),
            default_kind: DocumentKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "editor": { "historyCapacity": 100, "checkpointTransientEdits": false },
            "defaultName": "Quarterly review",
            "defaultKind": "case-study"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.editor.history_capacity, 100);
        assert!(!config.editor.checkpoint_transient_edits);
        assert_eq!(config.default_name, "Quarterly review");
        assert_eq!(config.default_kind, DocumentKind::CaseStudy);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_name, "Untitled");
        assert_eq!(config.default_kind, DocumentKind::Presentation);
        assert_eq!(config.editor.history_capacity, 50);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("blockdeck-config-missing");
        let config = Config::load(&dir.display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }
}
