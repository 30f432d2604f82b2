use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use blockdeck_editor::EditorConfig;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Default document kind (presentation, case-study)
    #[arg(short, long, default_value = "presentation")]
    pub kind: String,

    /// Undo levels kept per session (0 = unlimited)
    #[arg(long, default_value_t = blockdeck_editor::DEFAULT_CAPACITY)]
    pub history: usize,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config {
        editor: EditorConfig {
            history_capacity: args.history,
            ..EditorConfig::default()
        },
        default_kind: super::new::parse_kind(&args.kind)?,
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Run: blockdeck new deck.json");
    println!("  2. Run: blockdeck apply deck.json edits.jsonl");
    println!("  3. Run: blockdeck inspect deck.json");

    Ok(())
}
