use super::{load_document, resolve, write_document};
use crate::config::Config;
use anyhow::{Context, Result};
use blockdeck_editor::{EditSession, Mutation};
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document to edit
    pub document: String,

    /// Mutation log (one serialized mutation per line)
    pub log: String,

    /// Write the result here instead of overwriting the document
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Replay a recorded mutation log. The log applies as a whole or not at all.
pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc_path = resolve(cwd, &args.document);
    let log_path = resolve(cwd, &args.log);

    let source = fs::read_to_string(&log_path)
        .with_context(|| format!("Cannot read {}", log_path.display()))?;
    let mutations = parse_log(&source)?;

    let mut session = EditSession::open(load_document(&doc_path)?, config.editor)?;
    let applied = session.apply_all(mutations, format!("Replay {}", args.log))?;

    let out_path = match &args.output {
        Some(output) => resolve(cwd, output),
        None => doc_path,
    };
    write_document(&out_path, session.document())?;

    println!(
        "  {} Replayed {} mutations → {}",
        "✓".green(),
        applied,
        out_path.display()
    );
    Ok(())
}

fn parse_log(source: &str) -> Result<Vec<Mutation>> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}: invalid mutation", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log() {
        let log = r#"
{"RenameDocument":{"name":"Q3"}}
{"MoveSlide":{"from":0,"to":1}}
"#;
        let mutations = parse_log(log).unwrap();
        assert_eq!(mutations.len(), 2);
        assert_eq!(
            mutations[1],
            Mutation::MoveSlide { from: 0, to: 1 }
        );
    }

    #[test]
    fn test_parse_log_reports_line() {
        let err = parse_log("{\"RenameDocument\":{\"name\":\"Q3\"}}\n{\"Explode\":{}}").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
