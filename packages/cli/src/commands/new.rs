use super::{resolve, write_document};
use crate::config::Config;
use anyhow::{anyhow, Result};
use blockdeck_editor::EditSession;
use blockdeck_model::DocumentKind;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Where to write the document
    pub path: String,

    /// Document name (defaults to config)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Document kind: presentation or case-study (defaults to config)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Force overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.path);

    if path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let kind = match &args.kind {
        Some(kind) => parse_kind(kind)?,
        None => config.default_kind,
    };
    let name = args.name.unwrap_or(config.default_name);

    let session = EditSession::new(name, kind, config.editor);
    write_document(&path, session.document())?;

    println!(
        "  {} Created {} {} ({})",
        "✓".green(),
        kind,
        session.document().name.bright_white(),
        args.path
    );
    Ok(())
}

pub(crate) fn parse_kind(kind: &str) -> Result<DocumentKind> {
    match kind {
        "presentation" => Ok(DocumentKind::Presentation),
        "case-study" => Ok(DocumentKind::CaseStudy),
        other => Err(anyhow!(
            "Invalid kind: {}. Use: presentation or case-study",
            other
        )),
    }
}
