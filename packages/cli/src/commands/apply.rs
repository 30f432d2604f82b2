use super::{load_document, resolve, write_document};
use crate::config::Config;
use crate::script::parse_script;
use anyhow::{anyhow, Context, Result};
use blockdeck_editor::EditSession;
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Document to edit
    pub document: String,

    /// Edit script (one JSON command per line)
    pub script: String,

    /// Write the result here instead of overwriting the document
    #[arg(short, long)]
    pub output: Option<String>,

    /// Fail on the first command that changes nothing
    #[arg(long)]
    pub strict: bool,

    /// Parse and run without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc_path = resolve(cwd, &args.document);
    let script_path = resolve(cwd, &args.script);

    let source = fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read {}", script_path.display()))?;
    let commands = parse_script(&source)?;
    let mut session = EditSession::open(load_document(&doc_path)?, config.editor)?;

    println!(
        "{} {} commands to {}",
        "Applying".bright_blue().bold(),
        commands.len(),
        args.document
    );

    let mut ignored = 0;
    for (line, command) in &commands {
        let changed = command
            .run(&mut session)
            .map_err(|err| anyhow!("line {}: {}", line, err))?;

        if changed {
            println!("  {} {:>3}: {}", "✓".green(), line, command.op());
        } else if args.strict {
            return Err(anyhow!("line {}: {} changed nothing", line, command.op()));
        } else {
            ignored += 1;
            println!("  {} {:>3}: {} (ignored)", "-".yellow(), line, command.op());
        }
    }

    // Typing at the end of a script is kept in history like any other step
    session.commit_pending_edits();

    println!();
    println!(
        "{} slides, {} blocks, {} undo levels, {} ignored",
        session.document().slides.len(),
        session.document().block_count(),
        session.history().undo_levels(),
        ignored
    );

    if args.dry_run {
        println!("{}", "Dry run: nothing written".yellow());
        return Ok(());
    }

    let out_path = match &args.output {
        Some(output) => resolve(cwd, output),
        None => doc_path,
    };
    write_document(&out_path, session.document())?;
    println!("{} {}", "✅ Wrote".green().bold(), out_path.display());

    Ok(())
}
