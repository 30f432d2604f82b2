mod commands;
mod config;
mod script;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, export, init, inspect, new, replay, ApplyArgs, ExportArgs, InitArgs, InspectArgs,
    NewArgs, ReplayArgs,
};
use tracing_subscriber::EnvFilter;

/// Blockdeck CLI - build presentations and case studies from blocks
#[derive(Parser, Debug)]
#[command(name = "blockdeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blockdeck.config.json in the current directory
    Init(InitArgs),

    /// Create a new single-slide document
    New(NewArgs),

    /// Run an edit script against a document
    Apply(ApplyArgs),

    /// Replay a mutation log against a document
    Replay(ReplayArgs),

    /// Print a document's slide and block outline
    Inspect(InspectArgs),

    /// Export a document
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::New(args) => new(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
                Command::Replay(args) => replay(args, &cwd),
                Command::Inspect(args) => inspect(args, &cwd),
                Command::Export(args) => export(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
