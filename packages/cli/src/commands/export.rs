use super::{load_document, resolve};
use anyhow::{anyhow, Result};
use blockdeck_editor::{EditSession, ExportAdapter, JsonExporter, OutlineExporter};
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document to export
    pub document: String,

    /// Output format (json, outline)
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let session = EditSession::open(
        load_document(&resolve(cwd, &args.document))?,
        Default::default(),
    )?;

    let rendered = match args.format.as_str() {
        "json" => {
            let exporter = if args.compact {
                JsonExporter::compact()
            } else {
                JsonExporter::pretty()
            };
            render(&session, &exporter)?
        }
        "outline" => render(&session, &OutlineExporter)?,
        other => {
            return Err(anyhow!("Invalid format: {}. Use: json or outline", other));
        }
    };

    match &args.output {
        Some(output) => {
            let path = resolve(cwd, output);
            fs::write(&path, rendered)?;
            eprintln!("  {} {} → {}", "✓".green(), args.format, path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render<A: ExportAdapter<Output = String>>(session: &EditSession, adapter: &A) -> Result<String> {
    Ok(session.export_with(adapter)?)
}
