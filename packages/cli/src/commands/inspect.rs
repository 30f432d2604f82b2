use super::{load_document, resolve};
use anyhow::Result;
use blockdeck_editor::{ExportAdapter, OutlineExporter};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Document to inspect
    pub document: String,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let doc = load_document(&resolve(cwd, &args.document))?;
    let outline = OutlineExporter.export(&doc)?;

    let mut lines = outline.lines();
    if let Some(title) = lines.next() {
        println!("{}", title.bright_white().bold());
    }
    for line in lines {
        println!("{}", line);
    }

    println!();
    println!(
        "{} {} slides, {} blocks",
        "✓".green(),
        doc.slide_count(),
        doc.block_count()
    );
    Ok(())
}
