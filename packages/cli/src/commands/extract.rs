use super::{resolve, KindArg};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{extract as extract_region, DocumentKind};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Component source file
    pub file: PathBuf,

    /// Fallback chain to apply
    #[arg(short, long, value_enum, default_value = "page")]
    pub kind: KindArg,
}

pub fn extract(args: ExtractArgs, cwd: &str) -> Result<()> {
    let source = fs::read_to_string(resolve(cwd, &args.file))?;
    let kind: DocumentKind = args.kind.into();
    let extraction = extract_region(&source, kind);

    match extraction.region() {
        Some(region) => eprintln!(
            "{} {} region via {} ({}..{})",
            "✓".green(),
            kind,
            region.heuristic.name().cyan(),
            region.range.start,
            region.range.end
        ),
        None => eprintln!("{} No {} heuristic matched", "⚠️".yellow(), kind),
    }

    println!("{}", extraction.content());
    Ok(())
}
