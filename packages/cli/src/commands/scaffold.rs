use super::read_content;
use anyhow::Result;
use clap::Args;
use pagesmith_editor::scaffold as scaffold_source;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ScaffoldArgs {
    /// Page title; the component is named after it
    pub title: String,

    /// Content placed inside the component
    #[arg(short, long)]
    pub content: Option<String>,

    /// Read content from a file
    #[arg(long, conflicts_with = "content")]
    pub content_file: Option<PathBuf>,
}

pub fn scaffold(args: ScaffoldArgs, cwd: &str) -> Result<()> {
    let content = read_content(args.content, args.content_file.as_deref(), cwd)?;
    print!("{}", scaffold_source(&args.title, &content));
    Ok(())
}
