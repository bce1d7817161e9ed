use super::{read_content, resolve};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::VersionTag;
use pagesmith_workspace::{
    ContentService, SaveRequest, ServiceError, WorkspaceConfig, DEFAULT_CONFIG_NAME,
};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Logical page path (`/about`)
    pub path: String,

    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_NAME)]
    pub config: PathBuf,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Logical page path (`/about`)
    pub path: String,

    /// New content for the page
    #[arg(short, long)]
    pub content: Option<String>,

    /// Read new content from a file
    #[arg(long, conflicts_with = "content")]
    pub content_file: Option<PathBuf>,

    /// Title used for new pages and default commit messages
    #[arg(short, long)]
    pub title: Option<String>,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Only save if the page is still at this version
    #[arg(long)]
    pub base_version: Option<String>,

    /// Editor credential
    #[arg(long, env = "PAGESMITH_CREDENTIAL", hide_env_values = true)]
    pub credential: Option<String>,

    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_NAME)]
    pub config: PathBuf,
}

fn load_service(config: &std::path::Path, cwd: &str) -> Result<ContentService> {
    let path = resolve(cwd, config);
    tracing::debug!(config = %path.display(), "loading config");
    let config = WorkspaceConfig::load_file(&path)
        .with_context(|| format!("Cannot load {}", path.display()))?;
    Ok(ContentService::from_config(&config)?)
}

/// Turn a service failure into the message an editor should see
fn explain(error: ServiceError) -> anyhow::Error {
    anyhow!(
        "{} [{} {}]",
        error.user_message(),
        error.kind(),
        error.status_code()
    )
}

pub fn get(args: GetArgs, cwd: &str) -> Result<()> {
    let service = load_service(&args.config, cwd)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let view = runtime
        .block_on(service.get_content(&args.path))
        .map_err(explain)?;

    eprintln!(
        "{} {} ({} @ {})",
        view.title.bright_white().bold(),
        view.path,
        view.file.cyan(),
        view.version
    );
    if !view.editable {
        eprintln!("{}", "⚠️  No editable region detected".yellow());
    }
    println!("{}", view.content);
    Ok(())
}

pub fn save(args: SaveArgs, cwd: &str) -> Result<()> {
    let content = read_content(args.content, args.content_file.as_deref(), cwd)?;
    let request = SaveRequest {
        path: args.path,
        content,
        title: args.title,
        message: args.message,
        credential: args.credential,
        base_version: args.base_version.map(VersionTag::new),
    };

    let service = load_service(&args.config, cwd)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let receipt = runtime
        .block_on(service.save_content(request))
        .map_err(explain)?;

    let verb = if receipt.created { "Created" } else { "Updated" };
    println!(
        "{} {} {} (commit {}, version {})",
        "✓".green(),
        verb,
        receipt.path.bright_white(),
        receipt.commit_ref.cyan(),
        receipt.version
    );
    Ok(())
}
