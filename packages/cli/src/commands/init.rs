use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_workspace::{PageEntry, StoreConfig, WorkspaceConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Repository owner in the store
    #[arg(long, default_value = "")]
    pub owner: String,

    /// Repository name in the store
    #[arg(long, default_value = "")]
    pub repo: String,

    /// Branch edits are committed to
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Component file of the home page
    #[arg(long, default_value = "app/page.tsx")]
    pub home_file: String,

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

    println!("{}", "📝 Initializing Pagesmith...".bright_blue().bold());

    let config = WorkspaceConfig {
        pages: vec![PageEntry::new("/", &args.home_file).with_title("Home")],
        store: StoreConfig {
            owner: args.owner,
            repo: args.repo,
            branch: args.branch,
            ..StoreConfig::default()
        },
        ..WorkspaceConfig::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Add your pages to {}", DEFAULT_CONFIG_NAME);
    println!("  2. Export {}", config.store.token_env.as_str().cyan());
    println!("  3. Run: pagesmith get /");

    Ok(())
}
