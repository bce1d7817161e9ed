mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    extract, get, init, patch, save, scaffold, ExtractArgs, GetArgs, InitArgs, PatchArgs,
    SaveArgs, ScaffoldArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagesmith CLI - edit page content inside component source
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a pagesmith.config.json
    Init(InitArgs),

    /// Print the editable region of a local component file
    Extract(ExtractArgs),

    /// Replace the editable region of a local component file
    Patch(PatchArgs),

    /// Print a new component wrapping the given content
    Scaffold(ScaffoldArgs),

    /// Fetch a page's editable content from the store
    Get(GetArgs),

    /// Save a page's content to the store
    Save(SaveArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Extract(args) => extract(args, &cwd),
                Command::Patch(args) => patch(args, &cwd),
                Command::Scaffold(args) => scaffold(args, &cwd),
                Command::Get(args) => get(args, &cwd),
                Command::Save(args) => save(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
