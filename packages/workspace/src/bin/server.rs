use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pagesmith_workspace::{http, ContentService, WorkspaceConfig, DEFAULT_CONFIG_NAME};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagesmith-server")]
#[command(about = "Serve page content editing over HTTP", long_about = None)]
#[command(version)]
struct Args {
    /// Config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
    config: PathBuf,

    /// Host to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = WorkspaceConfig::load_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    let service = ContentService::from_config(&config)?;
    tracing::info!(
        pages = service.pages().len(),
        owner = %config.store.owner,
        repo = %config.store.repo,
        branch = %config.store.branch,
        "content service ready"
    );

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, http::router(service)).await?;
    Ok(())
}
