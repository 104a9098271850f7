use anyhow::{Context, Result};
use clap::Parser;
use recruiter_client::cli::{handle_command, Cli};
use recruiter_client::core::ConfigManager;
use recruiter_client::AuthSession;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("Failed to initialize logging")
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigManager::load()?.with_cli_overrides(cli.api_url, cli.token_path);
    init_logging(&config.environment.log_path)?;
    config.log_source();

    let client = config.build_client()?;
    let mut session = AuthSession::new(client);

    let mut stdout = std::io::stdout().lock();
    handle_command(cli.command, &mut session, &mut stdout).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
