mod cli;
mod commands;
mod config;
mod logging;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use clinic_client::{ApiClient, ClientConfig};
use clinic_core::DEFAULT_PAGE_SIZE;

use cli::{Cli, Commands};
use commands::resource::CommandContext;
use output::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the command's operation succeeded.
async fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);
    let profile = &cli.profile;

    let Some((kind, args)) = cli.command.resource() else {
        if let Commands::Config(args) = &cli.command {
            commands::config::run(&args.command, profile)?;
        }
        return Ok(true);
    };

    let cfg = config::load_profile(profile)?;
    let server = config::resolve_server(&cli.server, &cfg)?;
    let page_size = cfg.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let format = cli.format.or(cfg.output_format()).unwrap_or_default();

    let mut client_config = ClientConfig::new(&server)
        .with_context(|| format!("Invalid server URL: {server}"))?
        .with_page_size(page_size);
    if let Some(token) = &cfg.token {
        client_config = client_config.with_token(token.clone());
    }
    let client = ApiClient::new(&client_config).context("Failed to build HTTP client")?;
    tracing::debug!(%kind, server = client.base_url(), "running resource command");

    let ctx = CommandContext {
        client: Arc::new(client),
        page_size,
        format,
    };
    let result = commands::resource::run(&ctx, kind, &args.action).await?;
    Ok(!result.is_error())
}
