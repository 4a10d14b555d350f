//! # dbx-acl
//!
//! Removes the "account users" grant from every workspace app.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use dbx_cli::{
    cli::{Cli, Command},
    commands::{run_apps, run_config, run_permissions, run_strip, ApiClient, StripOptions},
    config::{CliConfig, CredentialOverrides},
    output::error,
    CliResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "dbx_cli=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => CliConfig::default_path()?,
    };
    let mut config = CliConfig::load(&config_path)?;
    let format = cli.output.unwrap_or(config.output_format);
    let overrides = CredentialOverrides::from(cli.credentials);

    match cli.command {
        Command::Config(cmd) => run_config(cmd, &mut config, &config_path),
        Command::Strip(args) => {
            let credentials = config.credentials(&overrides)?;
            let client = ApiClient::new(&credentials, config.timeout())?;
            let options = StripOptions {
                dry_run: args.dry_run,
            };
            run_strip(&credentials, &client, options).await.map(|_| ())
        }
        Command::Apps => {
            let credentials = config.credentials(&overrides)?;
            let client = ApiClient::new(&credentials, config.timeout())?;
            run_apps(&credentials, &client, format).await
        }
        Command::Permissions { app } => {
            let credentials = config.credentials(&overrides)?;
            let client = ApiClient::new(&credentials, config.timeout())?;
            run_permissions(&credentials, &client, &app, format).await
        }
    }
}
