//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{CredentialOverrides, OutputFormat};

/// dbx-acl - Removes the "account users" grant from workspace apps.
#[derive(Debug, Parser)]
#[command(name = "dbx-acl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace credentials (override the config file).
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Configuration file path.
    #[arg(long, env = "DBX_ACL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Credential arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Workspace base URL.
    #[arg(long, env = "DATABRICKS_HOST", global = true)]
    pub host: Option<String>,

    /// OAuth client ID of the service principal.
    #[arg(long, env = "DATABRICKS_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// OAuth client secret of the service principal.
    #[arg(long, env = "DATABRICKS_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,
}

impl From<CredentialArgs> for CredentialOverrides {
    fn from(args: CredentialArgs) -> Self {
        Self {
            host: args.host,
            client_id: args.client_id,
            client_secret: args.client_secret,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Strip the "account users" grant from every app and write the lists back.
    Strip(StripArgs),

    /// List registered apps.
    Apps,

    /// Show the access-control list of one app.
    Permissions {
        /// App name.
        app: String,
    },

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Strip arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct StripArgs {
    /// Show what would be written without sending any update.
    #[arg(long)]
    pub dry_run: bool,
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Print the configuration file path.
    Path,
}
