//! Configuration management commands.

use std::path::Path;

use crate::cli::ConfigCommand;
use crate::config::{mask_secret, OutputFormat};
use crate::output::{info, success};
use crate::CliConfig;

/// Runs a config command against the file at `path`.
pub fn run_config(cmd: ConfigCommand, config: &mut CliConfig, path: &Path) -> crate::CliResult<()> {
    match cmd {
        ConfigCommand::Show => {
            show_config(config, path);
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            set_config(config, &key, &value)?;
            config.save(path)?;
            success(&format!("Set {key} in {}", path.display()));
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig, path: &Path) {
    info(&format!("Configuration file: {}", path.display()));
    println!();
    println!("host: {}", config.host.as_deref().unwrap_or("(unset)"));
    println!("client_id: {}", config.client_id.as_deref().unwrap_or("(unset)"));
    match &config.client_secret {
        Some(secret) => println!("client_secret: {}", mask_secret(secret)),
        None => println!("client_secret: (unset)"),
    }
    match config.timeout_secs {
        Some(secs) => println!("timeout_secs: {secs}"),
        None => println!("timeout_secs: (none)"),
    }
    println!("output_format: {:?}", config.output_format);
}

/// Sets a configuration value in memory.
///
/// An empty value or `none` clears optional keys. Client credentials are
/// never written by the tool; they come from flags, the environment or a
/// hand-edited file.
pub fn set_config(config: &mut CliConfig, key: &str, value: &str) -> crate::CliResult<()> {
    let optional = if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    };

    match key {
        "host" => config.host = optional,
        "client_id" | "client_secret" => {
            return Err(crate::CliError::InvalidArgument(format!(
                "{key} is not stored by dbx-acl; pass --{flag} or set DATABRICKS_{env}",
                flag = key.replace('_', "-"),
                env = key.to_uppercase()
            )));
        }
        "timeout_secs" | "timeout" => {
            config.timeout_secs = optional
                .map(|v| {
                    v.parse::<u64>().map_err(|_| {
                        crate::CliError::InvalidArgument(format!(
                            "timeout_secs must be a whole number of seconds, got {v}"
                        ))
                    })
                })
                .transpose()?;
        }
        "output_format" | "output" => {
            config.output_format = match value.to_lowercase().as_str() {
                "table" => OutputFormat::Table,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(crate::CliError::InvalidArgument(format!(
                        "Unknown output format: {value}. Supported: table, json"
                    )));
                }
            };
        }
        _ => {
            return Err(crate::CliError::InvalidArgument(format!(
                "Unknown configuration key: {key}. Known keys: host, timeout_secs, output_format"
            )));
        }
    }
    Ok(())
}
