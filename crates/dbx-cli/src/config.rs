//! CLI configuration.
//!
//! Settings come from three places, highest precedence first: command-line
//! flags, environment variables (both handled by clap) and the TOML file
//! at [`CliConfig::default_path`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// CLI configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Workspace base URL (e.g., https://adb-123.azuredatabricks.net).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// OAuth client ID of the service principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// OAuth client secret of the service principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// HTTP request timeout in seconds; unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Loads configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> crate::CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            crate::CliError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Saves configuration to `path`.
    pub fn save(&self, path: &Path) -> crate::CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::CliError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the default configuration file path.
    pub fn default_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            crate::CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".dbx-acl").join("config.toml"))
    }

    /// Gets the configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Builds credentials, preferring `overrides` over file values.
    ///
    /// Every field must end up non-empty.
    pub fn credentials(&self, overrides: &CredentialOverrides) -> crate::CliResult<Credentials> {
        let host = pick(overrides.host.as_deref(), self.host.as_deref(), "host")?;
        let client_id = pick(
            overrides.client_id.as_deref(),
            self.client_id.as_deref(),
            "client_id",
        )?;
        let client_secret = pick(
            overrides.client_secret.as_deref(),
            self.client_secret.as_deref(),
            "client_secret",
        )?;

        Ok(Credentials::new(host, client_id, client_secret))
    }
}

/// Picks the first non-empty value or reports the missing key.
fn pick(flag: Option<&str>, file: Option<&str>, key: &str) -> crate::CliResult<String> {
    flag.or(file)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| crate::CliError::Config(format!("{key} is not set")))
}

/// Credential values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    /// Workspace base URL.
    pub host: Option<String>,
    /// OAuth client ID.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<String>,
}

/// Service principal credentials for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    host: String,
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates credentials. A trailing `/` on the host is dropped.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let host = host.into();
        Self {
            host: host.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Workspace base URL without a trailing slash.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// OAuth client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// OAuth client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_secret(&self.client_secret))
            .finish()
    }
}

/// Masks a secret, keeping at most its first four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    let head: String = secret.chars().take(4).collect();
    format!("{head}****")
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}
