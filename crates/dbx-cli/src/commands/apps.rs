//! App listing.

use dbx_model::{AppList, AppResource};
use serde::Serialize;
use tabled::Tabled;

use crate::config::{Credentials, OutputFormat};
use crate::output::{display_option, output, warning};

use super::{authenticate, AccessToken, ApiClient};

/// Apps collection path.
pub const APPS_PATH: &str = "/api/2.0/apps";

/// App representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AppDisplay {
    /// App name.
    pub name: String,
    /// Public URL.
    #[tabled(display_with = "display_option")]
    pub url: Option<String>,
    /// Creator.
    #[tabled(rename = "Creator", display_with = "display_option")]
    pub creator: Option<String>,
}

impl From<&AppResource> for AppDisplay {
    fn from(app: &AppResource) -> Self {
        Self {
            name: app.name.clone(),
            url: app.extra_str("url").map(str::to_string),
            creator: app.extra_str("creator").map(str::to_string),
        }
    }
}

/// Fetches every registered app.
///
/// Entries without a string `name` are reported and left out. Errors are
/// returned as-is; the caller decides whether to degrade.
pub async fn list_apps(client: &ApiClient, token: &AccessToken) -> crate::CliResult<Vec<AppResource>> {
    let list: AppList = client.get(APPS_PATH, token).await?;
    let (apps, rejected) = list.into_resources();

    for entry in &rejected {
        tracing::warn!(%entry, "app entry without a name");
        warning(&format!("Skipping app entry without a name: {entry}"));
    }
    Ok(apps)
}

/// Runs the apps command.
pub async fn run_apps(
    credentials: &Credentials,
    client: &ApiClient,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let token = authenticate(client, credentials).await?;
    let apps = list_apps(client, &token).await?;
    let rows: Vec<AppDisplay> = apps.iter().map(AppDisplay::from).collect();
    output(&rows, format)
}
