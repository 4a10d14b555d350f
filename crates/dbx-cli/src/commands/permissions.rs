//! App permission reads and writes.

use dbx_model::{
    normalize, AccessControlList, AccessControlUpdate, AppResource, PermissionEntry,
    ACCOUNT_USERS_GROUP,
};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use crate::config::{Credentials, OutputFormat};
use crate::output::{display_option, output};

use super::{authenticate, AccessToken, ApiClient};

/// Path of an app's permissions object.
#[must_use]
pub fn permissions_path(app: &str) -> String {
    format!("/api/2.0/permissions/apps/{app}")
}

/// Permission entry representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct EntryDisplay {
    /// Principal kind.
    #[tabled(rename = "Kind")]
    pub kind: &'static str,
    /// Principal name.
    #[tabled(rename = "Principal", display_with = "display_option")]
    pub principal: Option<String>,
    /// First permission level.
    #[tabled(rename = "Level", display_with = "display_option")]
    pub permission_level: Option<String>,
    /// Whether `strip` removes this entry.
    #[tabled(rename = "Stripped")]
    pub stripped: bool,
}

impl From<&PermissionEntry> for EntryDisplay {
    fn from(entry: &PermissionEntry) -> Self {
        let kind = if entry.user_name.is_some() {
            "user"
        } else if entry.group_name.is_some() {
            "group"
        } else if entry.service_principal_name.is_some() {
            "service principal"
        } else {
            "unknown"
        };

        Self {
            kind,
            principal: entry.principal().map(str::to_string),
            permission_level: entry.first_permission_level().map(str::to_string),
            stripped: entry.is_group(ACCOUNT_USERS_GROUP),
        }
    }
}

/// Fetches the access-control list of one app.
///
/// A body without `access_control_list` yields an empty list.
pub async fn fetch_permissions(
    client: &ApiClient,
    token: &AccessToken,
    app: &AppResource,
) -> crate::CliResult<Vec<PermissionEntry>> {
    let acl: AccessControlList = client.get(&permissions_path(&app.name), token).await?;
    Ok(acl.access_control_list)
}

/// Replaces the access-control list of one app and returns the echoed body.
pub async fn write_permissions(
    client: &ApiClient,
    token: &AccessToken,
    app: &AppResource,
    update: &AccessControlUpdate,
) -> crate::CliResult<Value> {
    client.put(&permissions_path(&app.name), token, update).await
}

/// Runs the permissions command.
pub async fn run_permissions(
    credentials: &Credentials,
    client: &ApiClient,
    app: &str,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let token = authenticate(client, credentials).await?;
    let entries = fetch_permissions(client, &token, &AppResource::new(app)).await?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<EntryDisplay> = entries.iter().map(EntryDisplay::from).collect();
            output(&rows, format)
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&normalize(&entries))?);
            Ok(())
        }
    }
}
