//! The strip workflow: authenticate, list apps, then for each app read its
//! access-control list, drop the `account users` grant, reduce the rest
//! and write the list back.
//!
//! Only authentication and transport faults end the run. A listing
//! failure means zero apps; a permission read failure means an empty list,
//! which is still written back. A permissions answer that is JSON but not
//! an access-control list leaves the app untouched. A failed write is
//! reported and the next app is processed.

use dbx_model::{normalize, strip_group, AccessControlUpdate, AppResource, ACCOUNT_USERS_GROUP};

use crate::config::Credentials;
use crate::CliError;
use crate::output::{detail, info, success, warning};

use super::{authenticate, fetch_permissions, list_apps, write_permissions, AccessToken, ApiClient};

/// Strip workflow options.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripOptions {
    /// Skip the write-back.
    pub dry_run: bool,
}

/// What happened to one app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppOutcome {
    /// The replacement list was accepted.
    Updated,
    /// The replacement list was rejected or the answer was unreadable.
    WriteFailed,
    /// Nothing was written.
    DryRun,
    /// The current list had an unexpected shape; nothing was written.
    Skipped,
}

/// Per-app result of [`rewrite_permissions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppReport {
    /// Whether the current list could not be read and was taken as empty.
    pub read_failed: bool,
    /// Number of `account users` entries removed.
    pub removed: usize,
    /// Write-back result.
    pub outcome: AppOutcome,
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Apps returned by the listing.
    pub apps: usize,
    /// Apps whose list was written back successfully.
    pub updated: usize,
    /// Apps whose list could not be read.
    pub failed_reads: usize,
    /// Apps whose write-back failed.
    pub failed_writes: usize,
    /// Apps left untouched because their list had an unexpected shape.
    pub skipped: usize,
    /// `account users` entries removed across all apps.
    pub removed_grants: usize,
}

impl RunSummary {
    fn record(&mut self, report: AppReport) {
        self.apps += 1;
        self.removed_grants += report.removed;
        if report.read_failed {
            self.failed_reads += 1;
        }
        match report.outcome {
            AppOutcome::Updated => self.updated += 1,
            AppOutcome::WriteFailed => self.failed_writes += 1,
            AppOutcome::Skipped => self.skipped += 1,
            AppOutcome::DryRun => {}
        }
    }
}

/// Rewrites the access-control list of one app.
///
/// Returns `Err` only for faults that must end the run.
pub async fn rewrite_permissions(
    client: &ApiClient,
    token: &AccessToken,
    app: &AppResource,
    options: StripOptions,
) -> crate::CliResult<AppReport> {
    let name = app.name.as_str();

    // An unreadable list is indistinguishable from an empty one from here on.
    let (original, read_failed) = match fetch_permissions(client, token, app).await {
        Ok(entries) => (entries, false),
        Err(e @ CliError::Shape { .. }) => {
            tracing::warn!(app = name, status = ?e.status(), "unexpected permissions payload");
            warning(&format!("Skipping app {name}, its permissions could not be interpreted: {e}"));
            return Ok(AppReport {
                read_failed: false,
                removed: 0,
                outcome: AppOutcome::Skipped,
            });
        }
        Err(e) if e.is_degradable() => {
            tracing::warn!(app = name, status = ?e.status(), "permission read failed");
            warning(&format!("Failed to get permissions for app {name}: {e}"));
            (Vec::new(), true)
        }
        Err(e) => return Err(e),
    };
    info(&format!("App {name}"));
    detail("original", &original);

    let before = original.len();
    let kept = strip_group(original, ACCOUNT_USERS_GROUP);
    let removed = before - kept.len();
    detail("filtered", &kept);

    let update = AccessControlUpdate::from(normalize(&kept));
    detail("extracted", &update.access_control_list);

    if options.dry_run {
        info(&format!("Dry run: not updating permissions for app {name}"));
        return Ok(AppReport {
            read_failed,
            removed,
            outcome: AppOutcome::DryRun,
        });
    }

    let outcome = match write_permissions(client, token, app, &update).await {
        Ok(updated) => {
            success(&format!("Updated permissions for app {name}"));
            detail("updated", &updated);
            AppOutcome::Updated
        }
        Err(e) if e.is_degradable() => {
            tracing::warn!(app = name, status = ?e.status(), "permission write failed");
            warning(&format!("Failed to update permissions for app {name}: {e}"));
            AppOutcome::WriteFailed
        }
        Err(e) => return Err(e),
    };

    Ok(AppReport {
        read_failed,
        removed,
        outcome,
    })
}

/// Runs the strip workflow end to end.
pub async fn run_strip(
    credentials: &Credentials,
    client: &ApiClient,
    options: StripOptions,
) -> crate::CliResult<RunSummary> {
    let token = authenticate(client, credentials).await?;

    let apps = match list_apps(client, &token).await {
        Ok(apps) => apps,
        Err(e) if e.is_degradable() => {
            tracing::warn!(status = ?e.status(), "app listing failed");
            warning(&format!("Failed to get apps: {e}"));
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    let names: Vec<&str> = apps.iter().map(|app| app.name.as_str()).collect();
    info(&format!("Found {} app(s)", apps.len()));
    detail("apps", &names);

    let mut summary = RunSummary::default();
    for app in &apps {
        let report = rewrite_permissions(client, &token, app, options).await?;
        summary.record(report);
    }

    info(&format!(
        "Processed {} app(s): {} updated, {} failed update(s), {} failed read(s), {} skipped, {} grant(s) removed",
        summary.apps,
        summary.updated,
        summary.failed_writes,
        summary.failed_reads,
        summary.skipped,
        summary.removed_grants
    ));
    Ok(summary)
}
