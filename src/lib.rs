//! Mirrors Toggl Track time entries into Jira worklogs.
//!
//! Every pass re-reads the last 48 hours of entries and upserts one worklog
//! per finished entry on the first issue key found in its description. The
//! worklog comment carries a `TogglID: <id>` tag, which is how later passes
//! find and update the same worklog instead of creating a duplicate.

use chrono::Utc;
use jira_api::JiraClient;
use log::info;
use toggl_api::TogglClient;

pub mod config;
pub mod error;
pub mod issue_keys;
pub mod runner;
pub mod worklog;

pub use config::{ConfigError, Settings};
pub use error::{Result, SyncError};
pub use issue_keys::IssueKeyMatcher;
pub use runner::{SyncReport, SyncRunner, SYNC_WINDOW_HOURS};
pub use worklog::{UpsertOutcome, WorklogSync};

/// Wires both clients from `settings` into a runner.
pub fn build_runner(settings: &Settings) -> Result<SyncRunner> {
    let toggl = TogglClient::new(settings.toggl_config())
        .map_err(|err| SyncError::Client(err.to_string()))?;
    let jira = JiraClient::new(settings.jira_config())
        .map_err(|err| SyncError::Client(err.to_string()))?;
    let matcher = settings.issue_key_matcher()?;
    Ok(SyncRunner::new(toggl, WorklogSync::new(jira), matcher))
}

/// Loads settings from the environment (and `.env`, when present) and runs one pass.
pub async fn run() -> Result<SyncReport> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            log::warn!("Ignoring unreadable .env file: {}", err);
        }
    }

    let settings = Settings::from_env()?;
    let runner = build_runner(&settings)?;
    let report = runner.run(Utc::now()).await?;
    info!(
        "Sync finished: {} fetched, {} created, {} updated, {} skipped, {} failed",
        report.fetched, report.created, report.updated, report.skipped, report.failed
    );
    Ok(report)
}
