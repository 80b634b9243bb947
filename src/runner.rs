//! One sync pass: fetch the recent time entries and upsert a worklog for each.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use toggl_api::{TimeEntry, TogglClient};

use crate::error::{Result, SyncError};
use crate::issue_keys::IssueKeyMatcher;
use crate::worklog::{UpsertOutcome, WorklogSync};

/// Look-back window of every pass. Runs overlap, so failed entries get retried next time.
pub const SYNC_WINDOW_HOURS: i64 = 48;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct SyncRunner {
    toggl: TogglClient,
    worklogs: WorklogSync,
    matcher: IssueKeyMatcher,
}

impl SyncRunner {
    pub fn new(toggl: TogglClient, worklogs: WorklogSync, matcher: IssueKeyMatcher) -> Self {
        if matcher.allow_list().is_empty() {
            info!("No Jira project filter configured, accepting all projects");
        } else {
            info!("Supported Jira projects: {}", matcher.allow_list().join(", "));
        }
        Self {
            toggl,
            worklogs,
            matcher,
        }
    }

    /// Syncs the entries of the window ending at `now`; only a failed fetch aborts the pass.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SyncReport> {
        let since = now - Duration::hours(SYNC_WINDOW_HOURS);
        info!("Starting sync from {}", since.to_rfc3339());

        let entries = self
            .toggl
            .time_entries(since, now)
            .await
            .map_err(SyncError::Fetch)?;

        let mut report = SyncReport {
            fetched: entries.len(),
            ..SyncReport::default()
        };
        if entries.is_empty() {
            info!("No time entries found in the last {} hours", SYNC_WINDOW_HOURS);
            return Ok(report);
        }

        info!("Processing {} time entries", entries.len());
        for entry in &entries {
            self.sync_entry(entry, &mut report).await;
        }
        Ok(report)
    }

    async fn sync_entry(&self, entry: &TimeEntry, report: &mut SyncReport) {
        let keys = self.matcher.extract(&entry.description);
        let Some(issue_key) = keys.first() else {
            info!("No supported issue found in description: {}", entry.description);
            report.skipped += 1;
            return;
        };
        if keys.len() > 1 {
            debug!(
                "Entry {} references {} issues, logging to {} only",
                entry.id,
                keys.len(),
                issue_key
            );
        }

        match self.worklogs.upsert(entry, issue_key).await {
            Ok(UpsertOutcome::Created) => {
                info!("Created worklog on {} for entry: {}", issue_key, entry.description);
                report.created += 1;
            }
            Ok(UpsertOutcome::Updated { worklog_id }) => {
                info!(
                    "Updated worklog {} on {} for entry: {}",
                    worklog_id, issue_key, entry.description
                );
                report.updated += 1;
            }
            Ok(UpsertOutcome::SkippedRunning) => report.skipped += 1,
            Err(err) => {
                warn!("Error adding work log for entry {}: {}", entry.description, err);
                report.failed += 1;
            }
        }
    }
}
