//! Idempotent worklog upserts keyed by a correlation tag in the comment.

use chrono::{DateTime, Utc};
use jira_api::{JiraClient, WorklogPayload};
use log::{debug, info};
use toggl_api::TimeEntry;

use crate::error::{Result, SyncError};

const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f+0000";

/// What an upsert did for a single time entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated { worklog_id: String },
    SkippedRunning,
}

/// Rounds whole seconds up to whole minutes.
pub fn minutes_spent(duration_seconds: i64) -> i64 {
    if duration_seconds <= 0 {
        return 0;
    }
    (duration_seconds - 1) / 60 + 1
}

pub fn format_started(start: &DateTime<Utc>) -> String {
    start.format(STARTED_FORMAT).to_string()
}

pub fn correlation_tag(entry_id: i64) -> String {
    format!("TogglID: {}", entry_id)
}

/// Tags the comment and drops the issue key when it leads the description.
pub fn worklog_comment(entry: &TimeEntry, issue_key: &str) -> String {
    let description = entry
        .description
        .strip_prefix(issue_key)
        .unwrap_or(&entry.description)
        .trim();
    format!("{} {}", correlation_tag(entry.id), description)
}

pub fn build_payload(entry: &TimeEntry, issue_key: &str) -> WorklogPayload {
    WorklogPayload {
        comment: worklog_comment(entry, issue_key),
        time_spent: format!("{}m", minutes_spent(entry.duration)),
        started: format_started(&entry.start),
        time_spent_seconds: None,
    }
}

pub struct WorklogSync {
    jira: JiraClient,
}

impl WorklogSync {
    pub fn new(jira: JiraClient) -> Self {
        Self { jira }
    }

    /// Creates the worklog for `entry` on `issue_key`, or updates the one already tagged with its id.
    pub async fn upsert(&self, entry: &TimeEntry, issue_key: &str) -> Result<UpsertOutcome> {
        if entry.is_running() {
            info!("Skipping running timer: {}", entry.description);
            return Ok(UpsertOutcome::SkippedRunning);
        }

        let payload = build_payload(entry, issue_key);
        let tag = correlation_tag(entry.id);

        let worklogs = self
            .jira
            .get_worklogs(issue_key)
            .await
            .map_err(|source| SyncError::Lookup {
                issue_key: issue_key.to_string(),
                source,
            })?;

        match worklogs.iter().find(|worklog| worklog.comment_contains(&tag)) {
            Some(existing) => {
                debug!(
                    "{} already logged as worklog {} on {}",
                    tag, existing.id, issue_key
                );
                self.jira
                    .update_worklog(issue_key, &existing.id, &payload)
                    .await
                    .map_err(|source| SyncError::Update {
                        issue_key: issue_key.to_string(),
                        worklog_id: existing.id.clone(),
                        source,
                    })?;
                Ok(UpsertOutcome::Updated {
                    worklog_id: existing.id.clone(),
                })
            }
            None => {
                self.jira
                    .add_worklog(issue_key, &payload)
                    .await
                    .map_err(|source| SyncError::Create {
                        issue_key: issue_key.to_string(),
                        source,
                    })?;
                Ok(UpsertOutcome::Created)
            }
        }
    }
}
