//! Error model for a sync run.

use jira_api::JiraError;
use thiserror::Error;
use toggl_api::TogglError;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Config and fetch errors abort the run. The rest only abort the entry being synced.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("fetching time entries: {0}")]
    Fetch(#[source] TogglError),
    #[error("listing worklogs on {issue_key}: {source}")]
    Lookup {
        issue_key: String,
        #[source]
        source: JiraError,
    },
    #[error("creating worklog on {issue_key}: {source}")]
    Create {
        issue_key: String,
        #[source]
        source: JiraError,
    },
    #[error("updating worklog {worklog_id} on {issue_key}: {source}")]
    Update {
        issue_key: String,
        worklog_id: String,
        #[source]
        source: JiraError,
    },
    #[error("building http client: {0}")]
    Client(String),
}
