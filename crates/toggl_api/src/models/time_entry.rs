use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::Deserialize;

/// A tracked time entry as returned by `GET /me/time_entries`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    /// Seconds; negative while the timer is still running.
    pub duration: i64,
    #[serde(default)]
    pub workspace_id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
}

impl TimeEntry {
    /// Running timers report a negative duration and no stop time yet.
    pub fn is_running(&self) -> bool {
        self.duration < 1 || self.stop.is_none()
    }
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_finished_entry() {
        let entry: TimeEntry = serde_json::from_value(json!({
            "id": 1951596187,
            "workspace_id": 1391549,
            "project_id": null,
            "description": "ISSUE-52 doing work",
            "start": "2024-03-01T09:00:00+01:00",
            "stop": "2024-03-01T10:00:00+01:00",
            "duration": 3600,
            "tags": []
        }))
        .expect("entry decodes");

        assert_eq!(entry.id, 1951596187);
        assert_eq!(entry.workspace_id, 1391549);
        assert_eq!(entry.project_id, None);
        assert_eq!(entry.start, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        assert!(!entry.is_running());
    }

    #[test]
    fn running_entry_has_no_stop_and_null_description() {
        let entry: TimeEntry = serde_json::from_value(json!({
            "id": 7,
            "workspace_id": 1,
            "description": null,
            "start": "2024-03-01T09:00:00Z",
            "stop": null,
            "duration": -1709283600
        }))
        .expect("running entry decodes");

        assert_eq!(entry.description, "");
        assert!(entry.stop.is_none());
        assert!(entry.is_running());
    }

    #[test]
    fn zero_duration_counts_as_running() {
        let entry: TimeEntry = serde_json::from_value(json!({
            "id": 8,
            "description": "ISSUE-1",
            "start": "2024-03-01T09:00:00Z",
            "stop": "2024-03-01T09:00:00Z",
            "duration": 0
        }))
        .expect("entry decodes");

        assert!(entry.is_running());
    }
}
