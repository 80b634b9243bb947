use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope of `GET issue/{key}/worklog`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorklogPage {
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_text_field")]
    pub comment: Option<String>,
    #[serde(default)]
    pub time_spent_seconds: i64,
}

impl Worklog {
    /// Returns true when the comment contains `needle` verbatim.
    pub fn comment_contains(&self, needle: &str) -> bool {
        self.comment
            .as_deref()
            .map(|comment| comment.contains(needle))
            .unwrap_or(false)
    }
}

/// Body of a worklog create or update request.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPayload {
    pub comment: String,
    pub time_spent: String,
    pub started: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<i64>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported worklog id: {}",
            other
        ))),
    }
}

/// Accepts plain-text comments as well as rich document bodies, which are kept as their JSON text.
fn deserialize_text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|val| match val {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => serde_json::to_string(&other).ok(),
    }))
}
