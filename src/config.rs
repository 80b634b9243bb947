//! Environment-backed runtime settings for a sync pass.

use std::env;
use std::fmt;

use jira_api::JiraConfig;
use thiserror::Error;
use toggl_api::TogglConfig;

use crate::issue_keys::IssueKeyMatcher;

pub const TOGGL_API_TOKEN: &str = "TOGGL_API_TOKEN";
pub const JIRA_HOST: &str = "JIRA_HOST";
pub const JIRA_EMAIL: &str = "JIRA_EMAIL";
pub const JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const JIRA_PROJECTS: &str = "JIRA_PROJECTS";
pub const TOGGL_API_URL: &str = "TOGGL_API_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid JIRA_PROJECTS pattern: {0}")]
    InvalidProjects(String),
}

impl From<regex::Error> for ConfigError {
    fn from(err: regex::Error) -> Self {
        ConfigError::InvalidProjects(err.to_string())
    }
}

/// Credentials and filters needed to talk to both services.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub toggl_api_token: String,
    pub toggl_api_url: Option<String>,
    pub jira_host: String,
    pub jira_email: String,
    pub jira_api_token: String,
    pub jira_projects: Vec<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            toggl_api_token: required(TOGGL_API_TOKEN)?,
            jira_host: required(JIRA_HOST)?,
            jira_email: required(JIRA_EMAIL)?,
            jira_api_token: required(JIRA_API_TOKEN)?,
            toggl_api_url: optional(TOGGL_API_URL),
            jira_projects: optional(JIRA_PROJECTS)
                .map(|raw| parse_allow_list(&raw))
                .unwrap_or_default(),
        })
    }

    /// Compiles the issue key matcher for the configured project allow-list.
    pub fn issue_key_matcher(&self) -> Result<IssueKeyMatcher, ConfigError> {
        Ok(IssueKeyMatcher::new(&self.jira_projects)?)
    }

    pub fn toggl_config(&self) -> TogglConfig {
        let config = TogglConfig::new(self.toggl_api_token.clone());
        match &self.toggl_api_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }

    pub fn jira_config(&self) -> JiraConfig {
        JiraConfig::new(
            &self.jira_host,
            self.jira_email.clone(),
            self.jira_api_token.clone(),
        )
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("toggl_api_token", &"<redacted>")
            .field("toggl_api_url", &self.toggl_api_url)
            .field("jira_host", &self.jira_host)
            .field("jira_email", &self.jira_email)
            .field("jira_api_token", &"<redacted>")
            .field("jira_projects", &self.jira_projects)
            .finish()
    }
}

/// Splits a comma-separated project list, dropping blank items.
pub fn parse_allow_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (TOGGL_API_TOKEN, "toggl-token"),
            (JIRA_HOST, "acme.atlassian.net"),
            (JIRA_EMAIL, "me@acme.io"),
            (JIRA_API_TOKEN, "jira-token"),
        ]
    }

    #[test]
    fn loads_required_values_without_project_filter() {
        let settings = Settings::from_lookup(lookup_from(&complete())).expect("settings load");
        assert_eq!(settings.toggl_api_token, "toggl-token");
        assert_eq!(settings.jira_host, "acme.atlassian.net");
        assert!(settings.jira_projects.is_empty());
        assert!(settings.toggl_api_url.is_none());
    }

    #[test]
    fn missing_value_names_the_variable() {
        for absent in [TOGGL_API_TOKEN, JIRA_HOST, JIRA_EMAIL, JIRA_API_TOKEN] {
            let pairs: Vec<_> = complete().into_iter().filter(|(key, _)| *key != absent).collect();
            let err = Settings::from_lookup(lookup_from(&pairs)).expect_err("must fail");
            assert_eq!(err, ConfigError::Missing(absent));
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let pairs: Vec<_> = complete()
            .into_iter()
            .map(|(key, value)| if key == JIRA_EMAIL { (key, "   ") } else { (key, value) })
            .collect();
        let err = Settings::from_lookup(lookup_from(&pairs)).expect_err("blank email must fail");
        assert_eq!(err, ConfigError::Missing(JIRA_EMAIL));
    }

    #[test]
    fn project_list_is_split_and_trimmed() {
        let mut pairs = complete();
        pairs.push((JIRA_PROJECTS, " ISSUE, OPS,,  "));
        let settings = Settings::from_lookup(lookup_from(&pairs)).expect("settings load");
        assert_eq!(settings.jira_projects, vec!["ISSUE", "OPS"]);
    }

    #[test]
    fn parse_allow_list_handles_empty_input() {
        assert!(parse_allow_list("").is_empty());
        assert!(parse_allow_list(" , ,").is_empty());
        assert_eq!(parse_allow_list("A, B,,C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn client_configs_carry_overrides() {
        let mut pairs = complete();
        pairs.push((TOGGL_API_URL, "http://127.0.0.1:9000"));
        let settings = Settings::from_lookup(lookup_from(&pairs)).expect("settings load");

        assert_eq!(settings.toggl_config().base_url, "http://127.0.0.1:9000");
        assert_eq!(
            settings.jira_config().api_root(),
            "https://acme.atlassian.net/rest/api/latest/"
        );
    }

    #[test]
    fn matcher_follows_project_list() {
        let mut pairs = complete();
        pairs.push((JIRA_PROJECTS, "OPS"));
        let settings = Settings::from_lookup(lookup_from(&pairs)).expect("settings load");
        let matcher = settings.issue_key_matcher().expect("matcher builds");
        assert_eq!(matcher.extract("ISSUE-1 then OPS-2"), vec!["OPS-2"]);
    }

    #[test]
    fn pattern_failures_name_the_project_variable() {
        let err = ConfigError::from(regex::Error::CompiledTooBig(10));
        assert!(matches!(err, ConfigError::InvalidProjects(_)));
        assert!(err.to_string().starts_with("invalid JIRA_PROJECTS pattern: "));
    }

    #[test]
    fn debug_output_hides_tokens() {
        let settings = Settings::from_lookup(lookup_from(&complete())).expect("settings load");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("toggl-token"));
        assert!(!rendered.contains("jira-token"));
    }
}
