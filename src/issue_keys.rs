//! Issue key extraction from free-text time entry descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_ISSUE_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+-\d+)").expect("invalid issue key regex"));

/// Finds issue keys, optionally restricted to an allow-list of project prefixes.
///
/// Without an allow-list only a key leading the description is recognised.
/// With one, every `PREFIX-NUMBER` occurrence of an allowed prefix is returned
/// in order of appearance.
#[derive(Debug, Clone)]
pub struct IssueKeyMatcher {
    allow_list: Vec<String>,
    pattern: Option<Regex>,
}

impl IssueKeyMatcher {
    pub fn new(allow_list: &[String]) -> Result<Self, regex::Error> {
        let pattern = if allow_list.is_empty() {
            None
        } else {
            let alternatives = allow_list
                .iter()
                .map(|key| regex::escape(key))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?:{})-\d+", alternatives))?)
        };
        Ok(Self {
            allow_list: allow_list.to_vec(),
            pattern,
        })
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    pub fn extract(&self, description: &str) -> Vec<String> {
        match &self.pattern {
            Some(pattern) => pattern
                .find_iter(description)
                .map(|found| found.as_str().to_string())
                .collect(),
            None => LEADING_ISSUE_KEY_REGEX
                .captures(description)
                .and_then(|captures| captures.get(1))
                .map(|found| vec![found.as_str().to_string()])
                .unwrap_or_default(),
        }
    }
}
