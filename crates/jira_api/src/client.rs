use crate::config::JiraConfig;
use crate::error::{JiraError, Result};
use crate::models::{Worklog, WorklogPage, WorklogPayload};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

const NOTIFY_USERS_QUERY: [(&str, &str); 1] = [("notifyUsers", "false")];

#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Decodes the JSON body of a `GET` on the API path made of `segments`.
    pub async fn get<T>(&self, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.http.get(self.url_for(segments)?).send().await?;
        Self::parse_json(response).await
    }

    /// Sends `body` and accepts only the listed statuses as success.
    pub async fn send_expect_status<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
        accepted: &[StatusCode],
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, self.url_for(segments)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        let status = response.status();
        if accepted.contains(&status) {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, body))
    }

    /// Appends each segment to the API root, percent-encoded.
    fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.config.api_root()).map_err(|err| JiraError::Other(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| JiraError::Other(format!("{} cannot be a base url", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(JiraError::from)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_failure(status, body))
        }
    }

    /// Lists every worklog currently recorded on `issue_key`.
    pub async fn get_worklogs(&self, issue_key: &str) -> Result<Vec<Worklog>> {
        let page: WorklogPage = self.get(&["issue", issue_key, "worklog"]).await?;
        debug!(issue_key, count = page.worklogs.len(), "fetched worklogs");
        Ok(page.worklogs)
    }

    /// Creates a worklog without notifying watchers. Jira answers 201, some proxies 200.
    pub async fn add_worklog(&self, issue_key: &str, payload: &WorklogPayload) -> Result<()> {
        log_payload(payload);
        self.send_expect_status(
            Method::POST,
            &["issue", issue_key, "worklog"],
            &NOTIFY_USERS_QUERY,
            Some(payload),
            &[StatusCode::CREATED, StatusCode::OK],
        )
        .await?;
        info!(issue_key, "created worklog");
        Ok(())
    }

    /// Replaces an existing worklog without notifying watchers.
    pub async fn update_worklog(
        &self,
        issue_key: &str,
        worklog_id: &str,
        payload: &WorklogPayload,
    ) -> Result<()> {
        log_payload(payload);
        self.send_expect_status(
            Method::PUT,
            &["issue", issue_key, "worklog", worklog_id],
            &NOTIFY_USERS_QUERY,
            Some(payload),
            &[StatusCode::OK],
        )
        .await?;
        info!(issue_key, worklog_id, "updated worklog");
        Ok(())
    }
}

fn log_payload(payload: &WorklogPayload) {
    if let Ok(body) = serde_json::to_string(payload) {
        debug!(%body, "worklog payload");
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let credentials = BASE64_STANDARD.encode(format!("{}:{}", config.email, config.api_token));
    let mut auth_value = header_value(format!("Basic {}", credentials))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}

fn classify_failure(status: StatusCode, body: String) -> JiraError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        JiraError::Authentication(format!("Access denied ({})", status))
    } else {
        JiraError::http(status, extract_error_message(&body).unwrap_or(body))
    }
}

/// Pulls the first entry of Jira's `errorMessages` array out of an error body.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("errorMessages")
            .and_then(|messages| messages.get(0))
            .and_then(|message| message.as_str())
            .map(|message| message.to_string())
    })
}
