use crate::config::{TogglConfig, API_TOKEN_PASSWORD};
use crate::error::{Result, TogglError};
use crate::models::TimeEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, info};

#[derive(Clone)]
pub struct TogglClient {
    http: HttpClient,
    config: TogglConfig,
}

impl TogglClient {
    pub fn new(config: TogglConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Fetches the entries started between `start` and the current instant.
    pub async fn time_entries_since(&self, start: DateTime<Utc>) -> Result<Vec<TimeEntry>> {
        self.time_entries(start, Utc::now()).await
    }

    /// Fetches the entries started in `[start, end]`. The endpoint is not paginated.
    pub async fn time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        let start_date = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end_date = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        info!(%start_date, %end_date, "fetching time entries");

        let response = self
            .http
            .get(self.url_for("me/time_entries"))
            .basic_auth(&self.config.api_token, Some(API_TOKEN_PASSWORD))
            .query(&[("start_date", &start_date), ("end_date", &end_date)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(classify_failure(status, body));
        }
        debug!(%body, "time entries response");

        let entries: Vec<TimeEntry> = serde_json::from_str(&body)?;
        info!(count = entries.len(), "found time entries");
        for entry in &entries {
            debug!(
                id = entry.id,
                description = %entry.description,
                duration = entry.duration,
                start = %entry.start.to_rfc3339(),
                "time entry"
            );
        }
        Ok(entries)
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }
}

fn build_http_client(config: &TogglConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|err| TogglError::Other(err.to_string()))?,
    );

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| TogglError::Other(err.to_string()))
}

fn classify_failure(status: StatusCode, body: String) -> TogglError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        TogglError::Authentication(format!("Access denied ({})", status))
    } else {
        TogglError::Http {
            status,
            message: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    const AUTH_HEADER: &str = "Basic dG9nZ2wtdG9rZW46YXBpX3Rva2Vu";

    fn client_for(server: &mockito::ServerGuard) -> TogglClient {
        let config = TogglConfig::new("toggl-token").with_base_url(server.url());
        TogglClient::new(config).expect("client should build")
    }

    #[tokio::test]
    async fn time_entries_sends_range_and_token_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/me/time_entries")
            .match_header("authorization", AUTH_HEADER)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2024-03-01T00:00:00Z".into()),
                Matcher::UrlEncoded("end_date".into(), "2024-03-03T00:00:00Z".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":1951596187,"description":"ISSUE-52 doing work","start":"2024-03-01T09:00:00Z","stop":"2024-03-01T10:00:00Z","duration":3600,"workspace_id":1391549},
                    {"id":1951664141,"description":"ISSUE-112 daily","start":"2024-03-01T10:00:00Z","stop":"2024-03-01T11:00:00Z","duration":3600,"workspace_id":1391549,"project_id":42}
                ]"#,
            )
            .create_async()
            .await;

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();
        let entries = client_for(&server)
            .time_entries(start, end)
            .await
            .expect("fetch should succeed");

        mock.assert_async().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "ISSUE-52 doing work");
        assert_eq!(entries[1].project_id, Some(42));
    }

    #[tokio::test]
    async fn time_entries_since_queries_until_now() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/me/time_entries")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2024-03-01T00:00:00Z".into()),
                Matcher::Regex("end_date=".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let entries = client_for(&server)
            .time_entries_since(start)
            .await
            .expect("empty list is fine");

        mock.assert_async().await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn non_ok_status_is_an_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/me/time_entries")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server)
            .time_entries_since(Utc::now())
            .await
            .expect_err("500 must fail");

        match err {
            TogglError::Http { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forbidden_is_an_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/me/time_entries")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = client_for(&server)
            .time_entries_since(Utc::now())
            .await
            .expect_err("403 must fail");

        assert!(matches!(err, TogglError::Authentication(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/me/time_entries")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"not":"a list"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .time_entries_since(Utc::now())
            .await
            .expect_err("object body must fail");

        assert!(matches!(err, TogglError::Serialization(_)));
    }
}
