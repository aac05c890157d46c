//! API client for the metrics provider query endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use audit_lib::{AuditError, Credentials, MetricsSource, QueryResponse, TimeRange};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Path of the timeseries query endpoint
const QUERY_PATH: &str = "api/v1/query";

/// API client for the metrics provider
pub struct ApiClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Make an authenticated GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .query(params)
            .header("DD-API-KEY", &self.credentials.api_key)
            .header("DD-APPLICATION-KEY", &self.credentials.app_key)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Run a timeseries query over a time range
    pub async fn query_series(&self, query: &str, range: TimeRange) -> Result<QueryResponse> {
        debug!(%query, from = range.from_secs(), to = range.to_secs(), "Querying metrics");
        let params = [
            ("from", range.from_secs().to_string()),
            ("to", range.to_secs().to_string()),
            ("query", query.to_string()),
        ];
        self.get(QUERY_PATH, &params).await
    }
}

#[async_trait]
impl MetricsSource for ApiClient {
    async fn query(&self, query: &str, range: TimeRange) -> audit_lib::Result<QueryResponse> {
        self.query_series(query, range)
            .await
            .map_err(|e| AuditError::fetch(query, format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_lib::AuditWindows;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;

    fn credentials() -> Credentials {
        Credentials::new(Some("api-123".into()), Some("app-456".into())).unwrap()
    }

    fn range() -> TimeRange {
        let now = Utc.timestamp_opt(1_720_000_000, 0).unwrap();
        AuditWindows::ending_at(now, 365, 90).unwrap().recent
    }

    #[tokio::test]
    async fn test_query_sends_credentials_and_range() {
        let mut server = mockito::Server::new_async().await;
        let range = range();
        let mock = server
            .mock("GET", "/api/v1/query")
            .match_header("DD-API-KEY", "api-123")
            .match_header("DD-APPLICATION-KEY", "app-456")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), range.from_secs().to_string()),
                Matcher::UrlEncoded("to".into(), "1720000000".into()),
                Matcher::UrlEncoded(
                    "query".into(),
                    "sum:trace.rack.request.hits{*} by {resource_name}.as_count()".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"ok","series":[{"scope":"resource_name:Home::Index","pointlist":[[1719900000000.0,3.0]]}]}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), credentials(), Duration::from_secs(5)).unwrap();
        let response = client
            .query(
                "sum:trace.rack.request.hits{*} by {resource_name}.as_count()",
                range,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        let series = response.into_series("resource_name");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].resource_key, "Home::Index");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/query")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"errors":["Forbidden"]}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), credentials(), Duration::from_secs(5)).unwrap();
        let err = client.query("sum:x{*}", range()).await.unwrap_err();

        match err {
            AuditError::FetchFailure { reason, .. } => {
                assert!(reason.contains("403"));
                assert!(reason.contains("Forbidden"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_body_is_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), credentials(), Duration::from_secs(5)).unwrap();
        let result = client.query("sum:x{*}", range()).await;
        assert!(matches!(result, Err(AuditError::FetchFailure { .. })));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url", credentials(), Duration::from_secs(5)).is_err());
    }
}
