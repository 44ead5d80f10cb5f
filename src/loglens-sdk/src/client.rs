use std::time::Duration;

use crate::{QueryRequest, QueryResponse, SdkError, StreamInfo};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one server profile. Cheap to clone; the underlying
/// `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct QueryClient {
    base_url: String,
    username: String,
    password: String,
    http: reqwest::Client,
}

impl QueryClient {
    /// Create a client for the given base URL and basic-auth credentials.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            http,
        })
    }

    /// The server this client talks to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a query with `fields=true`, returning the field list and
    /// records in one round trip.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, SdkError> {
        let url = format!("{}/api/v1/query", self.base_url);
        tracing::debug!(%url, query = %request.query, "executing query");
        let resp = self
            .http
            .post(&url)
            .query(&[("fields", "true")])
            .basic_auth(&self.username, Some(&self.password))
            .json(request)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// List the log streams the server exposes.
    pub async fn list_streams(&self) -> Result<Vec<StreamInfo>, SdkError> {
        let url = format!("{}/api/v1/logstream", self.base_url);
        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        handle_response(resp).await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, SdkError> {
    if resp.status().is_success() {
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        let status = resp.status().as_u16();
        let message = resp
            .text()
            .await
            .unwrap_or_default()
            .trim()
            .to_string();
        Err(SdkError::Api { status, message })
    }
}
