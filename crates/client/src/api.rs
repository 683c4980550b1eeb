//! HTTP client for the vidgen server.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vidgen_core::job::{JobRecord, TaskSnapshot};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from talking to the vidgen server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL cannot carry a request path.
    #[error("Invalid server URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP request itself failed (network, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {message}")]
    Api {
        status: u16,
        /// Machine-readable code from the error body, when present.
        code: Option<String>,
        message: String,
    },
}

/// Error body shape produced by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    url: &'a str,
}

/// Thin wrapper over the `/api/v1/tasks` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl ApiClient {
    /// Build a client for the server at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_client(client, base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let base = reqwest::Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(ClientError::InvalidBaseUrl(base_url))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// POST /api/v1/tasks
    pub async fn submit(&self, image_url: &str) -> Result<JobRecord, ClientError> {
        let response = self
            .client
            .post(self.endpoint(&[]))
            .json(&SubmitBody { url: image_url })
            .send()
            .await?;
        let record: JobRecord = parse_response(response).await?;

        tracing::debug!(job_id = %record.id, status = %record.status, "Task submitted");
        Ok(record)
    }

    /// GET /api/v1/tasks
    pub async fn list(&self) -> Result<Vec<JobRecord>, ClientError> {
        let response = self.client.get(self.endpoint(&[])).send().await?;
        parse_response(response).await
    }

    /// GET /api/v1/tasks/{id}
    pub async fn get(&self, id: &str) -> Result<TaskSnapshot, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&[id]))
            .send()
            .await?;
        parse_response(response).await
    }

    /// `{base}/api/v1/tasks` followed by `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base.clone();
        // `with_client` rejects bases that cannot take path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["api", "v1", "tasks"])
                .extend(segments);
        }
        url
    }
}

/// Decode a 2xx body as `T`, or turn the server's error body into
/// [`ClientError::Api`].
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.code, body.error),
        Err(_) => (None, text),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
