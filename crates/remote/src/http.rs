//! REST client for the vendor's image-to-video API.
//!
//! Wraps `POST /v1/image_to_video` (submission) and `GET /v1/tasks/{id}`
//! (status) using [`reqwest`]. Task ids are percent-encoded into the path.

use async_trait::async_trait;
use serde::Serialize;
use vidgen_core::generation::GenerationRequest;
use vidgen_core::job::TaskSnapshot;

use crate::api::{GenerationService, RemoteError, SubmittedTask};
use crate::config::RemoteConfig;

/// Header carrying the pinned API version.
pub const VERSION_HEADER: &str = "X-Runway-Version";

/// HTTP client for the generation service.
pub struct HttpGenerationClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

/// Request body for `POST /v1/image_to_video`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageToVideoBody<'a> {
    prompt_image: &'a str,
    prompt_text: &'a str,
    model: &'a str,
    duration: u32,
    ratio: &'a str,
}

impl<'a> From<&'a GenerationRequest> for ImageToVideoBody<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            prompt_image: &request.image,
            prompt_text: &request.prompt_text,
            model: &request.model,
            duration: request.duration_secs,
            ratio: &request.ratio,
        }
    }
}

impl HttpGenerationClient {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    /// `{api_url}/v1/tasks/{task_id}` with the id encoded as one path segment.
    fn task_url(&self, task_id: &str) -> Result<reqwest::Url, RemoteError> {
        let invalid = || RemoteError::InvalidUrl(self.config.api_url.clone());
        let mut url = reqwest::Url::parse(&self.config.api_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["v1", "tasks", task_id]);
        Ok(url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.config.api_key)
            .header(VERSION_HEADER, &self.config.api_version)
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise an
    /// [`RemoteError::ApiError`] with the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RemoteError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<SubmittedTask, RemoteError> {
        let response = self
            .authorized(self.client.post(self.url("/v1/image_to_video")))
            .json(&ImageToVideoBody::from(request))
            .send()
            .await?;

        let task: SubmittedTask = Self::parse_response(response).await?;
        tracing::info!(task_id = %task.id, model = %request.model, "Generation task submitted");
        Ok(task)
    }

    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, RemoteError> {
        // Dot segments would be resolved away instead of encoded.
        if matches!(task_id, "" | "." | "..") {
            return Err(RemoteError::NotFound(task_id.to_string()));
        }

        let response = self
            .authorized(self.client.get(self.task_url(task_id)?))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(task_id.to_string()));
        }

        let snapshot: TaskSnapshot = Self::parse_response(response).await?;
        tracing::debug!(task_id, status = %snapshot.status, "Fetched task status");
        Ok(snapshot)
    }
}
