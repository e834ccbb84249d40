//! HTTP Backend Implementation
//!
//! Talks to the classification service over HTTP.
//!
//! # Service API
//!
//! - `POST /classify` - multipart body with one `image` part. Answers
//!   `{debug_image_base64, object_count, class_counts, ...}` on success and
//!   `{error}` with a status >= 400 on failure.
//!
//! No timeout is set on classification requests: processing a large image
//! can take minutes and the workflow waits for whatever the transport does.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use super::traits::{
    BackendConfig, ClassificationBackend, ClassificationRequest, ClassificationResponse,
};
use crate::config::ConfigError;
use crate::error::ClassifyError;

/// Classification service client
#[derive(Clone, Debug)]
pub struct HttpBackend {
    /// Base URL as configured, without trailing slash
    endpoint: String,
    /// Full URL of the classify route
    classify_url: Url,
    /// HTTP client
    http_client: reqwest::Client,
}

/// Error body sent by the service
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpBackend {
    /// Create a backend for the service at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if `base_url` is not an
    /// `http`/`https` URL or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut base = parse_endpoint(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let classify_url = base
            .join("classify")
            .map_err(|e| ConfigError::ValidationError(format!("Invalid endpoint URL: {e}")))?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("stargaze/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {e}")))?;

        Ok(Self {
            endpoint: base_url.trim_end_matches('/').to_string(),
            classify_url,
            http_client,
        })
    }

    /// Create from `BackendConfig`
    ///
    /// # Errors
    ///
    /// See [`HttpBackend::new`].
    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        match config {
            BackendConfig::Http { base_url } => Self::new(base_url),
        }
    }

    /// Create from environment variables
    ///
    /// # Errors
    ///
    /// See [`HttpBackend::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&BackendConfig::from_env())
    }

    /// Full URL of the classify route
    #[must_use]
    pub fn classify_url(&self) -> &str {
        self.classify_url.as_str()
    }

    /// Build the multipart body for `request`
    fn build_form(
        request: &ClassificationRequest,
    ) -> Result<reqwest::multipart::Form, ClassifyError> {
        let part = reqwest::multipart::Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(request.content_type.mime())
            .map_err(|e| ClassifyError::Validation(format!("Invalid content type: {e}")))?;

        Ok(reqwest::multipart::Form::new().part("image", part))
    }
}

/// Parse and check a service base URL
pub(crate) fn parse_endpoint(base_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(base_url.trim()).map_err(|e| {
        ConfigError::ValidationError(format!("Invalid endpoint URL '{base_url}': {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::ValidationError(format!(
            "Endpoint URL must use http or https, got '{other}'"
        ))),
    }
}

/// Turn a failure status and its body into an endpoint error
fn endpoint_error(status: StatusCode, body: &str) -> ClassifyError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Endpoint error: {}", status_text(status)));

    ClassifyError::Endpoint {
        status: status.as_u16(),
        message,
    }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl ClassificationBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.endpoint)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassifyError> {
        let form = Self::build_form(request)?;

        tracing::debug!(
            url = %self.classify_url,
            file = %request.file_name,
            bytes = request.bytes.len(),
            "Posting image for classification"
        );

        let response = match self
            .http_client
            .post(self.classify_url.clone())
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %e,
                    "Classification service unreachable"
                );
                return Err(ClassifyError::connection(&self.endpoint));
            }
        };

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Classification service returned an error");
            return Err(endpoint_error(status, &body));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Response body interrupted");
                return Err(ClassifyError::connection(&self.endpoint));
            }
        };

        ClassificationResponse::from_json(&body)
    }
}
