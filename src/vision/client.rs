//! Classification service client
//!
//! One POST per scan attempt: no retries, no backoff, no timeout beyond the
//! transport defaults.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::vision::models::{ClassificationRequest, ClassificationResponseRaw};

/// Header carrying the service credential
pub const API_KEY_HEADER: &str = "Api-Key";

/// Longest body excerpt kept in a service error
const ERROR_BODY_SNIPPET: usize = 200;

/// Something that can classify an encoded image
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponseRaw, ScanError>;
}

/// HTTP client for the plant identification endpoint
pub struct PlantIdClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PlantIdClient {
    /// Create a client for `endpoint`.
    ///
    /// A missing key is not an error here: the service rejects the request
    /// and that surfaces as a service error.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());
        if api_key.is_none() {
            warn!("No API key configured; the classification service will reject requests");
        }

        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for PlantIdClient {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponseRaw, ScanError> {
        let start = Instant::now();

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request.body());
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await.map_err(ScanError::Network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ScanError::Network)?;

        debug!(
            "Classification response {} ({} bytes) in {:?}",
            status,
            body.len(),
            start.elapsed()
        );

        if !status.is_success() {
            return Err(ScanError::Service {
                status: Some(status.as_u16()),
                message: snippet(&body),
            });
        }

        let value: Value = serde_json::from_slice(&body).map_err(|e| ScanError::Service {
            status: Some(status.as_u16()),
            message: format!("malformed response body: {}", e),
        })?;

        Ok(ClassificationResponseRaw::from_value(value))
    }
}

/// First few hundred characters of a body, for logs
fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    text.chars().take(ERROR_BODY_SNIPPET).collect()
}
