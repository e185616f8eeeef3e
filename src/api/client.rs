//! HTTP access to the routing server.
//!
//! [`HttpGenerationBackend`] is the production [`GenerationBackend`]; tests
//! swap in scripted backends through the same trait.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::{GenerateRequest, GenerateResponse, HealthResponse, GENERATE_ENDPOINT, HEALTH_ENDPOINT};
use crate::core::routing::GenerationResult;

/// Why a turn could not produce a [`GenerationResult`].
///
/// Both kinds are rendered the same way in the transcript; the split exists
/// for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// The request could not be sent, no response arrived, or the server
    /// answered with a non-success status.
    Transport { message: String },

    /// The response body did not match the `/generate` schema.
    Decode { message: String },
}

impl TurnError {
    pub fn transport(message: impl Into<String>) -> Self {
        TurnError::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        TurnError::Decode {
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, TurnError::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, TurnError::Decode { .. })
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Transport { message } => write!(f, "{message}"),
            TurnError::Decode { message } => write!(f, "Malformed response: {message}"),
        }
    }
}

impl StdError for TurnError {}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerationResult, TurnError>;
}

#[derive(Clone)]
pub struct HttpGenerationBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGenerationBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes `GET /health` and returns the reported status string.
    pub async fn check_health(&self) -> Result<String, TurnError> {
        let url = endpoint_url(&self.base_url, HEALTH_ENDPOINT);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| TurnError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TurnError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let health: HealthResponse =
            serde_json::from_str(&body).map_err(|err| TurnError::decode(err.to_string()))?;
        Ok(health.status)
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerationResult, TurnError> {
        let url = endpoint_url(&self.base_url, GENERATE_ENDPOINT);
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| TurnError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| TurnError::transport(err.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &String::from_utf8_lossy(&body)));
        }

        let decoded: GenerateResponse =
            serde_json::from_slice(&body).map_err(|err| TurnError::decode(err.to_string()))?;
        Ok(decoded.into())
    }
}

/// Joins `base_url` and `endpoint` with exactly one slash between them.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn status_error(status: StatusCode, body: &str) -> TurnError {
    match extract_error_detail(body) {
        Some(detail) => TurnError::transport(format!("Server responded with {status}: {detail}")),
        None => TurnError::transport(format!("Server responded with {status}")),
    }
}

/// Pulls a one-line explanation out of an error body. FastAPI puts it under
/// `detail`; other servers use `error.message` or `message`. Non-JSON bodies
/// are used verbatim.
fn extract_error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let summary = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value
            .get("detail")
            .and_then(detail_text)
            .or_else(|| {
                value
                    .pointer("/error/message")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
            })
            .or_else(|| {
                value
                    .get("error")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
            })
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| value.to_string()),
        Err(_) => trimmed.to_string(),
    };

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

// FastAPI validation errors report `detail` as a list of objects with `msg`.
fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
