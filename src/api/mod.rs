use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::core::routing::GenerationResult;

pub mod client;

pub use client::{GenerationBackend, HttpGenerationBackend, TurnError};

pub const GENERATE_ENDPOINT: &str = "generate";
pub const HEALTH_ENDPOINT: &str = "health";

/// Token budget sent with every prompt. Not user-configurable.
pub const MAX_TOKENS: u32 = 100;

/// Lets the server pick the provider for each prompt.
pub const AUTO_PROVIDER: &str = "auto";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub provider: String,
}

impl GenerateRequest {
    pub fn for_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: MAX_TOKENS,
            provider: AUTO_PROVIDER.to_string(),
        }
    }
}

/// Body of a successful `/generate` response.
///
/// Only `text` is strictly required. The remaining fields are coerced so a
/// sloppy server still yields a usable turn: `cost` accepts numbers and
/// numeric strings and falls back to zero, a missing `routed_to` is kept as
/// `None`, and a missing `latency` reads as zero.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_route")]
    pub routed_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cost")]
    pub cost: f64,
    #[serde(default, deserialize_with = "deserialize_latency")]
    pub latency: f64,
    #[serde(default, deserialize_with = "deserialize_cached")]
    pub cached: bool,
}

impl From<GenerateResponse> for GenerationResult {
    fn from(response: GenerateResponse) -> Self {
        GenerationResult {
            text: response.text,
            routed_to: response.routed_to,
            cost: response.cost,
            latency: response.latency,
            cached: response.cached,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

fn deserialize_route<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(route) => Some(route),
        _ => None,
    })
}

fn deserialize_cost<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    // Taken raw so numbers beyond f64 range reach the coercion instead of
    // failing the whole body.
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(coerce_cost(raw.get()))
}

/// Numeric coercion for the raw JSON text of the `cost` field. Anything that
/// is not a finite, non-negative number (or a string holding one) becomes
/// zero. Strings must be numeric in full: `"0.5abc"` is zero, not `0.5`.
pub fn coerce_cost(raw: &str) -> f64 {
    let raw = raw.trim();
    let parsed = if raw.starts_with('"') {
        serde_json::from_str::<String>(raw)
            .ok()
            .and_then(|text| text.trim().parse::<f64>().ok())
    } else {
        raw.parse::<f64>().ok()
    };

    match parsed {
        Some(cost) if cost.is_finite() && cost >= 0.0 => cost,
        _ => 0.0,
    }
}

fn deserialize_latency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let latency = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(if latency.is_finite() && latency > 0.0 {
        latency
    } else {
        0.0
    })
}

fn deserialize_cached<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(matches!(value, Value::Bool(true)))
}
