//! Data models and structures
//!
//! Defines the JSON payloads exchanged with the relay endpoint and the
//! inference provider, plus process configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_INFERENCE_URL: &str =
    "https://router.huggingface.co/hf-inference/models/black-forest-labs/FLUX.1-schnell";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const RELAY_PATH: &str = "/api/generate";

/// A user prompt that is known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Returns `None` for the empty string; whitespace is kept as typed.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body accepted by the relay endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Successful relay body. The payload carries no data-URI prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub base64: String,
}

/// Error body used for every non-success relay response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Either relay body, serialized without a tag.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseBody {
    Image(GenerateResponse),
    Error(ErrorBody),
}

/// Relay body as read by a client, which cannot know the variant up front.
#[derive(Debug, Default, Deserialize)]
pub struct RelayBody {
    pub base64: Option<String>,
    pub error: Option<String>,
}

/// Request body for the inference provider.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_token: Option<String>,
    pub inference_url: String,
    /// Raw `BIND_ADDR`; only parsed when no override address is given.
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            hf_token: std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty()),
            inference_url: std::env::var("INFERENCE_URL")
                .unwrap_or_else(|_| DEFAULT_INFERENCE_URL.to_string()),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    /// Picks the listen address, preferring `override_addr` over `BIND_ADDR`.
    pub fn listen_addr(&self, override_addr: Option<SocketAddr>) -> crate::Result<SocketAddr> {
        match override_addr {
            Some(addr) => Ok(addr),
            None => parse_bind_addr(&self.bind_addr),
        }
    }
}

pub fn parse_bind_addr(input: &str) -> crate::Result<SocketAddr> {
    input
        .parse()
        .map_err(|_| crate::Error::Config(format!("Invalid bind address '{}'", input)))
}
