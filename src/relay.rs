//! Relay between the client and the inference provider.
//!
//! Every request resolves to a [`RelayOutcome`]; errors never escape as
//! `Err`, and internal failure detail stays in the server log.

use crate::ai::InferenceService;
use crate::models::{ErrorBody, GenerateResponse, Prompt, ResponseBody};
use crate::{Error, Result};
use base64::Engine as _;
use serde_json::Value;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const UPSTREAM_FALLBACK: &str = "The AI router is busy. Try again.";
pub const INTERNAL_ERROR: &str = "Internal Server Error";

/// Normalized result of one relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Base64 of the provider's image bytes, without a data-URI prefix.
    Success { base64: String },
    Failure { status: u16, message: String },
}

impl RelayOutcome {
    pub fn status(&self) -> u16 {
        match self {
            RelayOutcome::Success { .. } => 200,
            RelayOutcome::Failure { status, .. } => *status,
        }
    }

    /// Splits the outcome into an HTTP status and the JSON body to send.
    pub fn into_parts(self) -> (u16, ResponseBody) {
        match self {
            RelayOutcome::Success { base64 } => {
                (200, ResponseBody::Image(GenerateResponse { base64 }))
            }
            RelayOutcome::Failure { status, message } => {
                (status, ResponseBody::Error(ErrorBody { error: message }))
            }
        }
    }

    fn failure(status: u16, message: impl Into<String>) -> Self {
        RelayOutcome::Failure {
            status,
            message: message.into(),
        }
    }
}

pub struct Relay {
    inference: Box<dyn InferenceService>,
}

impl Relay {
    pub fn new(inference: Box<dyn InferenceService>) -> Self {
        Self { inference }
    }

    /// Handle a raw request body.
    pub async fn handle(&self, body: &[u8]) -> RelayOutcome {
        let span = tracing::info_span!("relay", request_id = %Uuid::new_v4());

        async move {
            match self.try_handle(body).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Relay failed: {}", e);
                    RelayOutcome::failure(500, INTERNAL_ERROR)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_handle(&self, body: &[u8]) -> Result<RelayOutcome> {
        let value: Value = serde_json::from_slice(body)?;

        let Some(prompt) = extract_prompt(&value)? else {
            warn!("Rejected request without a prompt");
            return Ok(RelayOutcome::failure(400, PROMPT_REQUIRED));
        };

        match self.inference.text_to_image(&prompt).await {
            Ok(bytes) => {
                info!("Generated image ({} bytes)", bytes.len());
                Ok(RelayOutcome::Success {
                    base64: base64::engine::general_purpose::STANDARD.encode(bytes),
                })
            }
            Err(Error::Upstream { status, message }) => Ok(RelayOutcome::failure(
                status,
                message.unwrap_or_else(|| UPSTREAM_FALLBACK.to_string()),
            )),
            Err(e) => Err(e),
        }
    }
}

/// Reads `prompt` out of a parsed body.
///
/// A `null` body cannot be destructured and counts as an internal failure;
/// any other shape without a non-empty string prompt yields `None`.
fn extract_prompt(body: &Value) -> Result<Option<Prompt>> {
    match body {
        Value::Null => Err(Error::Generic("Request body is null".to_string())),
        Value::Object(fields) => Ok(match fields.get("prompt") {
            Some(Value::String(prompt)) => Prompt::new(prompt.clone()),
            _ => None,
        }),
        _ => Ok(None),
    }
}
