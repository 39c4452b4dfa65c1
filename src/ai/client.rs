use super::InferenceService;
use crate::models::{InferenceRequest, Prompt};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Client for the HuggingFace inference router.
///
/// No request timeout is configured; the transport default applies.
pub struct HuggingFaceClient {
    client: Client,
    token: Option<String>,
    url: String,
}

impl HuggingFaceClient {
    pub fn new(token: Option<String>, url: String) -> Self {
        Self::new_with_client(token, url, Client::new())
    }

    pub fn new_with_client(token: Option<String>, url: String, client: Client) -> Self {
        Self { client, token, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Pulls a usable message out of a provider error body.
///
/// Bodies that are not JSON are treated as an empty object. A literal `null`
/// body has no fields to read and is an internal failure.
pub(crate) fn upstream_error_message(body: &[u8]) -> Result<Option<String>> {
    let value: serde_json::Value =
        serde_json::from_slice(body).unwrap_or_else(|_| serde_json::json!({}));

    tracing::error!("Inference provider error body: {}", value);

    if value.is_null() {
        return Err(Error::Generic(
            "Inference provider error body is null".to_string(),
        ));
    }

    Ok(value
        .get("error")
        .and_then(|e| e.as_str())
        .filter(|e| !e.is_empty())
        .map(str::to_string))
}

#[async_trait]
impl InferenceService for HuggingFaceClient {
    async fn text_to_image(&self, prompt: &Prompt) -> Result<Vec<u8>> {
        tracing::debug!("Sending text-to-image request to {}", self.url);

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&InferenceRequest {
                inputs: prompt.as_str(),
            });
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to send request to inference provider: {}", e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.bytes().await.unwrap_or_default();
            let message = upstream_error_message(&body)?;
            tracing::error!(
                "Inference provider rejected request (status {}): {:?}",
                status,
                message
            );
            return Err(Error::Upstream { status, message });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
