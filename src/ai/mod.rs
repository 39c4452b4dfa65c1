//! Inference provider integration for text-to-image generation
//!
//! Wraps the remote text-to-image endpoint behind a trait so the relay can be
//! exercised against a mock provider.

pub mod client;
pub mod mime;
pub mod mock;

pub use client::HuggingFaceClient;
pub use mock::MockInferenceClient;

use crate::models::Prompt;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Returns the raw image bytes produced for `prompt`.
    ///
    /// A non-success provider status is reported as [`crate::Error::Upstream`].
    async fn text_to_image(&self, prompt: &Prompt) -> Result<Vec<u8>>;
}
