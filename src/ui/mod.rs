//! Client side of the relay: UI state, the submit cycle, and its renderings.
//!
//! The same [`Session`] drives both the server-rendered page and the
//! terminal client; only the [`RelayApi`] transport differs.

pub mod client;
pub mod view;

pub use client::{HttpRelayClient, InProcessRelay, MockRelayClient, RelayApi, RelayReply};

use crate::models::{GenerateRequest, RelayBody};
use crate::{Error, Result};

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";
pub const GENERATE_FALLBACK: &str = "Failed to generate image";

/// What the page shows. At most one of loading, image and error is meant to
/// be active, but only the submit cycle keeps it that way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub loading: bool,
    /// Displayable image source (a data URI).
    pub image: Option<String>,
    pub error: Option<String>,
    pub expanded: bool,
}

impl UiState {
    fn begin_submit(&mut self) {
        self.loading = true;
        self.error = None;
        self.image = None;
    }

    pub fn image_visible(&self) -> bool {
        self.image.is_some() && !self.loading
    }

    pub fn overlay_visible(&self) -> bool {
        self.expanded && self.image.is_some()
    }
}

type Listener = Box<dyn Fn(&UiState) + Send + Sync>;

/// One user's prompt box plus the state it drives.
pub struct Session {
    relay: Box<dyn RelayApi>,
    prompt: String,
    state: UiState,
    listener: Option<Listener>,
}

impl Session {
    pub fn new(relay: Box<dyn RelayApi>) -> Self {
        Self {
            relay,
            prompt: String::new(),
            state: UiState::default(),
            listener: None,
        }
    }

    /// Registers a callback run after every state transition.
    pub fn on_change(mut self, listener: impl Fn(&UiState) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Runs one request/render cycle for the current prompt.
    ///
    /// Never fails: every error ends up in `state().error`, and `loading` is
    /// always cleared before returning. A second call while one is in flight
    /// is not guarded against.
    pub async fn submit(&mut self) {
        self.state.begin_submit();
        self.notify();

        match self.request_image().await {
            Ok(Some(image)) => self.state.image = Some(image),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Image generation failed: {}", e);
                self.state.error = Some(e.to_string());
            }
        }

        self.state.loading = false;
        self.notify();
    }

    async fn request_image(&self) -> Result<Option<String>> {
        let reply = self
            .relay
            .post_generate(&GenerateRequest {
                prompt: self.prompt.clone(),
            })
            .await?;

        let body: RelayBody = serde_json::from_slice(&reply.body)?;

        if !reply.is_success() {
            return Err(Error::Relay(
                body.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| GENERATE_FALLBACK.to_string()),
            ));
        }

        Ok(body
            .base64
            .filter(|b| !b.is_empty())
            .map(|b| format!("{}{}", DATA_URI_PREFIX, b)))
    }

    /// Clicking the image.
    pub fn expand(&mut self) {
        self.state.expanded = true;
        self.notify();
    }

    /// Clicking the overlay.
    pub fn collapse(&mut self) {
        self.state.expanded = false;
        self.notify();
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener(&self.state);
        }
    }
}
