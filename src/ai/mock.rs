use super::InferenceService;
use crate::models::Prompt;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockOutcome {
    Image(Vec<u8>),
    Upstream { status: u16, message: Option<String> },
    Transport(String),
}

#[derive(Clone)]
pub struct MockInferenceClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image_response(self, bytes: Vec<u8>) -> Self {
        self.outcomes.lock().unwrap().push(MockOutcome::Image(bytes));
        self
    }

    pub fn with_upstream_error(self, status: u16, message: Option<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Upstream { status, message });
        self
    }

    pub fn with_transport_failure(self, reason: String) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Transport(reason));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceService for MockInferenceClient {
    async fn text_to_image(&self, prompt: &Prompt) -> Result<Vec<u8>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.prompts.lock().unwrap().push(prompt.as_str().to_string());

        let outcomes = self.outcomes.lock().unwrap();
        let outcome = if outcomes.is_empty() {
            // 1x1 PNG header bytes
            MockOutcome::Image(vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
                0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
            ])
        } else {
            outcomes[(*count - 1) % outcomes.len()].clone()
        };

        match outcome {
            MockOutcome::Image(bytes) => Ok(bytes),
            MockOutcome::Upstream { status, message } => Err(Error::Upstream { status, message }),
            MockOutcome::Transport(reason) => Err(Error::Generic(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(text: &str) -> Prompt {
        Prompt::new(text).unwrap()
    }

    #[tokio::test]
    async fn test_mock_default_is_png() {
        let client = MockInferenceClient::new();
        let bytes = client.text_to_image(&prompt("a red fox")).await.unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(client.get_prompts(), vec!["a red fox".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_cycles_outcomes() {
        let client = MockInferenceClient::new()
            .with_image_response(vec![1])
            .with_upstream_error(503, Some("model loading".to_string()));

        assert_eq!(client.text_to_image(&prompt("a")).await.unwrap(), vec![1]);
        assert!(matches!(
            client.text_to_image(&prompt("b")).await,
            Err(Error::Upstream { status: 503, .. })
        ));
        // Should cycle back
        assert_eq!(client.text_to_image(&prompt("c")).await.unwrap(), vec![1]);
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_failure() {
        let client = MockInferenceClient::new().with_transport_failure("connection reset".to_string());
        let err = client.text_to_image(&prompt("a")).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
