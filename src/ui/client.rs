use crate::models::GenerateRequest;
use crate::relay::Relay;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::{Arc, Mutex};

/// Raw relay answer before the client interprets it.
#[derive(Debug, Clone)]
pub struct RelayReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RelayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by the client cycle to reach the relay endpoint.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn post_generate(&self, request: &GenerateRequest) -> Result<RelayReply>;
}

/// Talks to a relay over HTTP.
pub struct HttpRelayClient {
    client: Client,
    url: String,
}

impl HttpRelayClient {
    pub fn new(url: String) -> Self {
        Self::new_with_client(url, Client::new())
    }

    pub fn new_with_client(url: String, client: Client) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn post_generate(&self, request: &GenerateRequest) -> Result<RelayReply> {
        tracing::debug!("Posting prompt to relay at {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach relay: {}", e);
                e
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RelayReply { status, body })
    }
}

/// Calls a [`Relay`] living in the same process, with the same JSON framing
/// the HTTP endpoint uses.
#[derive(Clone)]
pub struct InProcessRelay {
    relay: Arc<Relay>,
}

impl InProcessRelay {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl RelayApi for InProcessRelay {
    async fn post_generate(&self, request: &GenerateRequest) -> Result<RelayReply> {
        let payload = serde_json::to_vec(request)?;
        let (status, body) = self.relay.handle(&payload).await.into_parts();
        Ok(RelayReply {
            status,
            body: serde_json::to_vec(&body)?,
        })
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Reply(RelayReply),
    NetworkFailure(String),
}

/// Scripted relay for exercising the client cycle.
#[derive(Clone)]
pub struct MockRelayClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockRelayClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_json_reply(self, status: u16, body: serde_json::Value) -> Self {
        self.with_raw_reply(status, body.to_string().into_bytes())
    }

    pub fn with_raw_reply(self, status: u16, body: Vec<u8>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Reply(RelayReply { status, body }));
        self
    }

    pub fn with_network_failure(self, reason: String) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::NetworkFailure(reason));
        self
    }

    pub fn get_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockRelayClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayApi for MockRelayClient {
    async fn post_generate(&self, request: &GenerateRequest) -> Result<RelayReply> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.prompt.clone());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(crate::Error::Generic("No mock reply configured".to_string()));
        }

        match &replies[(requests.len() - 1) % replies.len()] {
            MockReply::Reply(reply) => Ok(reply.clone()),
            MockReply::NetworkFailure(reason) => Err(crate::Error::Generic(reason.clone())),
        }
    }
}
