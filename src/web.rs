//! HTTP surface: the relay endpoint and the server-rendered page.

use crate::ai::HuggingFaceClient;
use crate::models::{Config, RELAY_PATH};
use crate::relay::{Relay, RelayOutcome};
use crate::ui::{view, InProcessRelay, Session};
use crate::Result;
use axum::body::Bytes;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

struct AppState {
    relay: Arc<Relay>,
}

#[derive(Debug, Deserialize)]
struct PromptForm {
    #[serde(default)]
    prompt: String,
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

pub fn router(relay: Arc<Relay>) -> Router {
    let state = Arc::new(AppState { relay });

    Router::new()
        .route("/", get(index).post(submit))
        .route(RELAY_PATH, post(generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the relay from `config` and serves until Ctrl-C.
pub async fn run(config: Config, addr: SocketAddr) -> Result<()> {
    if config.hf_token.is_none() {
        warn!("HF_TOKEN is not set; provider requests will be unauthenticated");
    }
    let inference = HuggingFaceClient::new(config.hf_token, config.inference_url);
    info!("Inference provider: {}", inference.url());

    let app = router(Arc::new(Relay::new(Box::new(inference))));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn generate(State(state): State<Arc<AppState>>, body: Bytes) -> RelayOutcome {
    state.relay.handle(&body).await
}

async fn index() -> Html<String> {
    Html(view::render_html(&Default::default(), ""))
}

async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<PromptForm>) -> Html<String> {
    let mut session = Session::new(Box::new(InProcessRelay::new(state.relay.clone())));
    session.set_prompt(form.prompt);
    session.submit().await;

    Html(view::render_html(session.state(), session.prompt()))
}
