use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ccbot_config::Config;
use ccbot_core::embeddings::Embedder;
use ccbot_core::llm::Generator;
use ccbot_core::{ChunkMetadata, Error};
use ccbot_pipeline::{Answer, QueryPipeline};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use super::providers::{build_pipeline, Credentials};

pub const HELLO_MESSAGE: &str = "Hello from Contra Costa Knowledge Bot backend 🚀";

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SourceView {
    pub distance: f32,
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<SourceView>,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.text,
            sources: answer
                .sources
                .into_iter()
                .map(|hit| SourceView {
                    distance: hit.distance,
                    text: hit.chunk.text,
                    metadata: hit.chunk.metadata,
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::EmptyQuery => ApiError::BadRequest(message),
            Error::InputNotFound { .. } => ApiError::NotFound(message),
            Error::EmbeddingService(_) | Error::GenerationService(_) => {
                ApiError::Upstream(message)
            }
            _ => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        if status.is_server_error() {
            error!("request failed: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn hello() -> Json<serde_json::Value> {
    Json(json!({ "message": HELLO_MESSAGE }))
}

async fn ask<E, G>(
    State(pipeline): State<Arc<QueryPipeline<E, G>>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError>
where
    E: Embedder + 'static,
    G: Generator + 'static,
{
    let answer = tokio::task::spawn_blocking(move || pipeline.ask(&req.question, req.k))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(answer.into()))
}

pub fn router<E, G>(pipeline: Arc<QueryPipeline<E, G>>) -> Router
where
    E: Embedder + 'static,
    G: Generator + 'static,
{
    Router::new()
        .route("/hello", get(hello))
        .route("/ask", post(ask::<E, G>))
        .with_state(pipeline)
}

pub fn handle_serve(config: &Config, bind: Option<&str>) -> Result<()> {
    let bind = bind.unwrap_or(&config.server.bind).to_string();

    // Built before the runtime; the blocking HTTP clients inside must not be
    // created or dropped on a runtime thread.
    let pipeline = Arc::new(build_pipeline(config, &Credentials::from_env())?);
    let app = router(Arc::clone(&pipeline));

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(bind.as_str())
            .await
            .with_context(|| format!("failed to bind {}", bind))?;
        info!("listening on http://{}", bind);
        axum::serve(listener, app).await.context("server error")
    })?;
    drop(runtime);
    drop(pipeline);
    Ok(())
}
