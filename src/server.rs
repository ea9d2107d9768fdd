//! HTTP chat adapter.
//!
//! Exposes the question router, the ad-hoc option search and completions
//! as a small JSON API so chat front-ends and editor extensions can talk to
//! one long-lived installation session.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/ask` | Answer a question: `{ "question": "..." }` |
//! | `POST` | `/query` | Ad-hoc option search: `{ "query": "find options like mailer" }` |
//! | `GET`  | `/completions?prefix=...` | Completions for the text before the cursor |
//! | `GET`  | `/health` | Version and session readiness |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "unrecognized_query", "message": "..." } }
//! ```
//!
//! `/ask` never returns an error status: failures come back as a response
//! whose `message` explains what went wrong.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use wp_context_core::completion::CompletionItem;
use wp_context_core::models::QueryResponse;
use wp_context_core::WpError;

use crate::completions::completion_items;
use crate::installation::{InstallationState, Readiness};
use crate::query::{search_options, OptionSearchResult};
use crate::render;
use crate::router::QueryRouter;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    router: Arc<QueryRouter>,
}

impl AppState {
    pub fn new(state: Arc<InstallationState>) -> Self {
        Self {
            router: Arc::new(QueryRouter::new(state)),
        }
    }

    fn installation(&self) -> &InstallationState {
        self.router.state()
    }
}

/// The route table, with permissive CORS for browser-based chat clients.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ask", post(handle_ask))
        .route("/query", post(handle_query))
        .route("/completions", get(handle_completions))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Serve on an already-bound listener until the process ends.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

/// Bind `bind_addr` and serve. Entry point of `wpctx serve`.
pub async fn run_server(bind_addr: &str, state: Arc<InstallationState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "server listening");
    println!("wpctx server listening on http://{}", bind_addr);
    serve(listener, AppState::new(state)).await
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<WpError> for AppError {
    fn from(err: WpError) -> Self {
        let status = match err {
            WpError::UnrecognizedQuery(_) => StatusCode::BAD_REQUEST,
            WpError::ConfigNotFound => StatusCode::NOT_FOUND,
            WpError::ConnectionFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    readiness: Readiness,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        readiness: state.installation().readiness().await,
    })
}

// ============ POST /ask ============

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    #[serde(flatten)]
    response: QueryResponse,
    markdown: String,
}

async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Json<AskResponse> {
    let response = state.router.answer(&req.question).await;
    let markdown = render::markdown(&response);
    Json(AskResponse { response, markdown })
}

// ============ POST /query ============

#[derive(Deserialize)]
struct QueryRequest {
    query: String,
}

async fn handle_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<OptionSearchResult>, AppError> {
    if req.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }
    let result = search_options(state.installation(), &req.query).await?;
    Ok(Json(result))
}

// ============ GET /completions ============

#[derive(Deserialize)]
struct CompletionParams {
    #[serde(default)]
    prefix: String,
}

async fn handle_completions(
    State(state): State<AppState>,
    Query(params): Query<CompletionParams>,
) -> Json<Vec<CompletionItem>> {
    Json(completion_items(state.installation(), &params.prefix).await)
}
