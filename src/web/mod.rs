// Web server: Axum routes for the two vectorization endpoints.
//
// The model is loaded before the listener binds and handed to every handler
// through AppState. Nothing in here is mutated after startup.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::embedding::traits::Embedder;
use crate::vectorize::tfidf::TfIdfVectorizer;

pub mod error;
pub mod handlers;
pub mod request;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
    pub tfidf: Arc<TfIdfVectorizer>,
    /// Request body cap in bytes. `None` lifts axum's 2 MB default entirely.
    pub max_body_bytes: Option<usize>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn Embedder>, tfidf: TfIdfVectorizer) -> Self {
        Self {
            embedder,
            tfidf: Arc::new(tfidf),
            max_body_bytes: None,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: Option<usize>) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("textvec listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = match state.max_body_bytes {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/generate-tfidf", post(handlers::tfidf::generate_tfidf))
        .route("/generate-bert", post(handlers::bert::generate_bert))
        .route("/health", get(health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check. Always 200 once the model is loaded.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}
