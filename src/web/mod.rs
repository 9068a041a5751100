//! HTTP layer - router, shared state, and request handlers.
//!
//! This module provides the web interface for the `stocklens` service. All
//! business logic lives in [`crate::core`]; handlers only translate between
//! HTTP and core calls. Collaborators (database, insights client, budgets)
//! are explicitly constructed at startup and injected through [`AppState`] -
//! there are no process-global client singletons.

/// Session extraction and credential endpoints
pub mod auth;
/// Error-to-response mapping
pub mod error;
/// Insights endpoint
pub mod insights;
/// Catalog query endpoints
pub mod products;
/// Multipart ingestion endpoint
pub mod upload;

use crate::{
    config::settings::IngestSettings,
    core::insights::InsightsClient,
    errors::Result,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all storage operations
    pub db: DatabaseConnection,
    /// Insights collaborator; `None` when no API key is configured
    pub insights: Option<Arc<InsightsClient>>,
    /// Ingestion transaction budgets
    pub ingest: Arc<IngestSettings>,
    /// Lifetime granted to new login sessions
    pub session_ttl: Duration,
}

impl AppState {
    /// Creates the shared state from explicitly constructed collaborators.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        insights: Option<Arc<InsightsClient>>,
        ingest: Arc<IngestSettings>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            db,
            insights,
            ingest,
            session_ttl,
        }
    }
}

/// Builds the service router with all routes and layers attached.
#[must_use]
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/upload", post(upload::upload))
        .route("/api/products", get(products::list))
        .route("/api/products/:id", get(products::detail))
        .route("/api/ai/insights", post(insights::generate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

/// Runs the server on the given listener until it exits.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
    max_upload_bytes: usize,
) -> Result<()> {
    let app = build_router(state, max_upload_bytes);
    axum::serve(listener, app).await.map_err(Into::into)
}

async fn healthz() -> &'static str {
    "ok"
}
