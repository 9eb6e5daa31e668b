use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use articora_core::validation::MAX_CERTIFICATE_BYTES;

use crate::handlers::health::health_check;
use crate::handlers::verification::{list_documents, upload_document};
use crate::state::AppState;

// Largest accepted document plus room for multipart framing
const BODY_LIMIT_BYTES: usize = MAX_CERTIFICATE_BYTES + 1024 * 1024;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/v0/verification/documents",
            get(list_documents).post(upload_document),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state)
}
