//! Application initialization
//!
//! This module wires up the application in order: configuration is
//! validated, then the database, then the storage vault and services,
//! and finally the router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use std::sync::Arc;

use axum::Router;

use articora_core::Config;

use crate::state::AppState;

pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    config.validate()?;

    tracing::info!(environment = %config.environment, "Initializing Articora API");

    let pool = database::setup_database(&config).await?;
    let state = services::initialize_services(config, pool).await?;
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
