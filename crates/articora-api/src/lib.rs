//! Articora verification API
//!
//! HTTP surface for the document verification pipeline: authenticated upload
//! and listing endpoints, a health probe, and the bootstrap wiring for the
//! vault, metadata store, and retention sweeper.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use state::AppState;
