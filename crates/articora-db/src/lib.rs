//! Database repositories for the verification metadata store

pub mod db;

pub use db::verification::VerificationDocumentRepository;
pub use db::{connect_pool, init_schema};
