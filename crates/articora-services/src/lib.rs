//! Articora Services Library
//!
//! Business services for the verification pipeline: the upload service
//! (validate, encrypt, write, record) and the retention sweeper that removes
//! expired or reviewed documents.

pub mod retention;
pub mod verification;

pub use retention::{RetentionSweeper, SweepOutcome};
pub use verification::VerificationService;
