pub mod upload;

pub use upload::extract_verification_upload;
