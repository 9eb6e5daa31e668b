//! Articora Storage Library
//!
//! Filesystem vault for encrypted verification documents. The vault lives
//! outside any web-served tree, with restrictive permissions and generated
//! filenames; it only ever sees ciphertext.

pub mod traits;
pub mod vault;

pub use traits::{Storage, StorageError, StorageResult};
pub use vault::VaultStorage;
