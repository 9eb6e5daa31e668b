//! Document encryption at rest
//!
//! Uploaded verification documents are encrypted with AES-256-CBC before they
//! touch disk. The key is loaded once at startup from configuration; a fresh
//! random IV is generated per document and stored hex-encoded alongside the
//! metadata, never inside the ciphertext file.

use std::fmt;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose, Engine as _};
use rand::TryRngCore;

use crate::AppError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Required decoded key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;
/// CBC initialization vector length in bytes
pub const IV_LEN: usize = 16;

/// Key loading errors. Cloneable so a failed load can be kept in application
/// state and surfaced on every upload attempt without retrying the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("encryption key is not configured")]
    Missing,

    #[error("encryption key must decode to {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::Missing => AppError::MissingEncryptionKey,
            KeyError::InvalidLength(len) => AppError::InvalidEncryptionKeyLength(len),
        }
    }
}

/// A validated 32-byte AES-256 key. Debug output is redacted; the raw bytes
/// never appear in logs or error messages.
#[derive(Clone)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

impl EncryptionKey {
    /// Create a key from raw 32-byte material (e.g. for tests).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        Ok(Self(key))
    }

    /// Decode the configured key string.
    ///
    /// Hex is tried first, then base64. A string that parses as hex is
    /// treated as hex even when the length is wrong, so the error reports
    /// the length the operator actually configured. A standard base64 key
    /// carries padding and never parses as hex, so real base64 keys always
    /// reach the fallback.
    pub fn from_config(configured: Option<&str>) -> Result<Self, KeyError> {
        let raw = configured.map(str::trim).filter(|s| !s.is_empty());
        let raw = raw.ok_or(KeyError::Missing)?;

        if let Ok(bytes) = hex::decode(raw) {
            return Self::from_bytes(&bytes);
        }

        let bytes = general_purpose::STANDARD
            .decode(raw)
            .map_err(|_| KeyError::InvalidLength(raw.len()))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Result of encrypting a document: ciphertext for the storage writer and the
/// hex-encoded IV for the metadata row.
pub struct EncryptedDocument {
    pub ciphertext: Vec<u8>,
    pub iv_hex: String,
}

/// AES-256-CBC cipher for whole-document encryption (PKCS#7 padding)
#[derive(Clone)]
pub struct DocumentCipher {
    key: EncryptionKey,
}

impl DocumentCipher {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Encrypt a document with a fresh random IV.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedDocument, AppError> {
        let mut iv = [0u8; IV_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| AppError::EncryptionFailed(format!("IV generation failed: {}", e)))?;

        let ciphertext = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|e| AppError::EncryptionFailed(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(EncryptedDocument {
            ciphertext,
            iv_hex: hex::encode(iv),
        })
    }

    /// Decrypt a document given the IV recorded with its metadata.
    pub fn decrypt(&self, ciphertext: &[u8], iv_hex: &str) -> Result<Vec<u8>, AppError> {
        let iv = hex::decode(iv_hex)
            .map_err(|e| AppError::EncryptionFailed(format!("Invalid IV encoding: {}", e)))?;
        if iv.len() != IV_LEN {
            return Err(AppError::EncryptionFailed(format!(
                "IV must be {} bytes, got {}",
                IV_LEN,
                iv.len()
            )));
        }

        Aes256CbcDec::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|e| AppError::EncryptionFailed(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| AppError::EncryptionFailed(format!("Decryption failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &[u8; 32] = b"01234567890123456789012345678901";

    fn test_cipher() -> DocumentCipher {
        DocumentCipher::new(EncryptionKey::from_bytes(TEST_KEY).unwrap())
    }

    #[test]
    fn test_key_from_hex() {
        let hex_key = hex::encode(TEST_KEY);
        let key = EncryptionKey::from_config(Some(&hex_key)).unwrap();
        assert_eq!(key.as_bytes(), TEST_KEY);
    }

    #[test]
    fn test_key_from_base64() {
        let b64_key = general_purpose::STANDARD.encode(TEST_KEY);
        let key = EncryptionKey::from_config(Some(&b64_key)).unwrap();
        assert_eq!(key.as_bytes(), TEST_KEY);
    }

    #[test]
    fn test_key_missing() {
        let err = EncryptionKey::from_config(None).unwrap_err();
        assert_eq!(err, KeyError::Missing);
    }

    #[test]
    fn test_key_empty_is_missing() {
        let err = EncryptionKey::from_config(Some("   ")).unwrap_err();
        assert_eq!(err, KeyError::Missing);
    }

    #[test]
    fn test_key_wrong_length_hex() {
        // Valid hex of the wrong length reports the hex-decoded length,
        // even when the string would also decode as base64
        let short = hex::encode(&TEST_KEY[..16]);
        let err = EncryptionKey::from_config(Some(&short)).unwrap_err();
        assert_eq!(err, KeyError::InvalidLength(16));

        let longer = hex::encode(&TEST_KEY[..24]);
        let err = EncryptionKey::from_config(Some(&longer)).unwrap_err();
        assert_eq!(err, KeyError::InvalidLength(24));
    }

    #[test]
    fn test_key_wrong_length_base64() {
        let short = general_purpose::STANDARD.encode(&TEST_KEY[..20]);
        let err = EncryptionKey::from_config(Some(&short)).unwrap_err();
        assert_eq!(err, KeyError::InvalidLength(20));
    }

    #[test]
    fn test_key_garbage_rejected() {
        let err = EncryptionKey::from_config(Some("not a key!!!")).unwrap_err();
        assert!(matches!(err, KeyError::InvalidLength(_)));
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = EncryptionKey::from_bytes(TEST_KEY).unwrap();
        let debug = format!("{:?}", key);
        assert_eq!(debug, "EncryptionKey(..)");
        assert!(!debug.contains("0123"));
    }

    #[test]
    fn test_round_trip_empty() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt(b"").unwrap();
        // PKCS#7 pads the empty input to one full block
        assert_eq!(encrypted.ciphertext.len(), 16);
        let decrypted = cipher.decrypt(&encrypted.ciphertext, &encrypted.iv_hex).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_round_trip_single_byte() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt(b"x").unwrap();
        let decrypted = cipher.decrypt(&encrypted.ciphertext, &encrypted.iv_hex).unwrap();
        assert_eq!(decrypted, b"x");
    }

    #[test]
    fn test_round_trip_large() {
        let cipher = test_cipher();
        let plaintext: Vec<u8> = (0..5_000_000u32).map(|i| (i % 251) as u8).collect();
        let encrypted = cipher.encrypt(&plaintext).unwrap();
        assert_ne!(encrypted.ciphertext, plaintext);
        let decrypted = cipher.decrypt(&encrypted.ciphertext, &encrypted.iv_hex).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_iv_unique_per_encryption() {
        let cipher = test_cipher();
        let a = cipher.encrypt(b"same plaintext").unwrap();
        let b = cipher.encrypt(b"same plaintext").unwrap();
        assert_ne!(a.iv_hex, b.iv_hex);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_iv_is_16_bytes_hex() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt(b"data").unwrap();
        assert_eq!(encrypted.iv_hex.len(), IV_LEN * 2);
        assert!(hex::decode(&encrypted.iv_hex).is_ok());
    }

    #[test]
    fn test_decrypt_with_wrong_iv_corrupts_plaintext() {
        let cipher = test_cipher();
        let plaintext = b"a plaintext longer than one aes block for certainty";
        let encrypted = cipher.encrypt(plaintext).unwrap();
        let wrong_iv = hex::encode([0u8; IV_LEN]);
        // A wrong IV only scrambles the first block; padding still validates.
        if let Ok(decrypted) = cipher.decrypt(&encrypted.ciphertext, &wrong_iv) {
            assert_ne!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_decrypt_rejects_bad_iv_encoding() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt(b"data").unwrap();
        assert!(cipher.decrypt(&encrypted.ciphertext, "zz").is_err());
        assert!(cipher.decrypt(&encrypted.ciphertext, "00ff").is_err());
    }
}
