//! FHE backend error types

use thiserror::Error;

use crate::width::BitWidth;

/// Errors that can occur in the FHE backend
#[derive(Error, Debug)]
pub enum FheError {
    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid or undecodable ciphertext
    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Bit count outside the supported set
    #[error("Unsupported bit width: {0}")]
    UnsupportedWidth(u32),

    /// Clear value does not fit its declared width
    #[error("Value does not fit into an unsigned {width}-bit integer")]
    ValueOutOfRange { width: u32 },

    /// Operand width violates an operation's width rule
    #[error("Bit width mismatch: expected {expected}, found {found}")]
    WidthMismatch { expected: BitWidth, found: BitWidth },
}

/// Result type for FHE backend operations
pub type FheResult<T> = Result<T, FheError>;
