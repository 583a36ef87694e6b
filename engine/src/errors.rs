//! Engine error types

use thiserror::Error;
use veil_fhe::{BitWidth, FheError};
use veil_registry::RegistryError;

use crate::request::FheOperation;

/// Errors that can occur evaluating an operation request
#[derive(Error, Debug)]
pub enum EngineError {
    /// An operand handle is not registered
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An operand's width violates the operation's width rules
    #[error("Bit width mismatch: expected {expected}, found {found}")]
    BitWidthMismatch {
        expected: BitWidth,
        found: BitWidth,
    },

    /// A shift/rotate request arrived without an amount operand
    #[error("Operation {0} requires an amount operand")]
    MissingAmount(FheOperation),

    /// A unary request arrived with an amount operand
    #[error("Operation {0} is unary and takes no amount operand")]
    UnexpectedAmount(FheOperation),

    /// FHE backend error
    #[error("FHE error: {0}")]
    Fhe(#[from] FheError),
}

/// Evaluator result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur requesting a decryption
#[derive(Error, Debug)]
pub enum OracleError {
    /// The handle was never registered
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The decryption has been requested but is not finished yet.
    /// Recoverable: poll again.
    #[error("Decryption result not yet available")]
    NotYetAvailable,

    /// The ticket does not belong to this oracle
    #[error("Unknown decryption ticket {0}")]
    UnknownTicket(u64),

    /// The oracle worker is gone
    #[error("Decryption service stopped")]
    ServiceStopped,
}

/// Oracle result type
pub type OracleResult<T> = Result<T, OracleError>;
