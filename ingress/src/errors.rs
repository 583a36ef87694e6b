//! Ingestion error types

use thiserror::Error;
use veil_fhe::FheError;

/// Errors that can occur packaging or ingesting input batches
#[derive(Error, Debug)]
pub enum IngressError {
    /// Proof invalid, wrong context/caller, or tampered batch.
    /// The whole batch is rejected; nothing is registered.
    #[error("Input proof verification failed: {0}")]
    ProofVerificationFailed(String),

    /// A batch must package at least one value
    #[error("Input batch is empty")]
    EmptyBatch,

    /// FHE backend error (includes out-of-range values at packaging)
    #[error("FHE error: {0}")]
    Fhe(#[from] FheError),
}

/// Ingestion result type
pub type IngressResult<T> = Result<T, IngressError>;
