//! Host errors

use thiserror::Error;

/// Host result type
pub type HostResult<T> = Result<T, HostError>;

/// Errors surfaced by the engine host
#[derive(Error, Debug)]
pub enum HostError {
    /// FHE backend error
    #[error("FHE error: {0}")]
    Fhe(#[from] veil_fhe::FheError),

    /// Registry error
    #[error("Registry error: {0}")]
    Registry(#[from] veil_registry::RegistryError),

    /// Ingestion error
    #[error("Ingestion error: {0}")]
    Ingress(#[from] veil_ingress::IngressError),

    /// Evaluation error
    #[error("Engine error: {0}")]
    Engine(#[from] veil_engine::EngineError),

    /// Decryption oracle error
    #[error("Oracle error: {0}")]
    Oracle(#[from] veil_engine::OracleError),
}
