//! VEIL: Encrypted-Integer Operation Engine
//!
//! This is the root crate that re-exports all VEIL components and provides
//! the [`EngineHost`] facade used by embedders and the integration tests.
//!
//! ## Architecture Overview
//!
//! Callers package plaintext values into proof-bound ciphertext batches,
//! evaluate width-parameterized operations over the resulting handles, and
//! reveal results through an asynchronous decryption oracle:
//!
//! - **Ingestion**: plaintexts + proof → handles, in packaging order
//! - **Evaluation**: handles/constants → one fresh result handle per call
//! - **Decryption**: handle → eventual plaintext, verification only
//!
//! ## Crate Organization
//!
//! - `veil-fhe`: TFHE-rs backend with keys, ciphertexts, operation kernels
//! - `veil-registry`: append-only handle registry per execution context
//! - `veil-ingress`: input packaging, proof binding, ingestion
//! - `veil-engine`: the operation evaluator and the decryption oracle

pub mod error;
pub mod host;

// Re-export all crates for integration testing
pub use veil_engine as engine;
pub use veil_fhe as fhe;
pub use veil_ingress as ingress;
pub use veil_registry as registry;

pub use error::{HostError, HostResult};
pub use host::EngineHost;

/// VEIL protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::host::EngineHost;
    pub use veil_engine::{
        AmountOperand, DecryptionOracle, Evaluator, FheOperation, LocalDecryptionOracle,
        OperationRequest,
    };
    pub use veil_fhe::{BitWidth, ClearUint, EncryptedUint, KeyMaterial};
    pub use veil_ingress::{CallerId, ContextId, InputBatch, InputBatchBuilder};
    pub use veil_registry::{Handle, HandleRegistry};
}
