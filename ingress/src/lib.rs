//! VEIL input ingestion
//!
//! Callers package plaintext values into a single compact ciphertext list
//! bound to a `(context, caller)` pair; the processor verifies the binding,
//! expands the list, and registers one handle per value in packaging order.
//!
//! The verifier sits behind the [`InputVerifier`] trait so the commitment
//! check used here can be swapped for a full proof system at the integration
//! boundary without touching ingestion logic.

pub mod batch;
pub mod errors;
pub mod processor;
pub mod proof;

pub use batch::{InputBatch, InputBatchBuilder};
pub use errors::{IngressError, IngressResult};
pub use processor::InputProcessor;
pub use proof::{AcceptAllVerifier, BindingVerifier, CallerId, ContextId, InputProof, InputVerifier};
