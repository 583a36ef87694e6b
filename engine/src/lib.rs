//! VEIL operation engine
//!
//! The semantic core: takes operation requests over registered handles
//! (or public constants), evaluates them homomorphically, and registers the
//! result under a fresh handle. Results are observed through the asynchronous
//! decryption oracle, never by the evaluator itself.

pub mod errors;
pub mod evaluator;
pub mod oracle;
pub mod request;

pub use errors::{EngineError, EngineResult, OracleError, OracleResult};
pub use evaluator::{reference_eval, Evaluator};
pub use oracle::{DecryptionOracle, DecryptionTicket, LocalDecryptionOracle};
pub use request::{AmountOperand, FheOperation, OperationRequest};
