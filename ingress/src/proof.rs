//! Input proofs and their verification.
//!
//! An [`InputProof`] binds one packaged batch to the `(context, caller)` pair
//! it was produced for. Replaying a proof against any other pair, or altering
//! the packaged ciphertexts or their declared widths, breaks the binding.

use std::fmt;

use serde::{Deserialize, Serialize};
use veil_fhe::BitWidth;

use crate::batch::InputBatch;
use crate::errors::{IngressError, IngressResult};

/// Domain separator for input-proof bindings.
const PROOF_DOMAIN: &[u8] = b"veil.input-proof.v1";

/// Identifier of the execution context inputs are bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId([u8; 32]);

impl ContextId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx:{}", hex::encode(&self.0[..8]))
    }
}

/// Identifier of the submitting caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId([u8; 32]);

impl CallerId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "caller:{}", hex::encode(&self.0[..8]))
    }
}

/// Binding of a packaged batch to its `(context, caller)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof {
    binding: [u8; 32],
}

impl InputProof {
    pub(crate) fn bind(
        context: &ContextId,
        caller: &CallerId,
        widths: &[BitWidth],
        list_bytes: &[u8],
    ) -> Self {
        Self {
            binding: compute_binding(context, caller, widths, list_bytes),
        }
    }

    /// The binding digest.
    pub fn binding(&self) -> &[u8; 32] {
        &self.binding
    }
}

fn compute_binding(
    context: &ContextId,
    caller: &CallerId,
    widths: &[BitWidth],
    list_bytes: &[u8],
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(PROOF_DOMAIN);
    hasher.update(context.as_bytes());
    hasher.update(caller.as_bytes());
    hasher.update(&(widths.len() as u32).to_le_bytes());
    for width in widths {
        hasher.update(&width.bits().to_le_bytes());
    }
    hasher.update(blake3::hash(list_bytes).as_bytes());
    *hasher.finalize().as_bytes()
}

/// Verification of an input batch against a `(context, caller)` pair.
///
/// Injected so the commitment check below can be replaced by a full
/// zero-knowledge verifier at the integration boundary.
pub trait InputVerifier: Send + Sync {
    fn verify(
        &self,
        context: &ContextId,
        caller: &CallerId,
        batch: &InputBatch,
    ) -> IngressResult<()>;
}

/// Recomputes the blake3 binding and compares it to the batch's proof.
#[derive(Default)]
pub struct BindingVerifier;

impl InputVerifier for BindingVerifier {
    fn verify(
        &self,
        context: &ContextId,
        caller: &CallerId,
        batch: &InputBatch,
    ) -> IngressResult<()> {
        let expected = compute_binding(context, caller, batch.widths(), batch.list_bytes());
        if &expected != batch.proof().binding() {
            return Err(IngressError::ProofVerificationFailed(format!(
                "binding mismatch for {context} / {caller}"
            )));
        }
        Ok(())
    }
}

/// Accepts every batch. Stub for harnesses that exercise ingestion mechanics
/// without a binding; never use where proofs carry meaning.
#[derive(Default)]
pub struct AcceptAllVerifier;

impl InputVerifier for AcceptAllVerifier {
    fn verify(&self, _: &ContextId, _: &CallerId, _: &InputBatch) -> IngressResult<()> {
        Ok(())
    }
}
