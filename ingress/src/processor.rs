//! Server-side ingestion.

use std::sync::Arc;

use tfhe::prelude::CiphertextList;
use tfhe::{CompactCiphertextList, CompactCiphertextListExpander};
use tracing::info;
use veil_fhe::{BitWidth, EncryptedUint};
use veil_registry::{Handle, HandleRegistry};

use crate::batch::InputBatch;
use crate::errors::{IngressError, IngressResult};
use crate::proof::{CallerId, ContextId, InputVerifier};

/// Verifies input batches and registers their ciphertexts.
///
/// All-or-nothing per batch: the whole list is verified and expanded before
/// the first handle is allocated, so a failing batch leaves the registry
/// untouched.
pub struct InputProcessor {
    registry: Arc<HandleRegistry>,
    verifier: Arc<dyn InputVerifier>,
}

impl InputProcessor {
    /// Create a processor over the context's registry.
    pub fn new(registry: Arc<HandleRegistry>, verifier: Arc<dyn InputVerifier>) -> Self {
        Self { registry, verifier }
    }

    /// Verify a batch against the `(context, caller)` pair and register one
    /// handle per packaged value, in packaging order.
    ///
    /// Requires the server key installed on the current thread (list
    /// expansion keyswitches into computation-ready ciphertexts).
    pub fn ingest(
        &self,
        batch: &InputBatch,
        context: &ContextId,
        caller: &CallerId,
    ) -> IngressResult<Vec<Handle>> {
        self.verifier.verify(context, caller, batch)?;

        let list: CompactCiphertextList = bincode::deserialize(batch.list_bytes())
            .map_err(|e| proof_failure("undecodable ciphertext list", e))?;
        let expander = list
            .expand()
            .map_err(|e| proof_failure("ciphertext list expansion failed", e))?;
        if expander.len() != batch.widths().len() {
            return Err(IngressError::ProofVerificationFailed(format!(
                "declared {} values, list expands to {}",
                batch.widths().len(),
                expander.len()
            )));
        }

        let mut expanded = Vec::with_capacity(batch.widths().len());
        for (index, width) in batch.widths().iter().enumerate() {
            expanded.push(extract(&expander, index, *width)?);
        }

        let handles: Vec<Handle> = expanded
            .into_iter()
            .map(|ct| self.registry.register(ct))
            .collect();
        info!(count = handles.len(), %context, %caller, "ingested input batch");
        Ok(handles)
    }
}

fn extract(
    expander: &CompactCiphertextListExpander,
    index: usize,
    width: BitWidth,
) -> IngressResult<EncryptedUint> {
    let missing = || {
        IngressError::ProofVerificationFailed(format!(
            "packaged value {index} does not match its declared width {width}"
        ))
    };
    let mismatch =
        |e: tfhe::Error| IngressError::ProofVerificationFailed(format!("value {index}: {e}"));

    let ct = match width {
        BitWidth::U8 => {
            EncryptedUint::U8(expander.get(index).map_err(mismatch)?.ok_or_else(missing)?)
        }
        BitWidth::U16 => {
            EncryptedUint::U16(expander.get(index).map_err(mismatch)?.ok_or_else(missing)?)
        }
        BitWidth::U32 => {
            EncryptedUint::U32(expander.get(index).map_err(mismatch)?.ok_or_else(missing)?)
        }
        BitWidth::U64 => {
            EncryptedUint::U64(expander.get(index).map_err(mismatch)?.ok_or_else(missing)?)
        }
        BitWidth::U128 => {
            EncryptedUint::U128(expander.get(index).map_err(mismatch)?.ok_or_else(missing)?)
        }
        BitWidth::U256 => {
            EncryptedUint::U256(expander.get(index).map_err(mismatch)?.ok_or_else(missing)?)
        }
    };
    Ok(ct)
}

fn proof_failure<E: std::fmt::Display>(what: &str, e: E) -> IngressError {
    IngressError::ProofVerificationFailed(format!("{what}: {e}"))
}
