//! Caller-side input packaging.
//!
//! Values are range-checked as they are pushed, packaged into one TFHE
//! compact ciphertext list under the context's public key, and bound to the
//! `(context, caller)` pair with an [`InputProof`]. Packaging order is the
//! order handles come back in at ingestion.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tfhe::CompactCiphertextList;
use veil_fhe::{BitWidth, ClearUint, FheError, PublicKey};

use crate::errors::{IngressError, IngressResult};
use crate::proof::{CallerId, ContextId, InputProof};

/// A packaged input batch: one compact ciphertext list, the declared widths,
/// and the proof binding both to a `(context, caller)` pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputBatch {
    list_bytes: Vec<u8>,
    widths: Vec<BitWidth>,
    proof: InputProof,
}

impl InputBatch {
    /// Reassemble a batch received over a transport boundary. No validation
    /// happens here; ingestion verifies the proof against these exact parts.
    pub fn from_parts(list_bytes: Vec<u8>, widths: Vec<BitWidth>, proof: InputProof) -> Self {
        Self {
            list_bytes,
            widths,
            proof,
        }
    }

    /// Serialized compact ciphertext list.
    pub fn list_bytes(&self) -> &[u8] {
        &self.list_bytes
    }

    /// Declared width of each packaged value, in packaging order.
    pub fn widths(&self) -> &[BitWidth] {
        &self.widths
    }

    /// The batch's input proof.
    pub fn proof(&self) -> &InputProof {
        &self.proof
    }

    /// Number of packaged values.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Whether the batch packages no values.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Builder for [`InputBatch`].
pub struct InputBatchBuilder {
    context: ContextId,
    caller: CallerId,
    values: Vec<ClearUint>,
}

impl InputBatchBuilder {
    /// Start a batch bound to a `(context, caller)` pair.
    pub fn new(context: ContextId, caller: CallerId) -> Self {
        Self {
            context,
            caller,
            values: Vec::new(),
        }
    }

    /// Add an already-validated value.
    pub fn push(&mut self, value: ClearUint) -> &mut Self {
        self.values.push(value);
        self
    }

    /// Add a raw value, rejecting it if it does not fit the width.
    pub fn push_value(&mut self, value: BigUint, width: BitWidth) -> IngressResult<&mut Self> {
        self.values.push(ClearUint::new(value, width)?);
        Ok(self)
    }

    /// Number of values queued so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are queued.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encrypt the queued values into one compact list and bind it.
    pub fn build(&self, public_key: &PublicKey) -> IngressResult<InputBatch> {
        if self.values.is_empty() {
            return Err(IngressError::EmptyBatch);
        }

        let mut list_builder = CompactCiphertextList::builder(public_key.inner());
        for value in &self.values {
            match value.width() {
                BitWidth::U8 => list_builder.push(value.to_u8()),
                BitWidth::U16 => list_builder.push(value.to_u16()),
                BitWidth::U32 => list_builder.push(value.to_u32()),
                BitWidth::U64 => list_builder.push(value.to_u64_lossy()),
                BitWidth::U128 => list_builder.push(value.to_u128()),
                BitWidth::U256 => list_builder.push(value.to_u256()),
            };
        }
        let list = list_builder.build();

        let list_bytes = bincode::serialize(&list)
            .map_err(|e| IngressError::Fhe(FheError::SerializationError(e.to_string())))?;
        let widths: Vec<BitWidth> = self.values.iter().map(|v| v.width()).collect();
        let proof = InputProof::bind(&self.context, &self.caller, &widths, &list_bytes);

        Ok(InputBatch {
            list_bytes,
            widths,
            proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_value_range_checked() {
        let mut builder =
            InputBatchBuilder::new(ContextId::new([1u8; 32]), CallerId::new([2u8; 32]));
        assert!(builder.push_value(BigUint::from(255u32), BitWidth::U8).is_ok());
        let err = builder
            .push_value(BigUint::from(256u32), BitWidth::U8)
            .unwrap_err();
        assert!(matches!(
            err,
            IngressError::Fhe(FheError::ValueOutOfRange { width: 8 })
        ));
        assert_eq!(builder.len(), 1);
    }
}
