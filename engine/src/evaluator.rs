//! The operation evaluator.
//!
//! Validates a request, runs the homomorphic kernel, and registers exactly
//! one result handle. Computation completes before the handle is allocated,
//! so a failing request never mutates the registry.

use std::sync::Arc;

use tracing::debug;
use veil_fhe::{
    BitWidth, CipherOps, ClearUint, EncryptedUint, ServerKey, width::AMOUNT_WIDTH,
};
use veil_registry::{Handle, HandleRegistry, RegisteredCiphertext};

use crate::errors::{EngineError, EngineResult};
use crate::request::{AmountOperand, FheOperation, OperationRequest};

/// Evaluates operation requests against one context's registry.
pub struct Evaluator {
    registry: Arc<HandleRegistry>,
    server_key: ServerKey,
}

impl Evaluator {
    /// Create an evaluator and install the server key on the current thread.
    pub fn new(registry: Arc<HandleRegistry>, server_key: ServerKey) -> Self {
        server_key.install();
        Self {
            registry,
            server_key,
        }
    }

    /// The registry this evaluator writes results into.
    pub fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }

    /// Evaluate one request and register its result.
    pub fn evaluate(&self, request: &OperationRequest) -> EngineResult<Handle> {
        let lhs = self.registry.resolve(request.lhs)?;
        if lhs.width() != request.width {
            return Err(EngineError::BitWidthMismatch {
                expected: request.width,
                found: lhs.width(),
            });
        }

        let result = match (request.op.is_unary(), request.amount) {
            (true, Some(_)) => return Err(EngineError::UnexpectedAmount(request.op)),
            (false, None) => return Err(EngineError::MissingAmount(request.op)),
            (true, None) => self.apply_unary(request.op, &lhs)?,
            (false, Some(AmountOperand::Clear(k))) => self.apply_clear(request.op, &lhs, k)?,
            (false, Some(AmountOperand::Encrypted(amount))) => {
                let amount = self.registry.resolve(amount)?;
                if amount.width() != AMOUNT_WIDTH {
                    return Err(EngineError::BitWidthMismatch {
                        expected: AMOUNT_WIDTH,
                        found: amount.width(),
                    });
                }
                self.apply_encrypted(request.op, &lhs, &amount)?
            }
        };

        let handle = self.registry.register(result);
        debug!(op = %request.op, width = %request.width, %handle, "evaluated operation");
        Ok(handle)
    }

    /// Register a public constant as a trivial ciphertext.
    ///
    /// Gives harnesses and callers a handle-producing injection path for
    /// values that need no hiding.
    pub fn trivial_encrypt(&self, value: &ClearUint) -> EngineResult<Handle> {
        let ct = EncryptedUint::trivial(value)?;
        let handle = self.registry.register(ct);
        debug!(width = %value.width(), %handle, "trivially encrypted constant");
        Ok(handle)
    }

    fn apply_unary(
        &self,
        op: FheOperation,
        lhs: &RegisteredCiphertext,
    ) -> EngineResult<EncryptedUint> {
        let ct = lhs.ciphertext();
        let out = match op {
            FheOperation::Negate => CipherOps::negate(ct, &self.server_key)?,
            FheOperation::Not => CipherOps::complement(ct, &self.server_key)?,
            // is_unary() routed us here
            _ => unreachable!("binary operation in unary dispatch"),
        };
        Ok(out)
    }

    fn apply_clear(
        &self,
        op: FheOperation,
        lhs: &RegisteredCiphertext,
        amount: u8,
    ) -> EngineResult<EncryptedUint> {
        let ct = lhs.ciphertext();
        let key = &self.server_key;
        let out = match op {
            FheOperation::ShiftLeft => CipherOps::shift_left_clear(ct, amount, key)?,
            FheOperation::ShiftRight => CipherOps::shift_right_clear(ct, amount, key)?,
            FheOperation::RotateLeft => CipherOps::rotate_left_clear(ct, amount, key)?,
            FheOperation::RotateRight => CipherOps::rotate_right_clear(ct, amount, key)?,
            FheOperation::Negate | FheOperation::Not => {
                unreachable!("unary operation in binary dispatch")
            }
        };
        Ok(out)
    }

    fn apply_encrypted(
        &self,
        op: FheOperation,
        lhs: &RegisteredCiphertext,
        amount: &RegisteredCiphertext,
    ) -> EngineResult<EncryptedUint> {
        let ct = lhs.ciphertext();
        let amt = amount.ciphertext();
        let key = &self.server_key;
        let out = match op {
            FheOperation::ShiftLeft => CipherOps::shift_left(ct, amt, key)?,
            FheOperation::ShiftRight => CipherOps::shift_right(ct, amt, key)?,
            FheOperation::RotateLeft => CipherOps::rotate_left(ct, amt, key)?,
            FheOperation::RotateRight => CipherOps::rotate_right(ct, amt, key)?,
            FheOperation::Negate | FheOperation::Not => {
                unreachable!("unary operation in binary dispatch")
            }
        };
        Ok(out)
    }
}

/// Clear-value reference for the full operation set; the model every
/// evaluation must agree with once decrypted. `amount` is ignored by the
/// unary operations.
pub fn reference_eval(
    op: FheOperation,
    x: &num_bigint::BigUint,
    amount: Option<u8>,
    width: BitWidth,
) -> num_bigint::BigUint {
    use veil_fhe::semantics;
    let k = amount.unwrap_or(0);
    match op {
        FheOperation::ShiftLeft => semantics::shift_left(x, k, width),
        FheOperation::ShiftRight => semantics::shift_right(x, k, width),
        FheOperation::RotateLeft => semantics::rotate_left(x, k, width),
        FheOperation::RotateRight => semantics::rotate_right(x, k, width),
        FheOperation::Negate => semantics::negate(x, width),
        FheOperation::Not => semantics::complement(x, width),
    }
}
