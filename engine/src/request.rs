//! Operation requests.

use std::fmt;

use serde::{Deserialize, Serialize};
use veil_fhe::BitWidth;
use veil_registry::Handle;

/// The supported operation set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FheOperation {
    /// `(x << k) mod 2^w`; amounts at or beyond the width clear the value
    ShiftLeft = 0x01,
    /// `x >> k` (logical); amounts at or beyond the width clear the value
    ShiftRight = 0x02,
    /// Cyclic left rotation; the amount reduces modulo the width
    RotateLeft = 0x03,
    /// Cyclic right rotation; the amount reduces modulo the width
    RotateRight = 0x04,
    /// Two's-complement negation
    Negate = 0x10,
    /// Bitwise complement
    Not = 0x11,
}

impl FheOperation {
    /// Whether this operation takes no amount operand.
    pub fn is_unary(self) -> bool {
        matches!(self, FheOperation::Negate | FheOperation::Not)
    }
}

impl fmt::Display for FheOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FheOperation::ShiftLeft => "shift_left",
            FheOperation::ShiftRight => "shift_right",
            FheOperation::RotateLeft => "rotate_left",
            FheOperation::RotateRight => "rotate_right",
            FheOperation::Negate => "negate",
            FheOperation::Not => "not",
        };
        f.write_str(name)
    }
}

/// The shift/rotate amount operand: an encrypted 8-bit value by handle, or a
/// public 8-bit constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountOperand {
    Encrypted(Handle),
    Clear(u8),
}

/// One evaluation request.
///
/// `width` is the declared width of the left operand and determines the
/// result width; the amount operand, when present, is always 8 bits wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub op: FheOperation,
    pub width: BitWidth,
    pub lhs: Handle,
    pub amount: Option<AmountOperand>,
}

impl OperationRequest {
    /// A unary request (negate, not).
    pub fn unary(op: FheOperation, width: BitWidth, lhs: Handle) -> Self {
        Self {
            op,
            width,
            lhs,
            amount: None,
        }
    }

    /// A shift/rotate with an encrypted amount.
    pub fn with_encrypted_amount(
        op: FheOperation,
        width: BitWidth,
        lhs: Handle,
        amount: Handle,
    ) -> Self {
        Self {
            op,
            width,
            lhs,
            amount: Some(AmountOperand::Encrypted(amount)),
        }
    }

    /// A shift/rotate with a public constant amount.
    pub fn with_clear_amount(op: FheOperation, width: BitWidth, lhs: Handle, amount: u8) -> Self {
        Self {
            op,
            width,
            lhs,
            amount: Some(AmountOperand::Clear(amount)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert!(FheOperation::Negate.is_unary());
        assert!(FheOperation::Not.is_unary());
        assert!(!FheOperation::ShiftLeft.is_unary());
        assert!(!FheOperation::RotateRight.is_unary());
    }
}
