//! Range-checked clear values.
//!
//! A [`ClearUint`] is the plaintext counterpart of an encrypted integer: an
//! unsigned value paired with the width it must fit. Construction enforces
//! `0 <= value < 2^width`; everything downstream relies on that invariant.

use std::fmt;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use tfhe::integer::U256;

use crate::errors::{FheError, FheResult};
use crate::width::BitWidth;

/// An unsigned clear value bound to a bit width.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearUint {
    value: BigUint,
    width: BitWidth,
}

impl ClearUint {
    /// Create a clear value, checking it fits the width.
    pub fn new(value: BigUint, width: BitWidth) -> FheResult<Self> {
        if value.bits() > u64::from(width.bits()) {
            return Err(FheError::ValueOutOfRange {
                width: width.bits(),
            });
        }
        Ok(Self { value, width })
    }

    /// Create from a native integer, checking it fits the width.
    pub fn from_u64(value: u64, width: BitWidth) -> FheResult<Self> {
        Self::new(BigUint::from(value), width)
    }

    /// Create from a u128, checking it fits the width.
    pub fn from_u128(value: u128, width: BitWidth) -> FheResult<Self> {
        Self::new(BigUint::from(value), width)
    }

    /// Construct without a range check. Only for values produced by
    /// decryption, which are in range by construction.
    pub(crate) fn trusted(value: BigUint, width: BitWidth) -> Self {
        Self { value, width }
    }

    /// The clear value.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The declared width.
    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Exclusive upper bound `2^width` for this value's width.
    pub fn modulus(width: BitWidth) -> BigUint {
        BigUint::one() << width.bits()
    }

    /// Big-endian bytes, right-aligned into 32 bytes.
    pub fn to_be_bytes32(&self) -> [u8; 32] {
        let raw = self.value.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    pub fn to_u64_lossy(&self) -> u64 {
        self.value.iter_u64_digits().next().unwrap_or(0)
    }

    pub fn to_u8(&self) -> u8 {
        self.to_u64_lossy() as u8
    }

    pub fn to_u16(&self) -> u16 {
        self.to_u64_lossy() as u16
    }

    pub fn to_u32(&self) -> u32 {
        self.to_u64_lossy() as u32
    }

    pub fn to_u128(&self) -> u128 {
        let mut digits = self.value.iter_u64_digits();
        let lo = digits.next().unwrap_or(0);
        let hi = digits.next().unwrap_or(0);
        (u128::from(hi) << 64) | u128::from(lo)
    }

    pub fn to_u256(&self) -> U256 {
        let mut out = U256::ZERO;
        out.copy_from_be_byte_slice(&self.to_be_bytes32());
        out
    }
}

impl fmt::Display for ClearUint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.value, self.width)
    }
}
