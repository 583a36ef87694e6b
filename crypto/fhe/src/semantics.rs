//! Clear-value semantics for the operation set.
//!
//! Width-parameterized plaintext formulas the homomorphic kernels must agree
//! with. `x` is always assumed reduced into `[0, 2^w)` (the [`crate::ClearUint`]
//! invariant); amounts are 8-bit quantities in `[0, 256)`.
//!
//! Amount handling differs between the families:
//! - shifts clear the value entirely once the amount reaches the width;
//! - rotations are periodic in the width, so the amount reduces mod `w`.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::width::BitWidth;

/// `2^w`.
pub fn modulus(width: BitWidth) -> BigUint {
    BigUint::one() << width.bits()
}

/// `2^w - 1`.
pub fn mask(width: BitWidth) -> BigUint {
    modulus(width) - 1u32
}

/// Shift amounts at or beyond the width clear the value; smaller amounts
/// pass through unchanged.
pub fn normalize_shift_amount(amount: u8, width: BitWidth) -> Option<u8> {
    if u32::from(amount) < width.bits() {
        Some(amount)
    } else {
        None
    }
}

/// Rotation amounts reduce modulo the width.
pub fn normalize_rotation_amount(amount: u8, width: BitWidth) -> u8 {
    (u32::from(amount) % width.bits()) as u8
}

/// `(x << k) mod 2^w`, zero once `k >= w`.
pub fn shift_left(x: &BigUint, amount: u8, width: BitWidth) -> BigUint {
    match normalize_shift_amount(amount, width) {
        Some(k) => (x << u32::from(k)) & mask(width),
        None => BigUint::zero(),
    }
}

/// `x >> k` (logical), zero once `k >= w`.
pub fn shift_right(x: &BigUint, amount: u8, width: BitWidth) -> BigUint {
    match normalize_shift_amount(amount, width) {
        Some(k) => x >> u32::from(k),
        None => BigUint::zero(),
    }
}

/// Cyclic left rotation by `k mod w`.
pub fn rotate_left(x: &BigUint, amount: u8, width: BitWidth) -> BigUint {
    let r = u32::from(normalize_rotation_amount(amount, width));
    if r == 0 {
        return x.clone();
    }
    ((x << r) | (x >> (width.bits() - r))) & mask(width)
}

/// Cyclic right rotation by `k mod w`; mirror of [`rotate_left`].
pub fn rotate_right(x: &BigUint, amount: u8, width: BitWidth) -> BigUint {
    let r = u32::from(normalize_rotation_amount(amount, width));
    if r == 0 {
        return x.clone();
    }
    rotate_left(x, (width.bits() - r) as u8, width)
}

/// Two's-complement negation: `(2^w - x) mod 2^w`.
pub fn negate(x: &BigUint, width: BitWidth) -> BigUint {
    if x.is_zero() {
        BigUint::zero()
    } else {
        modulus(width) - x
    }
}

/// Bitwise complement: `(2^w - 1) - x`.
pub fn complement(x: &BigUint, width: BitWidth) -> BigUint {
    mask(width) - x
}
