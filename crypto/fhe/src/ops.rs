//! Homomorphic operation kernels.
//!
//! Operations on encrypted values without decryption. The server key must be
//! installed on the calling thread before any kernel runs.
//!
//! Shift amounts at or beyond the operand width must produce zero, while the
//! underlying barrel shifter reduces amounts modulo the width; the kernels
//! therefore compare the encrypted amount against the width and select a zero
//! ciphertext when it is out of range. Rotations are periodic in the width, so
//! the barrel behaviour is already the contract.

use tfhe::integer::U256;
use tfhe::prelude::{CastInto, FheOrd, FheTryTrivialEncrypt, IfThenElse, RotateLeft, RotateRight};
use tfhe::{FheUint128, FheUint16, FheUint256, FheUint32, FheUint64, FheUint8};

use crate::ciphertext::EncryptedUint;
use crate::errors::{FheError, FheResult};
use crate::keys::ServerKey;
use crate::semantics;
use crate::width::BitWidth;

/// Trivially encrypt an 8-bit amount.
fn trivial_amount(amount: u8) -> FheResult<FheUint8> {
    FheUint8::try_encrypt_trivial(amount).map_err(|e| FheError::EncryptionFailed(e.to_string()))
}

/// Barrel shift/rotate dispatch: widen the 8-bit amount to the operand's
/// width, then apply the operator. Widths are powers of two, so the barrel
/// reduces the amount modulo the width.
macro_rules! dispatch_shift {
    ($a:expr, $amount:expr, $op:tt) => {
        match $a {
            EncryptedUint::U8(ct) => EncryptedUint::U8(ct $op $amount),
            EncryptedUint::U16(ct) => {
                let amt: FheUint16 = $amount.clone().cast_into();
                EncryptedUint::U16(ct $op &amt)
            }
            EncryptedUint::U32(ct) => {
                let amt: FheUint32 = $amount.clone().cast_into();
                EncryptedUint::U32(ct $op &amt)
            }
            EncryptedUint::U64(ct) => {
                let amt: FheUint64 = $amount.clone().cast_into();
                EncryptedUint::U64(ct $op &amt)
            }
            EncryptedUint::U128(ct) => {
                let amt: FheUint128 = $amount.clone().cast_into();
                EncryptedUint::U128(ct $op &amt)
            }
            EncryptedUint::U256(ct) => {
                let amt: FheUint256 = $amount.clone().cast_into();
                EncryptedUint::U256(ct $op &amt)
            }
        }
    };
}

macro_rules! dispatch_rotate {
    ($a:expr, $amount:expr, $method:ident) => {
        match $a {
            EncryptedUint::U8(ct) => EncryptedUint::U8(ct.$method($amount)),
            EncryptedUint::U16(ct) => {
                let amt: FheUint16 = $amount.clone().cast_into();
                EncryptedUint::U16(ct.$method(&amt))
            }
            EncryptedUint::U32(ct) => {
                let amt: FheUint32 = $amount.clone().cast_into();
                EncryptedUint::U32(ct.$method(&amt))
            }
            EncryptedUint::U64(ct) => {
                let amt: FheUint64 = $amount.clone().cast_into();
                EncryptedUint::U64(ct.$method(&amt))
            }
            EncryptedUint::U128(ct) => {
                let amt: FheUint128 = $amount.clone().cast_into();
                EncryptedUint::U128(ct.$method(&amt))
            }
            EncryptedUint::U256(ct) => {
                let amt: FheUint256 = $amount.clone().cast_into();
                EncryptedUint::U256(ct.$method(&amt))
            }
        }
    };
}

fn raw_shift_left(a: &EncryptedUint, amount: &FheUint8) -> EncryptedUint {
    dispatch_shift!(a, amount, <<)
}

fn raw_shift_right(a: &EncryptedUint, amount: &FheUint8) -> EncryptedUint {
    dispatch_shift!(a, amount, >>)
}

fn raw_rotate_left(a: &EncryptedUint, amount: &FheUint8) -> EncryptedUint {
    dispatch_rotate!(a, amount, rotate_left)
}

fn raw_rotate_right(a: &EncryptedUint, amount: &FheUint8) -> EncryptedUint {
    dispatch_rotate!(a, amount, rotate_right)
}

/// Replace a barrel-shift result with zero wherever the encrypted amount is
/// at or beyond the operand width. An 8-bit amount never reaches 256, so the
/// widest operands pass through untouched.
fn clamp_shift_overflow(raw: EncryptedUint, amount: &FheUint8) -> FheResult<EncryptedUint> {
    let width = raw.width();
    if width == BitWidth::U256 {
        return Ok(raw);
    }

    let bound = trivial_amount(width.bits() as u8)?;
    let in_range = amount.lt(&bound);
    let zero_err = |e: tfhe::Error| FheError::EncryptionFailed(e.to_string());

    let clamped = match raw {
        EncryptedUint::U8(ct) => {
            let zero = FheUint8::try_encrypt_trivial(0u8).map_err(zero_err)?;
            EncryptedUint::U8(in_range.if_then_else(&ct, &zero))
        }
        EncryptedUint::U16(ct) => {
            let zero = FheUint16::try_encrypt_trivial(0u16).map_err(zero_err)?;
            EncryptedUint::U16(in_range.if_then_else(&ct, &zero))
        }
        EncryptedUint::U32(ct) => {
            let zero = FheUint32::try_encrypt_trivial(0u32).map_err(zero_err)?;
            EncryptedUint::U32(in_range.if_then_else(&ct, &zero))
        }
        EncryptedUint::U64(ct) => {
            let zero = FheUint64::try_encrypt_trivial(0u64).map_err(zero_err)?;
            EncryptedUint::U64(in_range.if_then_else(&ct, &zero))
        }
        EncryptedUint::U128(ct) => {
            let zero = FheUint128::try_encrypt_trivial(0u128).map_err(zero_err)?;
            EncryptedUint::U128(in_range.if_then_else(&ct, &zero))
        }
        EncryptedUint::U256(ct) => EncryptedUint::U256(ct),
    };
    Ok(clamped)
}

/// FHE operation kernels using the installed server key.
pub struct CipherOps;

impl CipherOps {
    /// Logical shift left by an encrypted 8-bit amount.
    pub fn shift_left(
        a: &EncryptedUint,
        amount: &EncryptedUint,
        _server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        let amt = amount.as_amount()?;
        clamp_shift_overflow(raw_shift_left(a, amt), amt)
    }

    /// Logical shift right by an encrypted 8-bit amount.
    pub fn shift_right(
        a: &EncryptedUint,
        amount: &EncryptedUint,
        _server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        let amt = amount.as_amount()?;
        clamp_shift_overflow(raw_shift_right(a, amt), amt)
    }

    /// Cyclic left rotation by an encrypted 8-bit amount.
    pub fn rotate_left(
        a: &EncryptedUint,
        amount: &EncryptedUint,
        _server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        let amt = amount.as_amount()?;
        Ok(raw_rotate_left(a, amt))
    }

    /// Cyclic right rotation by an encrypted 8-bit amount.
    pub fn rotate_right(
        a: &EncryptedUint,
        amount: &EncryptedUint,
        _server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        let amt = amount.as_amount()?;
        Ok(raw_rotate_right(a, amt))
    }

    /// Logical shift left by a public amount.
    pub fn shift_left_clear(
        a: &EncryptedUint,
        amount: u8,
        server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        match semantics::normalize_shift_amount(amount, a.width()) {
            Some(k) => Ok(raw_shift_left(a, &trivial_amount(k)?)),
            None => Self::zero_like(a, server_key),
        }
    }

    /// Logical shift right by a public amount.
    pub fn shift_right_clear(
        a: &EncryptedUint,
        amount: u8,
        server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        match semantics::normalize_shift_amount(amount, a.width()) {
            Some(k) => Ok(raw_shift_right(a, &trivial_amount(k)?)),
            None => Self::zero_like(a, server_key),
        }
    }

    /// Cyclic left rotation by a public amount.
    pub fn rotate_left_clear(
        a: &EncryptedUint,
        amount: u8,
        _server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        let k = semantics::normalize_rotation_amount(amount, a.width());
        Ok(raw_rotate_left(a, &trivial_amount(k)?))
    }

    /// Cyclic right rotation by a public amount.
    pub fn rotate_right_clear(
        a: &EncryptedUint,
        amount: u8,
        _server_key: &ServerKey,
    ) -> FheResult<EncryptedUint> {
        let k = semantics::normalize_rotation_amount(amount, a.width());
        Ok(raw_rotate_right(a, &trivial_amount(k)?))
    }

    /// Two's-complement negation.
    pub fn negate(a: &EncryptedUint, _server_key: &ServerKey) -> FheResult<EncryptedUint> {
        Ok(match a {
            EncryptedUint::U8(ct) => EncryptedUint::U8(-ct),
            EncryptedUint::U16(ct) => EncryptedUint::U16(-ct),
            EncryptedUint::U32(ct) => EncryptedUint::U32(-ct),
            EncryptedUint::U64(ct) => EncryptedUint::U64(-ct),
            EncryptedUint::U128(ct) => EncryptedUint::U128(-ct),
            EncryptedUint::U256(ct) => EncryptedUint::U256(-ct),
        })
    }

    /// Bitwise complement.
    pub fn complement(a: &EncryptedUint, _server_key: &ServerKey) -> FheResult<EncryptedUint> {
        Ok(match a {
            EncryptedUint::U8(ct) => EncryptedUint::U8(!ct),
            EncryptedUint::U16(ct) => EncryptedUint::U16(!ct),
            EncryptedUint::U32(ct) => EncryptedUint::U32(!ct),
            EncryptedUint::U64(ct) => EncryptedUint::U64(!ct),
            EncryptedUint::U128(ct) => EncryptedUint::U128(!ct),
            EncryptedUint::U256(ct) => EncryptedUint::U256(!ct),
        })
    }

    /// A trivial zero ciphertext with the same width as `a`.
    pub fn zero_like(a: &EncryptedUint, _server_key: &ServerKey) -> FheResult<EncryptedUint> {
        let zero_err = |e: tfhe::Error| FheError::EncryptionFailed(e.to_string());
        Ok(match a {
            EncryptedUint::U8(_) => {
                EncryptedUint::U8(FheUint8::try_encrypt_trivial(0u8).map_err(zero_err)?)
            }
            EncryptedUint::U16(_) => {
                EncryptedUint::U16(FheUint16::try_encrypt_trivial(0u16).map_err(zero_err)?)
            }
            EncryptedUint::U32(_) => {
                EncryptedUint::U32(FheUint32::try_encrypt_trivial(0u32).map_err(zero_err)?)
            }
            EncryptedUint::U64(_) => {
                EncryptedUint::U64(FheUint64::try_encrypt_trivial(0u64).map_err(zero_err)?)
            }
            EncryptedUint::U128(_) => {
                EncryptedUint::U128(FheUint128::try_encrypt_trivial(0u128).map_err(zero_err)?)
            }
            EncryptedUint::U256(_) => {
                EncryptedUint::U256(FheUint256::try_encrypt_trivial(U256::ZERO).map_err(zero_err)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clear::ClearUint;
    use crate::keys::KeyMaterial;
    use num_bigint::BigUint;
    use once_cell::sync::Lazy;

    static KEYS: Lazy<KeyMaterial> = Lazy::new(KeyMaterial::generate);

    fn keys() -> &'static KeyMaterial {
        KEYS.install_server_key();
        &KEYS
    }

    fn trivial(value: u64, width: BitWidth) -> EncryptedUint {
        EncryptedUint::trivial(&ClearUint::from_u64(value, width).unwrap()).unwrap()
    }

    fn decrypt(ct: &EncryptedUint) -> BigUint {
        ct.decrypt(&KEYS.client).value().clone()
    }

    #[test]
    fn test_rotate_right_reduces_amount() {
        let keys = keys();
        let a = trivial(160, BitWidth::U8);
        let k = trivial(10, BitWidth::U8);
        let out = CipherOps::rotate_right(&a, &k, &keys.server).unwrap();
        assert_eq!(decrypt(&out), BigUint::from(40u32));
    }

    #[test]
    fn test_shift_left_clears_beyond_width() {
        let keys = keys();
        let a = trivial(0xffff, BitWidth::U16);
        let k = trivial(16, BitWidth::U8);
        let out = CipherOps::shift_left(&a, &k, &keys.server).unwrap();
        assert_eq!(decrypt(&out), BigUint::from(0u32));

        let out = CipherOps::shift_left_clear(&a, 16, &keys.server).unwrap();
        assert_eq!(decrypt(&out), BigUint::from(0u32));
    }

    #[test]
    fn test_shift_right_matches_reference() {
        let keys = keys();
        let a = trivial(3057669373, BitWidth::U32);
        let out = CipherOps::shift_right_clear(&a, 7, &keys.server).unwrap();
        assert_eq!(decrypt(&out), BigUint::from(23888041u32));
    }

    #[test]
    fn test_negate_and_complement() {
        let keys = keys();
        let a = trivial(112, BitWidth::U8);
        let neg = CipherOps::negate(&a, &keys.server).unwrap();
        assert_eq!(decrypt(&neg), BigUint::from(144u32));

        let a = trivial(171, BitWidth::U8);
        let not = CipherOps::complement(&a, &keys.server).unwrap();
        assert_eq!(decrypt(&not), BigUint::from(84u32));
    }

    #[test]
    fn test_amount_must_be_eight_bits() {
        let keys = keys();
        let a = trivial(1, BitWidth::U32);
        let wide_amount = trivial(1, BitWidth::U16);
        let err = CipherOps::shift_left(&a, &wide_amount, &keys.server).unwrap_err();
        assert!(matches!(
            err,
            FheError::WidthMismatch {
                expected: BitWidth::U8,
                found: BitWidth::U16
            }
        ));
    }

    #[test]
    fn test_encrypted_and_clear_amounts_agree() {
        let keys = keys();
        let a = trivial(0b1011_0110, BitWidth::U8);
        for k in [0u8, 1, 3, 7, 8, 9, 200] {
            let enc_k = trivial(u64::from(k), BitWidth::U8);
            let via_enc = CipherOps::shift_left(&a, &enc_k, &keys.server).unwrap();
            let via_clear = CipherOps::shift_left_clear(&a, k, &keys.server).unwrap();
            assert_eq!(decrypt(&via_enc), decrypt(&via_clear), "k={k}");

            let via_enc = CipherOps::rotate_left(&a, &enc_k, &keys.server).unwrap();
            let via_clear = CipherOps::rotate_left_clear(&a, k, &keys.server).unwrap();
            assert_eq!(decrypt(&via_enc), decrypt(&via_clear), "k={k}");
        }
    }
}
