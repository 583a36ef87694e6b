//! Width-tagged encrypted integers.
//!
//! [`EncryptedUint`] wraps one TFHE ciphertext per supported width. The width
//! tag is fixed at creation and carried through serialization.

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tfhe::integer::U256;
use tfhe::prelude::{FheDecrypt, FheTryEncrypt, FheTryTrivialEncrypt};
use tfhe::{FheUint128, FheUint16, FheUint256, FheUint32, FheUint64, FheUint8};

use crate::clear::ClearUint;
use crate::errors::{FheError, FheResult};
use crate::keys::ClientKey;
use crate::width::{BitWidth, AMOUNT_WIDTH};

/// Version tag carried by every serialized ciphertext.
pub const CIPHERTEXT_FORMAT_VERSION: u16 = 1;

/// An encrypted unsigned integer of fixed width.
#[derive(Clone)]
pub enum EncryptedUint {
    U8(FheUint8),
    U16(FheUint16),
    U32(FheUint32),
    U64(FheUint64),
    U128(FheUint128),
    U256(FheUint256),
}

/// Serialized form: version + width tag + opaque payload.
#[derive(Serialize, Deserialize)]
struct TaggedCiphertext {
    version: u16,
    bits: u16,
    data: Vec<u8>,
}

impl EncryptedUint {
    /// The width this ciphertext was created with.
    pub fn width(&self) -> BitWidth {
        match self {
            EncryptedUint::U8(_) => BitWidth::U8,
            EncryptedUint::U16(_) => BitWidth::U16,
            EncryptedUint::U32(_) => BitWidth::U32,
            EncryptedUint::U64(_) => BitWidth::U64,
            EncryptedUint::U128(_) => BitWidth::U128,
            EncryptedUint::U256(_) => BitWidth::U256,
        }
    }

    /// Encrypt a clear value under the client key.
    pub fn encrypt(value: &ClearUint, client_key: &ClientKey) -> FheResult<Self> {
        let key = client_key.inner();
        let ct = match value.width() {
            BitWidth::U8 => EncryptedUint::U8(
                FheUint8::try_encrypt(value.to_u8(), key).map_err(encrypt_err)?,
            ),
            BitWidth::U16 => EncryptedUint::U16(
                FheUint16::try_encrypt(value.to_u16(), key).map_err(encrypt_err)?,
            ),
            BitWidth::U32 => EncryptedUint::U32(
                FheUint32::try_encrypt(value.to_u32(), key).map_err(encrypt_err)?,
            ),
            BitWidth::U64 => EncryptedUint::U64(
                FheUint64::try_encrypt(value.to_u64_lossy(), key).map_err(encrypt_err)?,
            ),
            BitWidth::U128 => EncryptedUint::U128(
                FheUint128::try_encrypt(value.to_u128(), key).map_err(encrypt_err)?,
            ),
            BitWidth::U256 => EncryptedUint::U256(
                FheUint256::try_encrypt(value.to_u256(), key).map_err(encrypt_err)?,
            ),
        };
        Ok(ct)
    }

    /// Trivially encrypt a clear value (no hiding; public constants only).
    /// Requires the server key installed on the current thread.
    pub fn trivial(value: &ClearUint) -> FheResult<Self> {
        let ct = match value.width() {
            BitWidth::U8 => EncryptedUint::U8(
                FheUint8::try_encrypt_trivial(value.to_u8()).map_err(encrypt_err)?,
            ),
            BitWidth::U16 => EncryptedUint::U16(
                FheUint16::try_encrypt_trivial(value.to_u16()).map_err(encrypt_err)?,
            ),
            BitWidth::U32 => EncryptedUint::U32(
                FheUint32::try_encrypt_trivial(value.to_u32()).map_err(encrypt_err)?,
            ),
            BitWidth::U64 => EncryptedUint::U64(
                FheUint64::try_encrypt_trivial(value.to_u64_lossy()).map_err(encrypt_err)?,
            ),
            BitWidth::U128 => EncryptedUint::U128(
                FheUint128::try_encrypt_trivial(value.to_u128()).map_err(encrypt_err)?,
            ),
            BitWidth::U256 => EncryptedUint::U256(
                FheUint256::try_encrypt_trivial(value.to_u256()).map_err(encrypt_err)?,
            ),
        };
        Ok(ct)
    }

    /// Decrypt with the client key.
    pub fn decrypt(&self, client_key: &ClientKey) -> ClearUint {
        let key = client_key.inner();
        match self {
            EncryptedUint::U8(ct) => {
                let v: u8 = ct.decrypt(key);
                ClearUint::trusted(BigUint::from(v), BitWidth::U8)
            }
            EncryptedUint::U16(ct) => {
                let v: u16 = ct.decrypt(key);
                ClearUint::trusted(BigUint::from(v), BitWidth::U16)
            }
            EncryptedUint::U32(ct) => {
                let v: u32 = ct.decrypt(key);
                ClearUint::trusted(BigUint::from(v), BitWidth::U32)
            }
            EncryptedUint::U64(ct) => {
                let v: u64 = ct.decrypt(key);
                ClearUint::trusted(BigUint::from(v), BitWidth::U64)
            }
            EncryptedUint::U128(ct) => {
                let v: u128 = ct.decrypt(key);
                ClearUint::trusted(BigUint::from(v), BitWidth::U128)
            }
            EncryptedUint::U256(ct) => {
                let v: U256 = ct.decrypt(key);
                let mut be = [0u8; 32];
                v.copy_to_be_byte_slice(&mut be);
                ClearUint::trusted(BigUint::from_bytes_be(&be), BitWidth::U256)
            }
        }
    }

    /// Serialize with version and width tags.
    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        let data = match self {
            EncryptedUint::U8(ct) => bincode::serialize(ct),
            EncryptedUint::U16(ct) => bincode::serialize(ct),
            EncryptedUint::U32(ct) => bincode::serialize(ct),
            EncryptedUint::U64(ct) => bincode::serialize(ct),
            EncryptedUint::U128(ct) => bincode::serialize(ct),
            EncryptedUint::U256(ct) => bincode::serialize(ct),
        }
        .map_err(|e| FheError::SerializationError(e.to_string()))?;

        let tagged = TaggedCiphertext {
            version: CIPHERTEXT_FORMAT_VERSION,
            bits: self.width().bits() as u16,
            data,
        };
        bincode::serialize(&tagged).map_err(|e| FheError::SerializationError(e.to_string()))
    }

    /// Deserialize, dispatching on the embedded width tag.
    pub fn from_bytes(bytes: &[u8]) -> FheResult<Self> {
        let tagged: TaggedCiphertext = bincode::deserialize(bytes)
            .map_err(|e| FheError::SerializationError(e.to_string()))?;
        if tagged.version != CIPHERTEXT_FORMAT_VERSION {
            return Err(FheError::InvalidCiphertext(format!(
                "unsupported ciphertext format version {}",
                tagged.version
            )));
        }

        let width = BitWidth::from_bits(u32::from(tagged.bits))?;
        let decode_err = |e: bincode::Error| FheError::InvalidCiphertext(e.to_string());
        let ct = match width {
            BitWidth::U8 => EncryptedUint::U8(bincode::deserialize(&tagged.data).map_err(decode_err)?),
            BitWidth::U16 => {
                EncryptedUint::U16(bincode::deserialize(&tagged.data).map_err(decode_err)?)
            }
            BitWidth::U32 => {
                EncryptedUint::U32(bincode::deserialize(&tagged.data).map_err(decode_err)?)
            }
            BitWidth::U64 => {
                EncryptedUint::U64(bincode::deserialize(&tagged.data).map_err(decode_err)?)
            }
            BitWidth::U128 => {
                EncryptedUint::U128(bincode::deserialize(&tagged.data).map_err(decode_err)?)
            }
            BitWidth::U256 => {
                EncryptedUint::U256(bincode::deserialize(&tagged.data).map_err(decode_err)?)
            }
        };
        Ok(ct)
    }

    /// View this ciphertext as a shift/rotate amount operand.
    /// Amounts are always carried at 8 bits.
    pub(crate) fn as_amount(&self) -> FheResult<&FheUint8> {
        match self {
            EncryptedUint::U8(ct) => Ok(ct),
            other => Err(FheError::WidthMismatch {
                expected: AMOUNT_WIDTH,
                found: other.width(),
            }),
        }
    }
}

impl fmt::Debug for EncryptedUint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedUint")
            .field("width", &self.width())
            .finish()
    }
}

fn encrypt_err<E: ToString>(e: E) -> FheError {
    FheError::EncryptionFailed(e.to_string())
}
