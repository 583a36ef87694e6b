//! VEIL FHE backend
//!
//! Homomorphic computation over fixed-width encrypted unsigned integers
//! using TFHE-rs. Supports widths of 8 through 256 bits.
//!
//! # Key Roles:
//! - ClientKey: encryption and decryption (held by the submitting party)
//! - ServerKey: homomorphic operations (installed on the evaluating thread)
//! - PublicKey: compact public-key encryption for input packaging
//!
//! # Architecture:
//! - `width` / `clear`: bit-width tags and range-checked clear values
//! - `ciphertext`: width-tagged encrypted integers with tagged serialization
//! - `ops`: the homomorphic operation kernels (shift, rotate, negate, complement)
//! - `semantics`: the clear-value model the kernels must agree with

pub mod ciphertext;
pub mod clear;
pub mod errors;
pub mod keys;
pub mod ops;
pub mod semantics;
pub mod width;

pub use ciphertext::EncryptedUint;
pub use clear::ClearUint;
pub use errors::{FheError, FheResult};
pub use keys::{ClientKey, KeyMaterial, PublicKey, ServerKey};
pub use ops::CipherOps;
pub use width::BitWidth;
