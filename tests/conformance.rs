//! Conformance vectors for the operation engine.
//!
//! Literal input/output pairs per operation, plus the full packaging →
//! ingestion → evaluation → decryption path.

mod common;

use common::{caller, decrypt_u64, host};
use veil::prelude::*;

#[test]
fn test_rotate_right_u8_reduces_amount() {
    let host = host();
    let x = host
        .trivial_encrypt(&ClearUint::from_u64(160, BitWidth::U8).unwrap())
        .unwrap();
    let k = host
        .trivial_encrypt(&ClearUint::from_u64(10, BitWidth::U8).unwrap())
        .unwrap();
    let out = host
        .evaluate(&OperationRequest::with_encrypted_amount(
            FheOperation::RotateRight,
            BitWidth::U8,
            x,
            k,
        ))
        .unwrap();
    assert_eq!(decrypt_u64(&host, out), 40);
}

#[test]
fn test_shift_left_u16() {
    let host = host();
    let x = host
        .trivial_encrypt(&ClearUint::from_u64(63467, BitWidth::U16).unwrap())
        .unwrap();
    let out = host
        .evaluate(&OperationRequest::with_clear_amount(
            FheOperation::ShiftLeft,
            BitWidth::U16,
            x,
            9,
        ))
        .unwrap();
    assert_eq!(decrypt_u64(&host, out), 54784);
}

#[test]
fn test_shift_right_u32() {
    let host = host();
    let x = host
        .trivial_encrypt(&ClearUint::from_u64(3057669373, BitWidth::U32).unwrap())
        .unwrap();
    let out = host
        .evaluate(&OperationRequest::with_clear_amount(
            FheOperation::ShiftRight,
            BitWidth::U32,
            x,
            7,
        ))
        .unwrap();
    assert_eq!(decrypt_u64(&host, out), 23888041);
}

#[test]
fn test_negate_u8() {
    let host = host();
    let x = host
        .trivial_encrypt(&ClearUint::from_u64(112, BitWidth::U8).unwrap())
        .unwrap();
    let out = host
        .evaluate(&OperationRequest::unary(FheOperation::Negate, BitWidth::U8, x))
        .unwrap();
    assert_eq!(decrypt_u64(&host, out), 144);
}

#[test]
fn test_not_u8() {
    let host = host();
    let x = host
        .trivial_encrypt(&ClearUint::from_u64(171, BitWidth::U8).unwrap())
        .unwrap();
    let out = host
        .evaluate(&OperationRequest::unary(FheOperation::Not, BitWidth::U8, x))
        .unwrap();
    assert_eq!(decrypt_u64(&host, out), 84);
}

/// Two values under one proof yield two handles in packaging order, and the
/// rotate over those handles matches the trivially-injected vector above.
#[test]
fn test_ingested_pair_rotates_like_scenario_one() {
    let host = host();
    let caller = caller();

    let mut builder = InputBatchBuilder::new(*host.context(), caller);
    builder
        .push(ClearUint::from_u64(160, BitWidth::U8).unwrap())
        .push(ClearUint::from_u64(10, BitWidth::U8).unwrap());
    let batch = builder.build(host.public_key()).unwrap();

    let handles = host.ingest(&batch, &caller).unwrap();
    assert_eq!(handles.len(), 2);
    assert!(handles[0] < handles[1]);

    let out = host
        .evaluate(&OperationRequest::with_encrypted_amount(
            FheOperation::RotateRight,
            BitWidth::U8,
            handles[0],
            handles[1],
        ))
        .unwrap();
    assert_eq!(decrypt_u64(&host, out), 40);
}
