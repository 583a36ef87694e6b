//! Ingestion protocol tests: proof binding, replay rejection, atomicity.

mod common;

use common::{caller, decrypt_u64, host, KEYS};
use veil::ingress::IngressError;
use veil::prelude::*;
use veil::HostError;

fn two_value_batch(host: &EngineHost, caller: CallerId) -> InputBatch {
    let mut builder = InputBatchBuilder::new(*host.context(), caller);
    builder
        .push(ClearUint::from_u64(7, BitWidth::U8).unwrap())
        .push(ClearUint::from_u64(1000, BitWidth::U16).unwrap());
    builder.build(host.public_key()).unwrap()
}

#[test]
fn test_ingestion_preserves_packaging_order() {
    let host = host();
    let caller = caller();
    let handles = host.ingest(&two_value_batch(&host, caller), &caller).unwrap();

    assert_eq!(handles.len(), 2);
    assert_eq!(decrypt_u64(&host, handles[0]), 7);
    assert_eq!(decrypt_u64(&host, handles[1]), 1000);

    let first = host.registry().resolve(handles[0]).unwrap();
    let second = host.registry().resolve(handles[1]).unwrap();
    assert_eq!(first.width(), BitWidth::U8);
    assert_eq!(second.width(), BitWidth::U16);
}

#[test]
fn test_proof_rejected_for_other_caller() {
    let host = host();
    let batch = two_value_batch(&host, caller());

    let before = host.registry().len();
    let err = host.ingest(&batch, &CallerId::new([0x99; 32])).unwrap_err();
    assert!(matches!(
        err,
        HostError::Ingress(IngressError::ProofVerificationFailed(_))
    ));
    // atomic rejection: nothing registered
    assert_eq!(host.registry().len(), before);
}

#[test]
fn test_proof_rejected_for_other_context() {
    let caller = caller();
    let host = host();
    let foreign = EngineHost::with_keys(KEYS.clone(), ContextId::new([0x77; 32]));
    let batch = two_value_batch(&foreign, caller);

    let err = host.ingest(&batch, &caller).unwrap_err();
    assert!(matches!(
        err,
        HostError::Ingress(IngressError::ProofVerificationFailed(_))
    ));
}

#[test]
fn test_tampered_widths_rejected() {
    let host = host();
    let caller = caller();
    let batch = two_value_batch(&host, caller);

    // re-declare the second value's width without re-binding the proof
    let tampered = InputBatch::from_parts(
        batch.list_bytes().to_vec(),
        vec![BitWidth::U8, BitWidth::U8],
        batch.proof().clone(),
    );
    let err = host.ingest(&tampered, &caller).unwrap_err();
    assert!(matches!(
        err,
        HostError::Ingress(IngressError::ProofVerificationFailed(_))
    ));

    // corrupt a ciphertext byte without re-binding the proof
    let mut list = batch.list_bytes().to_vec();
    let mid = list.len() / 2;
    list[mid] ^= 0x01;
    let tampered = InputBatch::from_parts(list, batch.widths().to_vec(), batch.proof().clone());
    let err = host.ingest(&tampered, &caller).unwrap_err();
    assert!(matches!(
        err,
        HostError::Ingress(IngressError::ProofVerificationFailed(_))
    ));
}

#[test]
fn test_unknown_handle_for_foreign_registry() {
    let caller = caller();
    let host_a = host();
    let host_b = EngineHost::with_keys(KEYS.clone(), ContextId::new([0x55; 32]));

    let handles = host_b
        .ingest(&two_value_batch(&host_b, caller), &caller)
        .unwrap();
    // host_a never saw these handles
    let err = host_a
        .evaluate(&OperationRequest::unary(
            FheOperation::Not,
            BitWidth::U8,
            handles[0],
        ))
        .unwrap_err();
    assert!(matches!(err, HostError::Engine(_)));
}
