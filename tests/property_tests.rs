//! Property-based conformance for the operation engine.
//!
//! Random operands run through the full evaluator (trivially encrypted, so
//! the suite stays fast) and every decrypted result is checked against the
//! clear-value reference model, for both operand shapes.

mod common;

use common::{host, KEYS};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use veil::engine::reference_eval;
use veil::prelude::*;

const BINARY_OPS: [FheOperation; 4] = [
    FheOperation::ShiftLeft,
    FheOperation::ShiftRight,
    FheOperation::RotateLeft,
    FheOperation::RotateRight,
];

const UNARY_OPS: [FheOperation; 2] = [FheOperation::Negate, FheOperation::Not];

fn decrypt(host: &EngineHost, handle: Handle) -> BigUint {
    host.registry()
        .resolve(handle)
        .unwrap()
        .ciphertext()
        .decrypt(&KEYS.client)
        .value()
        .clone()
}

/// Run every operation over `(x, k)` at `width`, in both operand shapes, and
/// compare each decrypted result with the reference model.
fn check_all_ops(host: &EngineHost, x: &BigUint, k: u8, width: BitWidth) {
    let lhs = host
        .trivial_encrypt(&ClearUint::new(x.clone(), width).unwrap())
        .unwrap();
    let amount = host
        .trivial_encrypt(&ClearUint::from_u64(u64::from(k), BitWidth::U8).unwrap())
        .unwrap();

    for op in BINARY_OPS {
        let expected = reference_eval(op, x, Some(k), width);

        let via_clear = host
            .evaluate(&OperationRequest::with_clear_amount(op, width, lhs, k))
            .unwrap();
        assert_eq!(
            decrypt(host, via_clear),
            expected,
            "{op} clear amount x={x} k={k} {width}"
        );

        let via_encrypted = host
            .evaluate(&OperationRequest::with_encrypted_amount(op, width, lhs, amount))
            .unwrap();
        assert_eq!(
            decrypt(host, via_encrypted),
            expected,
            "{op} encrypted amount x={x} k={k} {width}"
        );
    }

    for op in UNARY_OPS {
        let expected = reference_eval(op, x, None, width);
        let out = host
            .evaluate(&OperationRequest::unary(op, width, lhs))
            .unwrap();
        assert_eq!(decrypt(host, out), expected, "{op} x={x} {width}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Engine agrees with the reference model on the narrow widths.
    #[test]
    fn engine_matches_reference_narrow(x in any::<u32>(), k in any::<u8>()) {
        let host = host();
        for width in [BitWidth::U8, BitWidth::U16, BitWidth::U32] {
            let masked = BigUint::from(x) % ClearUint::modulus(width);
            check_all_ops(&host, &masked, k, width);
        }
    }

    /// Boundary amounts: identity, width-1, width, beyond.
    #[test]
    fn engine_handles_boundary_amounts(x in any::<u16>()) {
        let host = host();
        let width = BitWidth::U16;
        let masked = BigUint::from(x);
        for k in [0u8, 1, 15, 16, 17, 255] {
            check_all_ops(&host, &masked, k, width);
        }
    }
}

/// Full sweep across every width, including the wide operands. Heavier;
/// run explicitly with `--ignored`.
#[test]
#[ignore]
fn engine_matches_reference_all_widths() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x7e11_ca57);
    let host = host();

    for width in BitWidth::ALL {
        for _ in 0..12 {
            let mut bytes = [0u8; 32];
            rng.fill(&mut bytes[..]);
            let x = BigUint::from_bytes_be(&bytes) % ClearUint::modulus(width);
            let k: u8 = rng.gen();
            check_all_ops(&host, &x, k, width);
        }
        // edge operands at every width
        for x in [
            BigUint::from(0u32),
            BigUint::from(1u32),
            ClearUint::modulus(width) - 1u32,
        ] {
            for k in [0u8, (width.bits() - 1) as u8, (width.bits() % 256) as u8, 255] {
                check_all_ops(&host, &x, k, width);
            }
        }
    }
}
