//! Shared fixtures for the integration suites.

use once_cell::sync::Lazy;
use veil::prelude::*;

/// One key set for the whole test binary; generation is expensive.
pub static KEYS: Lazy<KeyMaterial> = Lazy::new(KeyMaterial::generate);

pub const TEST_CONTEXT: [u8; 32] = [0x11; 32];
pub const TEST_CALLER: [u8; 32] = [0x22; 32];

/// A host over the shared keys with the server key installed on the calling
/// thread.
pub fn host() -> EngineHost {
    EngineHost::with_keys(KEYS.clone(), ContextId::new(TEST_CONTEXT))
}

pub fn caller() -> CallerId {
    CallerId::new(TEST_CALLER)
}

/// Decrypt a handle synchronously, bypassing the oracle. Verification shortcut
/// for non-oracle tests.
pub fn decrypt_u64(host: &EngineHost, handle: Handle) -> u64 {
    host.registry()
        .resolve(handle)
        .unwrap()
        .ciphertext()
        .decrypt(&KEYS.client)
        .to_u64_lossy()
}
