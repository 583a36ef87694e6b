//! The handle registry itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;
use veil_fhe::{BitWidth, EncryptedUint};

use crate::errors::{RegistryError, RegistryResult};
use crate::handle::Handle;

/// A ciphertext stored under a handle.
///
/// Immutable after registration; the width tag never changes.
#[derive(Debug)]
pub struct RegisteredCiphertext {
    handle: Handle,
    ciphertext: EncryptedUint,
}

impl RegisteredCiphertext {
    /// The handle this entry is registered under.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The stored ciphertext.
    pub fn ciphertext(&self) -> &EncryptedUint {
        &self.ciphertext
    }

    /// The ciphertext's width tag.
    pub fn width(&self) -> BitWidth {
        self.ciphertext.width()
    }
}

/// Handle → ciphertext map for one execution context.
///
/// Append-only: entries are never overwritten or removed for the registry's
/// lifetime, so concurrent registration only contends on counter allocation
/// and the map write lock.
#[derive(Default)]
pub struct HandleRegistry {
    next_index: AtomicU64,
    entries: RwLock<HashMap<Handle, Arc<RegisteredCiphertext>>>,
}

impl HandleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ciphertext under a fresh handle.
    pub fn register(&self, ciphertext: EncryptedUint) -> Handle {
        let handle = Handle::new(self.next_index.fetch_add(1, Ordering::Relaxed));
        let entry = Arc::new(RegisteredCiphertext { handle, ciphertext });
        self.entries.write().insert(handle, entry);
        trace!(%handle, "registered ciphertext");
        handle
    }

    /// Resolve a handle to its registered ciphertext.
    pub fn resolve(&self, handle: Handle) -> RegistryResult<Arc<RegisteredCiphertext>> {
        self.entries
            .read()
            .get(&handle)
            .cloned()
            .ok_or(RegistryError::UnknownHandle(handle))
    }

    /// Whether a handle is registered.
    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.read().contains_key(&handle)
    }

    /// Number of registered ciphertexts.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use veil_fhe::{ClearUint, KeyMaterial};

    static KEYS: Lazy<KeyMaterial> = Lazy::new(KeyMaterial::generate);

    fn trivial(value: u64, width: BitWidth) -> EncryptedUint {
        KEYS.install_server_key();
        EncryptedUint::trivial(&ClearUint::from_u64(value, width).unwrap()).unwrap()
    }

    #[test]
    fn test_handles_are_monotonic() {
        let registry = HandleRegistry::new();
        let a = registry.register(trivial(1, BitWidth::U8));
        let b = registry.register(trivial(2, BitWidth::U16));
        let c = registry.register(trivial(3, BitWidth::U32));
        assert!(a < b && b < c);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_resolve_preserves_width() {
        let registry = HandleRegistry::new();
        let handle = registry.register(trivial(7, BitWidth::U64));
        let entry = registry.resolve(handle).unwrap();
        assert_eq!(entry.handle(), handle);
        assert_eq!(entry.width(), BitWidth::U64);
    }

    #[test]
    fn test_unknown_handle() {
        let registry = HandleRegistry::new();
        let foreign = {
            let other = HandleRegistry::new();
            other.register(trivial(1, BitWidth::U8));
            other.register(trivial(2, BitWidth::U8))
        };
        // same numeric space, but this registry never allocated it
        let err = registry.resolve(foreign).unwrap_err();
        assert_eq!(err, RegistryError::UnknownHandle(foreign));
    }
}
