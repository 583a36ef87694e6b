//! Ciphertext handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a registered ciphertext.
///
/// Handles are allocated monotonically within one execution context, so the
/// numeric order is the creation order. They are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    pub(crate) fn new(index: u64) -> Self {
        Self(index)
    }

    /// Position in the context's creation order.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{:016x}", self.0)
    }
}
