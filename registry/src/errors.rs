//! Registry error types

use thiserror::Error;

use crate::handle::Handle;

/// Errors that can occur resolving registry entries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Handle not present in this registry
    #[error("Unknown handle: {0}")]
    UnknownHandle(Handle),
}

/// Registry result type
pub type RegistryResult<T> = Result<T, RegistryError>;
