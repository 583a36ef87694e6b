//! Engine host: one execution context wired end to end.

use std::sync::Arc;

use veil_engine::{Evaluator, LocalDecryptionOracle, OperationRequest};
use veil_fhe::{ClearUint, KeyMaterial, PublicKey};
use veil_ingress::{BindingVerifier, CallerId, ContextId, InputBatch, InputProcessor};
use veil_registry::{Handle, HandleRegistry};

use crate::error::HostResult;

/// Bundles the key material, registry, ingestion processor, and evaluator
/// for a single execution context.
///
/// Handles are scoped to the host that created them; a second host is a
/// second context with its own registry and keys.
pub struct EngineHost {
    context: ContextId,
    keys: KeyMaterial,
    registry: Arc<HandleRegistry>,
    processor: InputProcessor,
    evaluator: Evaluator,
}

impl EngineHost {
    /// Create a host with freshly generated keys. Key generation is
    /// expensive; prefer [`EngineHost::with_keys`] when a key set exists.
    pub fn new(context: ContextId) -> Self {
        Self::with_keys(KeyMaterial::generate(), context)
    }

    /// Create a host over an existing key set and install the server key on
    /// the current thread.
    pub fn with_keys(keys: KeyMaterial, context: ContextId) -> Self {
        let registry = Arc::new(HandleRegistry::new());
        let processor = InputProcessor::new(Arc::clone(&registry), Arc::new(BindingVerifier));
        let evaluator = Evaluator::new(Arc::clone(&registry), keys.server.clone());
        Self {
            context,
            keys,
            registry,
            processor,
            evaluator,
        }
    }

    /// The context this host evaluates for.
    pub fn context(&self) -> &ContextId {
        &self.context
    }

    /// Public key callers package inputs under.
    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    /// The context's handle registry.
    pub fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }

    /// Verify and register an input batch; handles come back in packaging
    /// order.
    pub fn ingest(&self, batch: &InputBatch, caller: &CallerId) -> HostResult<Vec<Handle>> {
        Ok(self.processor.ingest(batch, &self.context, caller)?)
    }

    /// Evaluate one operation request.
    pub fn evaluate(&self, request: &OperationRequest) -> HostResult<Handle> {
        Ok(self.evaluator.evaluate(request)?)
    }

    /// Register a public constant as a trivial ciphertext.
    pub fn trivial_encrypt(&self, value: &ClearUint) -> HostResult<Handle> {
        Ok(self.evaluator.trivial_encrypt(value)?)
    }

    /// Spawn the context's decryption oracle. Must be called inside a tokio
    /// runtime; the client key moves behind the oracle boundary.
    pub fn spawn_oracle(&self) -> LocalDecryptionOracle {
        LocalDecryptionOracle::spawn(Arc::clone(&self.registry), self.keys.client.clone())
    }
}
