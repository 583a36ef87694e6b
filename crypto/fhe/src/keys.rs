//! Key management.
//!
//! - ClientKey: encryption and decryption (held by the submitting party)
//! - ServerKey: homomorphic operations (installed per evaluating thread)
//! - PublicKey: compact public key for packaging input batches
//!
//! Parameters use the dedicated compact-public-key configuration so that
//! compact ciphertext lists expand into computation-ready ciphertexts.

use serde::{Deserialize, Serialize};
use tfhe::shortint::parameters::{
    v1_0::compact_public_key_only::p_fail_2_minus_128::ks_pbs::V1_0_PARAM_PKE_MESSAGE_2_CARRY_2_KS_PBS_TUNIFORM_2M128,
    v1_0::key_switching::p_fail_2_minus_128::ks_pbs::V1_0_PARAM_KEYSWITCH_MESSAGE_2_CARRY_2_KS_PBS_TUNIFORM_2M128,
    CompactPublicKeyEncryptionParameters, ShortintKeySwitchingParameters,
    PARAM_MESSAGE_2_CARRY_2_KS_PBS_TUNIFORM_2M128,
};
use tfhe::shortint::ClassicPBSParameters;
use tfhe::{CompactPublicKey, CompressedServerKey, Config, ConfigBuilder};

use crate::errors::{FheError, FheResult};

const PBS_PARAMS: ClassicPBSParameters = PARAM_MESSAGE_2_CARRY_2_KS_PBS_TUNIFORM_2M128;
const COMPACT_PK_PARAMS: CompactPublicKeyEncryptionParameters =
    V1_0_PARAM_PKE_MESSAGE_2_CARRY_2_KS_PBS_TUNIFORM_2M128;
const KS_PARAMS: ShortintKeySwitchingParameters =
    V1_0_PARAM_KEYSWITCH_MESSAGE_2_CARRY_2_KS_PBS_TUNIFORM_2M128;

/// Label hashed into every key's configuration fingerprint.
const PARAMS_LABEL: &str = "veil/tfhe/m2c2-tuniform-2m128/v1";

fn build_config() -> Config {
    ConfigBuilder::with_custom_parameters(PBS_PARAMS)
        .use_dedicated_compact_public_key_parameters((COMPACT_PK_PARAMS, KS_PARAMS))
        .build()
}

fn config_fingerprint() -> [u8; 32] {
    *blake3::hash(PARAMS_LABEL.as_bytes()).as_bytes()
}

/// Client key for encryption and decryption.
/// Must be kept secret by the submitting party.
#[derive(Clone)]
pub struct ClientKey {
    inner: tfhe::ClientKey,
    config_hash: [u8; 32],
}

impl ClientKey {
    fn new(inner: tfhe::ClientKey) -> Self {
        Self {
            inner,
            config_hash: config_fingerprint(),
        }
    }

    /// Get reference to the inner TFHE key
    pub fn inner(&self) -> &tfhe::ClientKey {
        &self.inner
    }

    /// Fingerprint of the parameter set this key was generated under.
    pub fn config_hash(&self) -> &[u8; 32] {
        &self.config_hash
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        serialize_key(&self.inner)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> FheResult<Self> {
        Ok(Self::new(deserialize_key(bytes)?))
    }
}

/// Server key for homomorphic operations.
/// Shared with whoever evaluates operations; reveals nothing about plaintexts.
#[derive(Clone)]
pub struct ServerKey {
    inner: tfhe::ServerKey,
    config_hash: [u8; 32],
}

impl ServerKey {
    /// Get reference to the inner TFHE key
    pub fn inner(&self) -> &tfhe::ServerKey {
        &self.inner
    }

    /// Fingerprint of the parameter set this key was generated under.
    pub fn config_hash(&self) -> &[u8; 32] {
        &self.config_hash
    }

    /// Install this key for homomorphic operations on the current thread.
    /// TFHE-rs resolves the server key per thread; every thread that
    /// evaluates, expands, or trivially encrypts must install it first.
    pub fn install(&self) {
        tfhe::set_server_key(self.inner.clone());
    }
}

/// Compact public key for input packaging.
/// Can be published; encrypts but never decrypts.
#[derive(Clone)]
pub struct PublicKey {
    inner: CompactPublicKey,
    config_hash: [u8; 32],
}

impl PublicKey {
    /// Get reference to the inner TFHE key
    pub fn inner(&self) -> &CompactPublicKey {
        &self.inner
    }

    /// Fingerprint of the parameter set this key was generated under.
    pub fn config_hash(&self) -> &[u8; 32] {
        &self.config_hash
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        serialize_key(&self.inner)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> FheResult<Self> {
        Ok(Self {
            inner: deserialize_key(bytes)?,
            config_hash: config_fingerprint(),
        })
    }
}

/// The full key set for one execution context.
#[derive(Clone)]
pub struct KeyMaterial {
    pub client: ClientKey,
    pub server: ServerKey,
    pub public: PublicKey,
}

impl KeyMaterial {
    /// Generate a fresh key set. Expensive; do it once per context.
    pub fn generate() -> Self {
        let config = build_config();
        let client_key = tfhe::ClientKey::generate(config);
        let compressed = CompressedServerKey::new(&client_key);
        let server_key = compressed.decompress();
        let public_key = CompactPublicKey::new(&client_key);
        let config_hash = config_fingerprint();

        Self {
            client: ClientKey {
                inner: client_key,
                config_hash,
            },
            server: ServerKey {
                inner: server_key,
                config_hash,
            },
            public: PublicKey {
                inner: public_key,
                config_hash,
            },
        }
    }

    /// Install the server key on the current thread.
    pub fn install_server_key(&self) {
        self.server.install();
    }
}

fn serialize_key<K: Serialize>(key: &K) -> FheResult<Vec<u8>> {
    bincode::serialize(key).map_err(|e| FheError::SerializationError(e.to_string()))
}

fn deserialize_key<K: for<'de> Deserialize<'de>>(bytes: &[u8]) -> FheResult<K> {
    bincode::deserialize(bytes).map_err(|e| FheError::SerializationError(e.to_string()))
}
