//! Pure-Rust Backend
//!
//! [`CryptoBackend`] implementation holding a BIP-32 master node in memory.
//! Stands in for a secure element when the crate runs on a regular host.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::backend::{BackendError, CryptoBackend, HdNode, RawSignature};
use super::constants::Curve;
use super::hd::{self, ExtendedPrivateKey};
use super::mnemonic::{mnemonic_to_seed, parse_mnemonic, seed_to_master_key};
use super::path::DerivationPath;
use super::secret::{PrivateKey, SecretBuffer};
use super::stark;

/// Software backend rooted at a BIP-32 master node.
pub struct SoftwareBackend {
    master: ExtendedPrivateKey,
}

impl SoftwareBackend {
    /// Build from raw BIP-32 seed bytes (16..=64 bytes).
    pub fn from_seed(seed: &[u8]) -> Result<Self, BackendError> {
        let (key, chain_code) = seed_to_master_key(seed)?;
        Ok(Self {
            master: ExtendedPrivateKey { key, chain_code },
        })
    }

    /// Build from a BIP-39 phrase and optional passphrase.
    pub fn from_mnemonic(words: &str, passphrase: &str) -> Result<Self, BackendError> {
        let mnemonic = parse_mnemonic(words)?;
        let seed = mnemonic_to_seed(&mnemonic, passphrase);
        Self::from_seed(seed.as_bytes())
    }

    /// Hex-encoded seed, as found in test fixtures and dev configs.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, BackendError> {
        let mut seed = hex::decode(seed_hex.trim_start_matches("0x"))
            .map_err(|_| BackendError::InvalidSeed)?;
        let backend = Self::from_seed(&seed);
        seed.zeroize();
        backend
    }
}

impl CryptoBackend for SoftwareBackend {
    fn derive_node(
        &self,
        curve: Curve,
        path: &DerivationPath,
        with_chain_code: bool,
    ) -> Result<HdNode, BackendError> {
        if curve != Curve::Secp256k1 {
            return Err(BackendError::UnsupportedCurve(curve));
        }
        let node = hd::derive_path(&self.master, path.indices())?;
        let chain_code = with_chain_code.then(|| *node.chain_code.as_bytes());
        Ok(HdNode {
            seed: SecretBuffer::from_slice(node.key.as_bytes()),
            chain_code,
        })
    }

    fn hash256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn generate_public_key(&self, key: &PrivateKey) -> Result<[u8; 65], BackendError> {
        let scalar = SecretBuffer::from_slice(key.secret_bytes());
        match key.curve() {
            Curve::Secp256k1 => hd::public_key_uncompressed(&scalar),
            Curve::Stark256 => stark::public_key_uncompressed(&scalar),
        }
    }

    fn sign_deterministic(
        &self,
        key: &PrivateKey,
        digest: &[u8; 32],
        low_s: bool,
    ) -> Result<RawSignature, BackendError> {
        match key.curve() {
            Curve::Stark256 => {
                let scalar = SecretBuffer::from_slice(key.secret_bytes());
                stark::sign_digest(&scalar, digest, low_s)
            }
            curve => Err(BackendError::UnsupportedCurve(curve)),
        }
    }
}
