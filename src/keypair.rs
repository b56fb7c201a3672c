//! Key Pair Materialization
//!
//! Wraps a derived private key with its public point. Public keys are
//! returned as the 64-byte `X || Y` pair; the backend's `0x04` tag is
//! stripped.

use std::fmt;

use tracing::{debug, warn};

use crate::config::SignerConfig;
use crate::crypto::backend::{BackendError, CryptoBackend};
use crate::crypto::path::DerivationPath;
use crate::crypto::secret::PrivateKey;
use crate::derive::derive_stark_private_key;
use crate::error::Result;

const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Uncompressed affine public point `X || Y`, big-endian coordinates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; 64]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn x(&self) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.0[..32]);
        x
    }

    pub fn y(&self) -> [u8; 32] {
        let mut y = [0u8; 32];
        y.copy_from_slice(&self.0[32..]);
        y
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the public point for `key` on the key's own curve.
///
/// The backend must return an uncompressed (`0x04`-tagged) point.
pub fn init_public_key<B: CryptoBackend + ?Sized>(
    backend: &B,
    key: &PrivateKey,
) -> Result<PublicKey> {
    let raw = backend.generate_public_key(key)?;
    if raw[0] != UNCOMPRESSED_POINT_TAG {
        warn!(tag = raw[0], "backend returned a non-uncompressed public point");
        return Err(BackendError::InvalidPointEncoding.into());
    }
    let mut point = [0u8; 64];
    point.copy_from_slice(&raw[1..]);
    debug!(curve = %key.curve(), "public key generated");
    Ok(PublicKey(point))
}

/// A Stark private key together with its public point.
#[derive(Debug)]
pub struct StarkKeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl StarkKeyPair {
    /// Derive the key at `path` and compute its public point.
    pub fn derive<B: CryptoBackend + ?Sized>(
        backend: &B,
        path: &DerivationPath,
        config: &SignerConfig,
    ) -> Result<Self> {
        let private_key = derive_stark_private_key(backend, path, config)?;
        let public_key = init_public_key(backend, &private_key)?;
        Ok(Self {
            private_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}
