//! Deterministic Stark Signing
//!
//! Derives the Stark key for the session path and signs the session digest
//! with RFC 6979 nonces. The private key is dropped (and zeroized) before
//! returning on every path; the context output is only written on success.

use std::fmt;

use tracing::{debug, warn};

use crate::config::SignerConfig;
use crate::context::SessionContext;
use crate::crypto::backend::{BackendError, CryptoBackend};
use crate::crypto::constants::{ECC_INFO_PARITY_ODD, MAX_DER_SIGNATURE_LEN};
use crate::crypto::helpers::decode_der_signature;
use crate::crypto::secret::PrivateKey;
use crate::derive::derive_stark_private_key;
use crate::error::{Error, Result};
use crate::keypair::StarkKeyPair;

/// DER-encoded `(r, s)` plus the parity of the nonce point's Y coordinate.
#[derive(Clone)]
pub struct Signature {
    bytes: [u8; MAX_DER_SIGNATURE_LEN],
    len: usize,
    v: u8,
}

impl Signature {
    /// DER bytes
    pub fn as_der(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Recovery parity: 1 when R.y is odd
    pub fn v(&self) -> u8 {
        self.v
    }

    /// Big-endian `(r, s)`
    pub fn r_s(&self) -> Option<([u8; 32], [u8; 32])> {
        decode_der_signature(self.as_der())
    }

    pub fn r(&self) -> Option<[u8; 32]> {
        self.r_s().map(|(r, _)| r)
    }

    pub fn s(&self) -> Option<[u8; 32]> {
        self.r_s().map(|(_, s)| s)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_der())
    }
}

// Bytes past `len` are whatever the backend left there
impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.as_der() == other.as_der() && self.v == other.v
    }
}

impl Eq for Signature {}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("der", &self.to_hex())
            .field("v", &self.v)
            .finish()
    }
}

/// Sign `digest` with an already-derived key.
///
/// A digest the backend cannot map into the signing field is
/// `InvalidDigest`; any other backend error or an out-of-range length
/// becomes `SigningFailed`.
pub fn sign_digest<B: CryptoBackend + ?Sized>(
    backend: &B,
    key: &PrivateKey,
    digest: &[u8; 32],
    low_s: bool,
) -> Result<Signature> {
    let raw = backend
        .sign_deterministic(key, digest, low_s)
        .map_err(|e| match e {
            BackendError::DigestOutOfRange => {
                warn!("digest outside the signing field");
                Error::InvalidDigest
            }
            e => {
                warn!(error = %e, "signing primitive failed");
                Error::SigningFailed
            }
        })?;

    if raw.len == 0 || raw.len > MAX_DER_SIGNATURE_LEN {
        warn!(len = raw.len, "signing primitive returned invalid length");
        return Err(Error::SigningFailed);
    }

    let signature = Signature {
        bytes: raw.bytes,
        len: raw.len,
        v: (raw.info & ECC_INFO_PARITY_ODD) as u8,
    };
    debug!(len = signature.len, v = signature.v, "digest signed");
    Ok(signature)
}

/// Sign the session digest with the Stark key at the session path.
///
/// On success the signature is stored in `ctx`; on failure `ctx` is left
/// untouched.
pub fn sign_message<B: CryptoBackend + ?Sized>(
    backend: &B,
    ctx: &mut SessionContext,
    config: &SignerConfig,
) -> Result<()> {
    let key = derive_stark_private_key(backend, ctx.path(), config)?;
    let signature = sign_digest(backend, &key, ctx.digest(), config.low_s)?;
    drop(key);

    ctx.set_signature(signature);
    Ok(())
}

impl StarkKeyPair {
    /// Sign `digest` with this key pair.
    pub fn sign<B: CryptoBackend + ?Sized>(
        &self,
        backend: &B,
        digest: &[u8; 32],
        config: &SignerConfig,
    ) -> Result<Signature> {
        sign_digest(backend, self.private_key(), digest, config.low_s)
    }
}
