//! BIP-32 Private Child Key Derivation over secp256k1
//!
//! Walks a derivation path from the master node, supporting both hardened
//! and non-hardened indices:
//!
//! ```text
//! hardened:     I = HMAC-SHA512(c_par, 0x00 || k_par || index)
//! non-hardened: I = HMAC-SHA512(c_par, serP(k_par * G) || index)
//! k_child = IL + k_par (mod n),  c_child = IR
//! ```
//!
//! Every intermediate key lives in a [`SecretBuffer`].

use hmac::{Hmac, Mac};
use secp256kfun::prelude::*;
use sha2::Sha512;
use zeroize::Zeroize;

use super::backend::BackendError;
use super::constants::HARDENED;
use super::secret::SecretBuffer;

/// A private node in the BIP-32 tree
pub struct ExtendedPrivateKey {
    pub key: SecretBuffer<32>,
    pub chain_code: SecretBuffer<32>,
}

/// Parse 32 bytes as a non-zero secp256k1 scalar
fn secret_scalar(bytes: &SecretBuffer<32>) -> Option<Scalar<Secret, NonZero>> {
    Scalar::<Secret, Zero>::from_bytes(*bytes.as_bytes())?.non_zero()
}

/// Compute the child of `parent` at `index`.
///
/// Fails (the caller moves on or aborts) in the ~2^-127 case where IL is
/// not below the order or the child key is zero.
pub fn derive_child(
    parent: &ExtendedPrivateKey,
    index: u32,
) -> Result<ExtendedPrivateKey, BackendError> {
    let invalid = || BackendError::InvalidScalar;
    let parent_scalar = secret_scalar(&parent.key).ok_or_else(invalid)?;

    let mut hmac = Hmac::<Sha512>::new_from_slice(parent.chain_code.as_bytes())
        .map_err(|_| BackendError::InvalidSeed)?;
    if index & HARDENED != 0 {
        hmac.update(&[0x00]);
        hmac.update(parent.key.as_bytes());
    } else {
        let parent_point = g!(parent_scalar * G)
            .normalize()
            .non_zero()
            .ok_or(BackendError::PointAtInfinity)?;
        hmac.update(&parent_point.to_bytes());
    }
    hmac.update(&index.to_be_bytes());

    let mut result = [0u8; 64];
    result.copy_from_slice(&hmac.finalize().into_bytes());
    let mut il = SecretBuffer::<32>::new();
    let mut chain_code = SecretBuffer::<32>::new();
    il.as_mut_bytes().copy_from_slice(&result[..32]);
    chain_code.as_mut_bytes().copy_from_slice(&result[32..]);
    result.zeroize();

    let tweak = Scalar::<Secret, Zero>::from_bytes(*il.as_bytes()).ok_or_else(invalid)?;
    let child = s!(tweak + parent_scalar).non_zero().ok_or_else(invalid)?;

    let mut child_bytes = child.to_bytes();
    Ok(ExtendedPrivateKey {
        key: SecretBuffer::take(&mut child_bytes),
        chain_code,
    })
}

/// Derive the node at `path` starting from `master`.
pub fn derive_path(
    master: &ExtendedPrivateKey,
    path: &[u32],
) -> Result<ExtendedPrivateKey, BackendError> {
    let mut node = ExtendedPrivateKey {
        key: SecretBuffer::from_slice(master.key.as_bytes()),
        chain_code: SecretBuffer::from_slice(master.chain_code.as_bytes()),
    };
    for (depth, index) in path.iter().enumerate() {
        node = derive_child(&node, *index)
            .map_err(|_| BackendError::DerivationFailed { depth: depth + 1 })?;
    }
    Ok(node)
}

/// Uncompressed `0x04 || X || Y` public key for a secp256k1 secret
pub fn public_key_uncompressed(secret: &SecretBuffer<32>) -> Result<[u8; 65], BackendError> {
    let scalar = secret_scalar(secret).ok_or(BackendError::InvalidScalar)?;
    let point = g!(scalar * G)
        .normalize()
        .non_zero()
        .ok_or(BackendError::PointAtInfinity)?;
    Ok(point.to_bytes_uncompressed())
}

// ============================================================================
// Tests
// ============================================================================
