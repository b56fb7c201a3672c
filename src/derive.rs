//! Private Key Derivation
//!
//! Two entry points:
//!
//! - [`derive_private_key`]: a secp256k1 key imported straight from the HD
//!   node, together with its chain code.
//! - [`derive_stark_private_key`]: EIP-2645 Stark key. The secp256k1 node is
//!   ground into the Stark scalar field by rejection sampling:
//!
//! ```text
//! buf = node || i            (33 bytes, i = 0, 1, 2, ...)
//! h   = SHA-256(buf)
//! if h < STARK_DERIVE_BIAS:  key = h mod n_stark
//! ```
//!
//! `STARK_DERIVE_BIAS` is the largest multiple of the Stark order below the
//! secp256k1 order, so accepted candidates reduce uniformly.
//!
//! The retry index is a single byte, so at most 256 candidates exist. The
//! loop is bounded by `SignerConfig::max_grind_attempts` (default 256) and
//! fails with `DerivationExhausted` past it; each candidate is rejected with
//! probability ~3%, so reaching the bound is not a practical concern.

use std::cmp::Ordering;

use tracing::{debug, trace, warn};

use crate::config::SignerConfig;
use crate::crypto::backend::{BackendError, CryptoBackend};
use crate::crypto::constants::{Curve, STARK_CURVE_ORDER, STARK_DERIVE_BIAS};
use crate::crypto::path::{validate_depth, validate_stark_path, DerivationPath};
use crate::crypto::secret::{PrivateKey, SecretBuffer};
use crate::error::{Error, Result};

/// Derive a secp256k1 private key and chain code at `path`.
///
/// The HD node bytes are used as the scalar directly.
pub fn derive_private_key<B: CryptoBackend + ?Sized>(
    backend: &B,
    path: &DerivationPath,
    config: &SignerConfig,
) -> Result<(PrivateKey, [u8; 32])> {
    config.validate()?;
    validate_depth(path, config.max_path_depth)?;
    debug!(depth = path.len(), "deriving secp256k1 key");

    let node = backend.derive_node(Curve::Secp256k1, path, true)?;
    let chain_code = node
        .chain_code
        .ok_or(BackendError::DerivationFailed { depth: path.len() })?;
    let key = PrivateKey::from_bytes(Curve::Secp256k1, node.seed.as_bytes())?;
    Ok((key, chain_code))
}

/// Derive the EIP-2645 Stark private key at `path`.
///
/// The path is validated before the backend is touched.
pub fn derive_stark_private_key<B: CryptoBackend + ?Sized>(
    backend: &B,
    path: &DerivationPath,
    config: &SignerConfig,
) -> Result<PrivateKey> {
    config.validate()?;
    if let Err(e) = validate_stark_path(path, config.max_path_depth) {
        warn!(path = %path, "rejected stark derivation path");
        return Err(e);
    }
    debug!(depth = path.len(), "deriving stark key");

    let node = backend.derive_node(Curve::Secp256k1, path, false)?;
    grind_stark_scalar(backend, &node.seed, config.max_grind_attempts)
}

/// Map a 32-byte HD seed into the Stark scalar field.
///
/// Candidates equal to the bias threshold are rejected, as are candidates
/// that reduce to zero.
pub fn grind_stark_scalar<B: CryptoBackend + ?Sized>(
    backend: &B,
    seed: &SecretBuffer<32>,
    max_attempts: u16,
) -> Result<PrivateKey> {
    let mut work = SecretBuffer::<33>::new();
    work.as_mut_bytes()[..32].copy_from_slice(seed.as_bytes());
    let mut candidate = SecretBuffer::<32>::new();

    for attempt in 0..max_attempts {
        work.as_mut_bytes()[32] = attempt as u8;
        *candidate.as_mut_bytes() = backend.hash256(work.as_bytes());

        if backend.compare_unsigned(candidate.as_bytes(), &STARK_DERIVE_BIAS) == Ordering::Less {
            let mut reduced = backend.reduce_modulo(candidate.as_bytes(), &STARK_CURVE_ORDER)?;
            let scalar = SecretBuffer::take(&mut reduced);
            if !scalar.is_erased() {
                trace!(attempts = attempt + 1, "stark candidate accepted");
                return Ok(PrivateKey::from_bytes(Curve::Stark256, scalar.as_bytes())?);
            }
            trace!(attempt, "stark candidate reduced to zero, retrying");
            continue;
        }
        trace!(attempt, "stark candidate above bias, retrying");
    }

    warn!(attempts = max_attempts, "stark derivation exhausted retry index");
    Err(Error::DerivationExhausted {
        attempts: max_attempts,
    })
}
