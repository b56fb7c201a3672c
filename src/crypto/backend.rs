//! Cryptographic Backend Interface
//!
//! The derivation and signing code never does curve arithmetic itself. It
//! calls into a [`CryptoBackend`], which may be a hardware secure element,
//! the pure-Rust [`SoftwareBackend`](super::software::SoftwareBackend), or a
//! test double.

use std::cmp::Ordering;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::constants::{Curve, MAX_DER_SIGNATURE_LEN};
use super::helpers;
use super::path::DerivationPath;
use super::secret::{PrivateKey, SecretBuffer};

/// Errors raised by backend primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("master seed must be 16..=64 bytes")]
    InvalidSeed,

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("HD derivation failed at depth {depth}")]
    DerivationFailed { depth: usize },

    #[error("operation not supported on curve {0}")]
    UnsupportedCurve(Curve),

    #[error("scalar is not below the curve order")]
    InvalidScalar,

    #[error("point at infinity")]
    PointAtInfinity,

    #[error("public point is not tagged as uncompressed")]
    InvalidPointEncoding,

    #[error("message digest does not fit the signing field")]
    DigestOutOfRange,

    #[error("signing primitive failed: {0}")]
    Signing(String),

    #[error("zero modulus")]
    ZeroModulus,
}

/// Output of HD seed derivation: private node bytes and an optional chain code.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HdNode {
    pub seed: SecretBuffer<32>,
    pub chain_code: Option<[u8; 32]>,
}

/// Raw signing primitive output.
#[derive(Debug, Clone)]
pub struct RawSignature {
    /// DER-encoded `(r, s)`; only the first `len` bytes are meaningful
    pub bytes: [u8; MAX_DER_SIGNATURE_LEN],
    pub len: usize,
    /// Info flags, see [`ECC_INFO_PARITY_ODD`](super::constants::ECC_INFO_PARITY_ODD)
    pub info: u32,
}

/// Trusted primitives consumed by the derivation and signing core.
///
/// Implementations must be constant-time with respect to secret inputs.
/// `compare_unsigned` and `reduce_modulo` have portable defaults.
pub trait CryptoBackend {
    /// Walk the HD tree for `path` over `curve` and return the node at its end.
    fn derive_node(
        &self,
        curve: Curve,
        path: &DerivationPath,
        with_chain_code: bool,
    ) -> Result<HdNode, BackendError>;

    /// SHA-256
    fn hash256(&self, data: &[u8]) -> [u8; 32];

    fn compare_unsigned(&self, a: &[u8; 32], b: &[u8; 32]) -> Ordering {
        helpers::compare_unsigned(a, b)
    }

    fn reduce_modulo(&self, value: &[u8; 32], modulus: &[u8; 32]) -> Result<[u8; 32], BackendError> {
        helpers::reduce_modulo(value, modulus).ok_or(BackendError::ZeroModulus)
    }

    /// Public point for `key`, uncompressed: `0x04 || X || Y`.
    fn generate_public_key(&self, key: &PrivateKey) -> Result<[u8; 65], BackendError>;

    /// Deterministic (RFC 6979) ECDSA over a precomputed digest.
    fn sign_deterministic(
        &self,
        key: &PrivateKey,
        digest: &[u8; 32],
        low_s: bool,
    ) -> Result<RawSignature, BackendError>;
}
