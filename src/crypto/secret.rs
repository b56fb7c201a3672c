//! Secret Material Containers
//!
//! Every buffer that ever holds seed bytes, candidate hashes or private
//! scalars lives in one of these types. Both erase their contents on drop,
//! so early returns and `?` propagation never leave secrets behind.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::constants::Curve;
use super::helpers::lt_unsigned;
use crate::crypto::backend::BackendError;

// ============================================================================
// SecretBuffer
// ============================================================================

/// Fixed-size stack buffer that is zeroized when dropped.
///
/// Not `Clone`/`Copy`: a secret buffer has exactly one owner.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBuffer<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SecretBuffer<N> {
    /// All-zero buffer
    pub fn new() -> Self {
        Self { bytes: [0u8; N] }
    }

    /// Copy `src` into a fresh buffer.
    ///
    /// The caller stays responsible for its own copy of `src`.
    pub fn from_slice(src: &[u8; N]) -> Self {
        let mut buf = Self::new();
        buf.bytes.copy_from_slice(src);
        buf
    }

    /// Move `bytes` into a buffer, zeroizing the caller's array.
    pub fn take(bytes: &mut [u8; N]) -> Self {
        let buf = Self::from_slice(bytes);
        bytes.zeroize();
        buf
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    /// True when every byte is zero (i.e. after erasure). Constant-time.
    pub fn is_erased(&self) -> bool {
        self.bytes[..].ct_eq(&[0u8; N][..]).into()
    }
}

impl<const N: usize> Default for SecretBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for SecretBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer<{}>([REDACTED])", N)
    }
}

// ============================================================================
// PrivateKey
// ============================================================================

/// A private scalar tagged with the curve it belongs to.
///
/// Invariant: the scalar is non-zero and strictly below the curve order.
/// Instances are only produced by the derivation functions in this crate,
/// never copied, and erased on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    curve: Curve,
    scalar: SecretBuffer<32>,
}

impl PrivateKey {
    /// Import a raw big-endian scalar for `curve`.
    ///
    /// Fails with `InvalidScalar` if `raw` is zero or `raw >= order`.
    pub fn from_bytes(curve: Curve, raw: &[u8; 32]) -> Result<Self, BackendError> {
        let zero: bool = raw[..].ct_eq(&[0u8; 32][..]).into();
        if zero || !lt_unsigned(raw, curve.order()) {
            return Err(BackendError::InvalidScalar);
        }
        Ok(Self {
            curve,
            scalar: SecretBuffer::from_slice(raw),
        })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Borrow the raw scalar. Only the backend layer should need this.
    pub fn secret_bytes(&self) -> &[u8; 32] {
        self.scalar.as_bytes()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve)
            .field("scalar", &"[REDACTED]")
            .finish()
    }
}
