//! Error Types
//!
//! A single taxonomy for the derivation and signing core:
//!
//! - `InvalidPath`: rejected before any secret material is touched
//! - `OracleFailure`: a backend primitive failed, carried through unchanged
//! - `SigningFailed`: the signing primitive failed or produced garbage
//! - `InvalidDigest`: the request digest itself is unsignable
//!
//! Messages never include key material.

use thiserror::Error;

use crate::crypto::backend::BackendError;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or wrong-purpose derivation path
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// An underlying primitive failed
    #[error("oracle failure: {0}")]
    OracleFailure(#[from] BackendError),

    /// Signing primitive returned an error or an invalid length
    #[error("signing failed")]
    SigningFailed,

    /// Digest maps to a message outside the signing field
    #[error("message digest cannot be signed on this curve")]
    InvalidDigest,

    /// Every candidate in the bounded rejection loop was rejected
    #[error("no candidate below the bias threshold after {attempts} attempts")]
    DerivationExhausted { attempts: u16 },

    #[error("invalid signer configuration: {0}")]
    InvalidConfig(String),
}
