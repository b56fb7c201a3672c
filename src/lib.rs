//! Stark HD Signer
//!
//! EIP-2645 Stark key derivation and deterministic signing, written against
//! a pluggable [`CryptoBackend`](crypto::backend::CryptoBackend).
//!
//! ```text
//! path ──▶ validate ──▶ derive_node (secp256k1) ──▶ grind ──▶ Stark key
//!                                                             │
//!                          digest ──▶ sign_deterministic ◀────┘
//! ```
//!
//! The flow for a signing request:
//!
//! 1. The caller fills a [`SessionContext`] with the path and digest.
//! 2. [`sign_message`] validates the path, derives the HD node and grinds
//!    it into the Stark field.
//! 3. The digest is signed with an RFC 6979 nonce; the key is wiped.
//! 4. On success the DER signature and parity bit land in the context.

pub mod config;
pub mod context;
pub mod crypto;
pub mod derive;
pub mod error;
pub mod keypair;
pub mod signing;

pub use config::SignerConfig;
pub use context::SessionContext;
pub use crypto::backend::{BackendError, CryptoBackend, HdNode, RawSignature};
pub use crypto::constants::Curve;
pub use crypto::path::DerivationPath;
pub use crypto::secret::PrivateKey;
pub use crypto::software::SoftwareBackend;
pub use derive::{derive_private_key, derive_stark_private_key};
pub use error::{Error, Result};
pub use keypair::{init_public_key, PublicKey, StarkKeyPair};
pub use signing::{sign_digest, sign_message, Signature};
