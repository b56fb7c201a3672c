//! BIP-39 Mnemonic and BIP-32 Master Key
//!
//! Turns a recovery phrase (or raw seed bytes) into the BIP-32 master node
//! the software backend derives every path from.
//!
//! ## Usage
//!
//! ```ignore
//! let mnemonic = parse_mnemonic("abandon abandon ... about")?;
//! let seed = mnemonic_to_seed(&mnemonic, "");
//! let (master_key, chain_code) = seed_to_master_key(seed.as_bytes())?;
//! ```

use bip39::{Language, Mnemonic};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroize;

use super::backend::BackendError;
use super::constants::SECP256K1_CURVE_ORDER;
use super::helpers::lt_unsigned;
use super::secret::SecretBuffer;

// ============================================================================
// Mnemonic Handling
// ============================================================================

/// Parse mnemonic from space-separated English words
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic, BackendError> {
    Mnemonic::parse_in(Language::English, words)
        .map_err(|e| BackendError::InvalidMnemonic(e.to_string()))
}

/// Convert mnemonic to 512-bit seed using BIP-39 PBKDF2
///
/// The optional passphrase adds a second factor (the "25th word").
pub fn mnemonic_to_seed(mnemonic: &Mnemonic, passphrase: &str) -> SecretBuffer<64> {
    let mut seed = mnemonic.to_seed(passphrase);
    SecretBuffer::take(&mut seed)
}

// ============================================================================
// BIP-32 Master Key
// ============================================================================

/// Derive master key and chain code from a BIP-32 seed
///
/// Follows BIP-32: HMAC-SHA512("Bitcoin seed", seed)
/// Returns (master_key, chain_code)
pub fn seed_to_master_key(seed: &[u8]) -> Result<(SecretBuffer<32>, SecretBuffer<32>), BackendError> {
    if !(16..=64).contains(&seed.len()) {
        return Err(BackendError::InvalidSeed);
    }

    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| BackendError::InvalidSeed)?;
    hmac.update(seed);
    let mut result = [0u8; 64];
    result.copy_from_slice(&hmac.finalize().into_bytes());

    let mut master_key = SecretBuffer::<32>::new();
    let mut chain_code = SecretBuffer::<32>::new();
    master_key.as_mut_bytes().copy_from_slice(&result[..32]);
    chain_code.as_mut_bytes().copy_from_slice(&result[32..]);
    result.zeroize();

    // IL must be a valid non-zero secp256k1 scalar
    let valid = !master_key.is_erased()
        && lt_unsigned(master_key.as_bytes(), &SECP256K1_CURVE_ORDER);
    if !valid {
        return Err(BackendError::DerivationFailed { depth: 0 });
    }

    Ok((master_key, chain_code))
}

// ============================================================================
// Tests
// ============================================================================
