//! BIP-32 Derivation Paths
//!
//! Owned sequence of child indices plus the validation rules for the Stark
//! key family (EIP-2645): at least two levels, purpose fixed to `2645'`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants::{HARDENED, MAX_BIP32_PATH, STARK_PURPOSE_INDEX};
use crate::error::{Error, Result};

/// Ordered BIP-32 child indices, hardened bit included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn new(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    /// `m/2645'/rest...`
    pub fn stark(rest: &[u32]) -> Self {
        let mut indices = Vec::with_capacity(rest.len() + 1);
        indices.push(STARK_PURPOSE_INDEX);
        indices.extend_from_slice(rest);
        Self(indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(indices: Vec<u32>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.0 {
            if index & HARDENED != 0 {
                write!(f, "/{}'", index & !HARDENED)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Parse `m/2645'/579218131'/0` style notation (`h` also marks hardened).
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(Error::InvalidPath(format!("path must start with 'm': {}", s)));
        }

        let mut indices = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits
                .parse()
                .map_err(|_| Error::InvalidPath(format!("bad path component '{}'", part)))?;
            if index >= HARDENED {
                return Err(Error::InvalidPath(format!("index out of range '{}'", part)));
            }
            indices.push(if hardened { index | HARDENED } else { index });
        }
        Ok(Self(indices))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Depth check shared by every derivation entry point.
pub fn validate_depth(path: &DerivationPath, max_depth: usize) -> Result<()> {
    if path.is_empty() {
        return Err(Error::InvalidPath("empty path".into()));
    }
    if path.len() > max_depth.min(MAX_BIP32_PATH) {
        return Err(Error::InvalidPath(format!(
            "path depth {} exceeds {}",
            path.len(),
            max_depth.min(MAX_BIP32_PATH)
        )));
    }
    Ok(())
}

/// Stark key family check: `len >= 2` and purpose `2645'`.
///
/// Pure; touches no secret material.
pub fn validate_stark_path(path: &DerivationPath, max_depth: usize) -> Result<()> {
    if path.len() < 2 {
        return Err(Error::InvalidPath(format!(
            "stark path needs at least 2 levels, got {}",
            path.len()
        )));
    }
    if path.indices()[0] != STARK_PURPOSE_INDEX {
        return Err(Error::InvalidPath(format!(
            "stark path purpose must be 2645', got {:#010x}",
            path.indices()[0]
        )));
    }
    validate_depth(path, max_depth)
}
