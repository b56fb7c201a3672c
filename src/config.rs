//! Signer Configuration
//!
//! Tunables for derivation and signing. Every field has a default matching
//! the reference device behavior, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::crypto::constants::{MAX_BIP32_PATH, MAX_GRIND_ATTEMPTS};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    /// Upper bound on rejection-sampling candidates (1..=256)
    pub max_grind_attempts: u16,
    /// Canonicalize signatures to `s <= n / 2`
    pub low_s: bool,
    /// Deepest accepted derivation path (2..=10)
    pub max_path_depth: usize,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            max_grind_attempts: MAX_GRIND_ATTEMPTS,
            low_s: true,
            max_path_depth: MAX_BIP32_PATH,
        }
    }
}

impl SignerConfig {
    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_grind_attempts == 0 || self.max_grind_attempts > MAX_GRIND_ATTEMPTS {
            return Err(Error::InvalidConfig(format!(
                "max_grind_attempts must be in 1..={}, got {}",
                MAX_GRIND_ATTEMPTS, self.max_grind_attempts
            )));
        }
        if self.max_path_depth < 2 || self.max_path_depth > MAX_BIP32_PATH {
            return Err(Error::InvalidConfig(format!(
                "max_path_depth must be in 2..={}, got {}",
                MAX_BIP32_PATH, self.max_path_depth
            )));
        }
        Ok(())
    }
}
