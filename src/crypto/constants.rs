//! Curve Constants
//!
//! Fixed 256-bit values for the two curves involved in Stark key derivation.
//! All integers are stored big-endian, exactly as the big-integer helpers
//! consume them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Curves
// ============================================================================

/// Curve domain a seed or key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// secp256k1, the curve every HD seed is derived over
    Secp256k1,
    /// The Stark-friendly curve used by StarkEx / Starknet
    Stark256,
}

impl Curve {
    /// Scalar field order of the curve (big-endian)
    pub const fn order(&self) -> &'static [u8; 32] {
        match self {
            Curve::Secp256k1 => &SECP256K1_CURVE_ORDER,
            Curve::Stark256 => &STARK_CURVE_ORDER,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Secp256k1 => write!(f, "secp256k1"),
            Curve::Stark256 => write!(f, "stark256"),
        }
    }
}

// ============================================================================
// Derivation Constants
// ============================================================================

/// Hardened offset for BIP-32 indices
pub const HARDENED: u32 = 0x8000_0000;

/// EIP-2645 purpose level: `2645'`
pub const STARK_PURPOSE_INDEX: u32 = HARDENED | 2645;

/// Deepest path the derivation layer accepts
pub const MAX_BIP32_PATH: usize = 10;

/// Number of distinct values the one-byte retry index can take
pub const MAX_GRIND_ATTEMPTS: u16 = 256;

/// secp256k1 group order n
pub const SECP256K1_CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Stark curve group order n:
/// `0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f`
pub const STARK_CURVE_ORDER: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xb7, 0x81, 0x12, 0x6d, 0xca, 0xe7, 0xb2, 0x32, 0x1e, 0x66, 0xa2, 0x41, 0xad, 0xc6, 0x4d, 0x2f,
];

/// `SECP256K1_CURVE_ORDER - (SECP256K1_CURVE_ORDER % STARK_CURVE_ORDER)`
///
/// Candidates strictly below this value reduce uniformly into the Stark
/// scalar field.
pub const STARK_DERIVE_BIAS: [u8; 32] = [
    0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x0e, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xf7,
    0x38, 0xa1, 0x3b, 0x4b, 0x92, 0x0e, 0x94, 0x11, 0xae, 0x6d, 0xa5, 0xf4, 0x0b, 0x03, 0x58, 0xb1,
];

/// Half of the Stark order, rounded down. Low-S signatures keep `s <= STARK_HALF_ORDER`.
pub const STARK_HALF_ORDER: [u8; 32] = [
    0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xdb, 0xc0, 0x89, 0x36, 0xe5, 0x73, 0xd9, 0x19, 0x0f, 0x33, 0x51, 0x20, 0xd6, 0xe3, 0x26, 0x97,
];

// ============================================================================
// Signature Constants
// ============================================================================

/// DER `SEQUENCE { INTEGER r, INTEGER s }` upper bound for 256-bit integers
pub const MAX_DER_SIGNATURE_LEN: usize = 72;

/// Signature info flag: the nonce point R has an odd Y coordinate
pub const ECC_INFO_PARITY_ODD: u32 = 0x01;
