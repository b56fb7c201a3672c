//! Fixed-Width Integer and Encoding Helpers
//!
//! Shared utilities over 32-byte big-endian integers used by the derivation
//! and signing code:
//!
//! - **Comparison**: constant-time unsigned comparison
//! - **Reduction**: `value mod modulus`
//! - **DER**: ECDSA `(r, s)` encoding and decoding

use std::cmp::Ordering;

use crypto_bigint::{Encoding, NonZero, U256};
use subtle::{ConstantTimeGreater, ConstantTimeLess};
use zeroize::Zeroize;

use super::constants::MAX_DER_SIGNATURE_LEN;

// ============================================================================
// Comparison / Reduction
// ============================================================================

/// Compare two big-endian unsigned integers without data-dependent branches.
pub fn compare_unsigned(a: &[u8; 32], b: &[u8; 32]) -> Ordering {
    let mut x = U256::from_be_slice(a);
    let mut y = U256::from_be_slice(b);
    let lt: bool = x.ct_lt(&y).into();
    let gt: bool = x.ct_gt(&y).into();
    x.zeroize();
    y.zeroize();

    match (lt, gt) {
        (true, _) => Ordering::Less,
        (_, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// `a < b` over big-endian unsigned integers
pub fn lt_unsigned(a: &[u8; 32], b: &[u8; 32]) -> bool {
    compare_unsigned(a, b) == Ordering::Less
}

/// Reduce a big-endian integer modulo `modulus`.
///
/// Returns `None` if the modulus is zero.
pub fn reduce_modulo(value: &[u8; 32], modulus: &[u8; 32]) -> Option<[u8; 32]> {
    let modulus: Option<NonZero<U256>> = NonZero::new(U256::from_be_slice(modulus)).into();
    let modulus = modulus?;

    let mut x = U256::from_be_slice(value);
    let mut reduced = x.rem(&modulus);
    let mut out = [0u8; 32];
    out.copy_from_slice(&reduced.to_be_bytes());
    x.zeroize();
    reduced.zeroize();
    Some(out)
}

// ============================================================================
// DER Signatures
// ============================================================================

/// Write one DER INTEGER for a non-negative big-endian value.
fn push_der_integer(value: &[u8; 32], out: &mut [u8], pos: &mut usize) {
    let first = value.iter().position(|b| *b != 0).unwrap_or(31);
    let digits = &value[first..];
    let pad = digits[0] & 0x80 != 0;
    let len = digits.len() + usize::from(pad);

    out[*pos] = 0x02;
    out[*pos + 1] = len as u8;
    *pos += 2;
    if pad {
        out[*pos] = 0x00;
        *pos += 1;
    }
    out[*pos..*pos + digits.len()].copy_from_slice(digits);
    *pos += digits.len();
}

/// Encode `(r, s)` as `SEQUENCE { INTEGER r, INTEGER s }`.
///
/// Returns the number of bytes written to `out`.
pub fn encode_der_signature(
    r: &[u8; 32],
    s: &[u8; 32],
    out: &mut [u8; MAX_DER_SIGNATURE_LEN],
) -> usize {
    let mut pos = 2;
    push_der_integer(r, out, &mut pos);
    push_der_integer(s, out, &mut pos);
    out[0] = 0x30;
    out[1] = (pos - 2) as u8;
    pos
}

fn read_der_integer(der: &[u8], pos: &mut usize) -> Option<[u8; 32]> {
    if *der.get(*pos)? != 0x02 {
        return None;
    }
    let len = *der.get(*pos + 1)? as usize;
    let start = *pos + 2;
    let mut digits = der.get(start..start + len)?;
    *pos = start + len;

    if digits.is_empty() || digits[0] & 0x80 != 0 {
        return None;
    }
    if digits.len() > 1 && digits[0] == 0 {
        digits = &digits[1..];
    }
    if digits.len() > 32 {
        return None;
    }
    let mut value = [0u8; 32];
    value[32 - digits.len()..].copy_from_slice(digits);
    Some(value)
}

/// Decode a DER signature back into big-endian `(r, s)`.
pub fn decode_der_signature(der: &[u8]) -> Option<([u8; 32], [u8; 32])> {
    if der.len() < 2 || der[0] != 0x30 || der[1] as usize != der.len() - 2 {
        return None;
    }
    let mut pos = 2;
    let r = read_der_integer(der, &mut pos)?;
    let s = read_der_integer(der, &mut pos)?;
    if pos != der.len() {
        return None;
    }
    Some((r, s))
}

// ============================================================================
// Tests
// ============================================================================
