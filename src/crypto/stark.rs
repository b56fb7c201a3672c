//! Stark Curve Operations
//!
//! Public key generation and deterministic ECDSA over the Stark curve
//! (`y^2 = x^3 + x + beta` over `p = 2^251 + 17 * 2^192 + 1`).

use starknet_crypto::{rfc6979_generate_k, sign, Felt};
use starknet_types_core::curve::ProjectivePoint;

use super::backend::{BackendError, RawSignature};
use super::constants::{
    ECC_INFO_PARITY_ODD, MAX_DER_SIGNATURE_LEN, STARK_CURVE_ORDER, STARK_HALF_ORDER,
};
use super::helpers::{compare_unsigned, encode_der_signature, reduce_modulo};
use super::secret::SecretBuffer;

/// Generator x coordinate
const GENERATOR_X: Felt =
    Felt::from_hex_unchecked("0x1ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca");
/// Generator y coordinate
const GENERATOR_Y: Felt =
    Felt::from_hex_unchecked("0x5668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f");

/// Signed messages must be strictly below 2^251, i.e. the top byte below 0x08.
const MESSAGE_TOP_BYTE_BOUND: u8 = 0x08;

/// Map a 32-byte digest to the message the Stark ECDSA signs.
///
/// ECDSA `bits2int` keeps the leftmost 252 bits (the bit length of the
/// order), which is `digest >> 4`; the result is then reduced mod `n`.
/// A Starknet felt hash sent as `hash << 4` maps back to itself. Only the
/// ~2^-56 sliver `2^251 <= z < n` cannot be signed and yields
/// `DigestOutOfRange`.
pub fn message_from_digest(digest: &[u8; 32]) -> Result<[u8; 32], BackendError> {
    let mut truncated = [0u8; 32];
    for i in (1..32).rev() {
        truncated[i] = (digest[i] >> 4) | (digest[i - 1] << 4);
    }
    truncated[0] = digest[0] >> 4;

    let message =
        reduce_modulo(&truncated, &STARK_CURVE_ORDER).ok_or(BackendError::ZeroModulus)?;
    if message[0] >= MESSAGE_TOP_BYTE_BOUND {
        return Err(BackendError::DigestOutOfRange);
    }
    Ok(message)
}

/// `scalar * G`, uncompressed `0x04 || X || Y`
pub fn public_key_uncompressed(scalar: &SecretBuffer<32>) -> Result<[u8; 65], BackendError> {
    let generator = ProjectivePoint::from_affine(GENERATOR_X, GENERATOR_Y)
        .map_err(|_| BackendError::PointAtInfinity)?;
    let k = Felt::from_bytes_be(scalar.as_bytes());
    let point = (&generator * k)
        .to_affine()
        .map_err(|_| BackendError::PointAtInfinity)?;

    let mut out = [0u8; 65];
    out[0] = 0x04;
    out[1..33].copy_from_slice(&point.x().to_bytes_be());
    out[33..].copy_from_slice(&point.y().to_bytes_be());
    Ok(out)
}

/// RFC 6979 ECDSA over `digest`, DER-encoded.
///
/// The digest goes through [`message_from_digest`] first.
///
/// With `low_s`, `s` is replaced by `n - s` whenever it exceeds `n / 2`;
/// that corresponds to signing with `-R`, so the parity flag flips too.
pub fn sign_digest(
    scalar: &SecretBuffer<32>,
    digest: &[u8; 32],
    low_s: bool,
) -> Result<RawSignature, BackendError> {
    let message = Felt::from_bytes_be(&message_from_digest(digest)?);
    let private_key = Felt::from_bytes_be(scalar.as_bytes());
    let k = rfc6979_generate_k(&message, &private_key, None);
    let signature = sign(&private_key, &message, &k)
        .map_err(|e| BackendError::Signing(format!("{:?}", e)))?;

    let mut s = signature.s;
    let mut odd = signature.v == Felt::ONE;
    if low_s && compare_unsigned(&s.to_bytes_be(), &STARK_HALF_ORDER).is_gt() {
        s = Felt::from_bytes_be(&STARK_CURVE_ORDER) - s;
        odd = !odd;
    }

    let mut bytes = [0u8; MAX_DER_SIGNATURE_LEN];
    let len = encode_der_signature(&signature.r.to_bytes_be(), &s.to_bytes_be(), &mut bytes);
    Ok(RawSignature {
        bytes,
        len,
        info: if odd { ECC_INFO_PARITY_ODD } else { 0 },
    })
}
