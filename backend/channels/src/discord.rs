//! Discord interaction request verification.
//!
//! Discord signs every webhook delivery with Ed25519 over the UTF-8
//! timestamp header followed by the raw request body. The signature and
//! the application public key both travel as lowercase hex.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
/// Header carrying the decimal timestamp string the signature covers.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Failure to turn wire-format signature material into key objects.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Odd length or a non-hex digit. Decoding fails outright rather than
    /// producing corrupt bytes.
    #[error("malformed hex encoding: {0}")]
    MalformedEncoding(#[from] hex::FromHexError),

    #[error("public key must be 32 bytes, got {0}")]
    KeyLength(usize),

    #[error("signature must be 64 bytes, got {0}")]
    SignatureLength(usize),

    #[error("invalid Ed25519 public key: {0}")]
    InvalidKey(#[from] ed25519_dalek::SignatureError),
}

/// Parse a hex-encoded Ed25519 public key.
pub fn parse_verifying_key(hex_key: &str) -> Result<VerifyingKey, SignatureError> {
    let bytes = hex::decode(hex_key)?;
    let key_bytes: [u8; PUBLIC_KEY_LEN] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| SignatureError::KeyLength(b.len()))?;
    Ok(VerifyingKey::from_bytes(&key_bytes)?)
}

/// Parse a hex-encoded Ed25519 signature.
pub fn parse_signature(hex_sig: &str) -> Result<Signature, SignatureError> {
    let bytes = hex::decode(hex_sig)?;
    let sig_bytes: [u8; SIGNATURE_LEN] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| SignatureError::SignatureLength(b.len()))?;
    Ok(Signature::from_bytes(&sig_bytes))
}

/// Verify an interaction request against the configured public key.
///
/// The signed message is the UTF-8 timestamp followed by the raw body
/// bytes, in that order. The scheme is Ed25519, fixed by policy; nothing
/// in the request selects the algorithm. Returns `false` on malformed hex
/// or key material as well as on a verification mismatch.
pub fn verify_signature(
    body: &[u8],
    signature_hex: &str,
    timestamp: &str,
    public_key_hex: &str,
) -> bool {
    let key = match parse_verifying_key(public_key_hex) {
        Ok(k) => k,
        Err(err) => {
            tracing::debug!(error = %err, "rejecting request with unusable public key");
            return false;
        }
    };
    let signature = match parse_signature(signature_hex) {
        Ok(s) => s,
        Err(err) => {
            tracing::debug!(error = %err, "rejecting request with unusable signature");
            return false;
        }
    };

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    key.verify(&message, &signature).is_ok()
}
