//! Digest and encoding primitives shared by the signing strategies.
//!
//! Provides:
//! - HMAC signing (SHA256/SHA384/SHA512/MD5) over raw byte keys
//! - Plain hashes (SHA256/SHA384/SHA512/MD5)
//! - Hex, upper-case hex and base64 output encodings
//! - HS256 JSON Web Tokens
//! - Lenient base64 decoding for secrets shipped without padding

use crate::error::{Error, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine as _, engine::general_purpose};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;

/// Base64 decoder that accepts secrets with or without `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Digest algorithms used by exchange signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// MD5
    Md5,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Md5 => "md5",
        };
        write!(f, "{s}")
    }
}

/// Output encoding of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestFormat {
    /// Lower-case hex.
    Hex,
    /// Upper-case hex.
    UpperHex,
    /// Standard base64 with padding.
    Base64,
}

/// Computes an HMAC and encodes it.
///
/// # Example
///
/// ```rust
/// use bitex_core::auth::{hmac_sign, HashAlgorithm, DigestFormat};
///
/// let sig = hmac_sign("test", "secret", HashAlgorithm::Sha256, DigestFormat::Hex).unwrap();
/// assert_eq!(sig, "0329a06b62cd16b33eb6792be8c60b158d89a2ee3a876fce9a881ebb488c0914");
/// ```
pub fn hmac_sign(
    message: impl AsRef<[u8]>,
    secret: impl AsRef<[u8]>,
    algorithm: HashAlgorithm,
    digest: DigestFormat,
) -> Result<String> {
    let raw = hmac_raw(message.as_ref(), secret.as_ref(), algorithm)?;
    Ok(encode_bytes(&raw, digest))
}

/// Computes an HMAC and returns the raw bytes.
pub fn hmac_raw(message: &[u8], secret: &[u8], algorithm: HashAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        HashAlgorithm::Sha256 => mac::<Hmac<Sha256>>(message, secret),
        HashAlgorithm::Sha384 => mac::<Hmac<Sha384>>(message, secret),
        HashAlgorithm::Sha512 => mac::<Hmac<Sha512>>(message, secret),
        HashAlgorithm::Md5 => mac::<Hmac<Md5>>(message, secret),
    }
}

fn mac<M: Mac + KeyInit>(message: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|e| Error::authentication(format!("unusable HMAC key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Hashes `data` and encodes the result.
///
/// ```rust
/// use bitex_core::auth::{hash, HashAlgorithm, DigestFormat};
///
/// let h = hash("test", HashAlgorithm::Sha256, DigestFormat::Hex);
/// assert_eq!(h, "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08");
/// ```
pub fn hash(data: impl AsRef<[u8]>, algorithm: HashAlgorithm, digest: DigestFormat) -> String {
    encode_bytes(&hash_raw(data.as_ref(), algorithm), digest)
}

/// Hashes `data` and returns the raw bytes.
pub fn hash_raw(data: &[u8], algorithm: HashAlgorithm) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
    }
}

/// Encodes raw digest bytes.
pub fn encode_bytes(bytes: &[u8], format: DigestFormat) -> String {
    match format {
        DigestFormat::Hex => hex::encode(bytes),
        DigestFormat::UpperHex => hex::encode_upper(bytes),
        DigestFormat::Base64 => general_purpose::STANDARD.encode(bytes),
    }
}

/// Standard base64 with padding.
pub fn base64_encode(data: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decodes a base64 secret, padding optional.
pub fn decode_base64_secret(secret: &str) -> Result<Vec<u8>> {
    LENIENT_BASE64
        .decode(secret.trim_end_matches('='))
        .map_err(|e| Error::authentication(format!("secret is not valid base64: {e}")))
}

/// Builds an HS256 JSON Web Token over `claims`.
///
/// The header is `{"typ":"JWT","alg":"HS256"}`; segments are base64url without
/// padding.
pub fn jwt_sign<T: Serialize + ?Sized>(claims: &T, secret: &[u8]) -> Result<String> {
    const HEADER: &str = r#"{"typ":"JWT","alg":"HS256"}"#;

    let payload = serde_json::to_string(claims)?;
    let token = format!(
        "{}.{}",
        general_purpose::URL_SAFE_NO_PAD.encode(HEADER),
        general_purpose::URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = hmac_raw(token.as_bytes(), secret, HashAlgorithm::Sha256)?;
    Ok(format!(
        "{token}.{}",
        general_purpose::URL_SAFE_NO_PAD.encode(signature)
    ))
}
