//! # Sovra Keys
//! In-process key backend: stateless conversions between raw bytes, JWK and PEM representations
//! for each supported algorithm family, and the [`LocalKey`] implementation of the
//! [`sovra_core::Key`] capability built on them.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod ed25519;
mod local;
mod pem;
pub mod rsa;
pub mod secp256k1;
pub mod secp256r1;

use base64ct::{Base64UrlUnpadded, Encoding};
use sovra_core::error::Err;
use sovra_core::{tracerr, Jwk, KeyType, Result};

pub use local::LocalKey;

/// An asymmetric key pair: public material plus optional private material.
#[derive(Debug)]
pub struct AsymmetricKey<V, S> {
    pub(crate) verifying: V,
    pub(crate) signing: Option<S>,
}

impl<V, S> AsymmetricKey<V, S> {
    /// Whether the pair carries private material.
    #[must_use]
    pub const fn has_private(&self) -> bool {
        self.signing.is_some()
    }
}

/// Stateless key material codec behavior, implemented once per algorithm family. Encode and
/// decode operations for one representation are exact inverses of each other.
pub trait KeyMaterial: Sized {
    /// The algorithm family of the material.
    fn key_type() -> KeyType;

    /// Generate fresh key material from the OS random source.
    ///
    /// # Errors
    ///
    /// * `Err::SigningError` - Key generation failed in the underlying implementation.
    fn generate() -> Result<Self>;

    /// Decode material from a JWK.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedKey` - Required members are absent or not valid key material.
    fn from_jwk(jwk: &Jwk) -> Result<Self>;

    /// Express the material as a JWK, including private members when requested and present.
    ///
    /// # Errors
    ///
    /// * `Err::NoPrivateKey` - Private members were requested but the material is public-only.
    fn to_jwk(&self, include_private: bool) -> Result<Jwk>;

    /// Decode public-only material from the algorithm-canonical raw byte encoding.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidEncoding` - Length mismatch, compressed point or point not on the curve.
    /// * `Err::UnsupportedAlgorithm` - The family has no raw public encoding.
    fn from_raw_public(bytes: &[u8]) -> Result<Self>;

    /// The raw public byte encoding of the material.
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedAlgorithm` - The family has no raw public encoding.
    fn raw_public(&self) -> Result<Vec<u8>>;

    /// Decode private material from a PKCS#8 DER document.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedKey` - The document is not valid for the family.
    /// * `Err::UnsupportedAlgorithm` - The family has no supported PKCS#8 import.
    fn from_pkcs8_der(der: &[u8]) -> Result<Self>;

    /// Decode public material from an SPKI DER document.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedKey` - The document is not valid for the family.
    /// * `Err::UnsupportedAlgorithm` - The family has no supported SPKI import.
    fn from_spki_der(der: &[u8]) -> Result<Self>;

    /// Express the material as PEM text: PKCS#8 for private material, SPKI otherwise.
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedAlgorithm` - The family has no supported PEM export.
    fn to_pem(&self) -> Result<String>;

    /// Sign a message, returning the detached signature.
    ///
    /// # Errors
    ///
    /// * `Err::NoPrivateKey` - The material is public-only.
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>>;

    /// Verify a detached signature, returning false when the signature does not match.
    ///
    /// # Errors
    ///
    /// An error when verification cannot be attempted at all.
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool>;
}

// Decode a base64url JWK member, surfacing a typed error for bad encodings.
pub(crate) fn decode_member(member: &str, name: &str) -> Result<Vec<u8>> {
    match Base64UrlUnpadded::decode_vec(member) {
        Ok(bytes) => Ok(bytes),
        Err(e) => tracerr!(Err::MalformedKey, "invalid {name} member encoding: {e}"),
    }
}
