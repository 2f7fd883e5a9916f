//! Key material codec for Ed25519.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use base64ct::{Base64UrlUnpadded, Encoding};
use sovra_core::error::Err;
use sovra_core::{tracerr, Jwk, KeyType, Result};

use crate::{decode_member, AsymmetricKey, KeyMaterial};

/// Key pair for Ed25519.
pub type Ed25519KeyPair = AsymmetricKey<VerifyingKey, SigningKey>;

/// `KeyMaterial` implementation for Ed25519.
impl KeyMaterial for Ed25519KeyPair {
    fn key_type() -> KeyType {
        KeyType::Ed25519
    }

    fn generate() -> Result<Self> {
        let signing = SigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        Ok(Self {
            verifying,
            signing: Some(signing),
        })
    }

    fn from_jwk(jwk: &Jwk) -> Result<Self> {
        let Some(x) = &jwk.x else {
            tracerr!(Err::MalformedKey, "OKP key without x member");
        };
        let x_bytes = decode_member(x, "x")?;
        let Ok(x_arr) = <[u8; 32]>::try_from(x_bytes.as_slice()) else {
            tracerr!(Err::MalformedKey, "x member must decode to 32 bytes");
        };
        let Ok(verifying) = VerifyingKey::from_bytes(&x_arr) else {
            tracerr!(Err::MalformedKey, "x member is not a valid Ed25519 public key");
        };

        let signing = match &jwk.d {
            Some(d) => {
                let d_bytes = decode_member(d, "d")?;
                let Ok(d_arr) = <[u8; 32]>::try_from(d_bytes.as_slice()) else {
                    tracerr!(Err::MalformedKey, "d member must decode to 32 bytes");
                };
                let signing = SigningKey::from_bytes(&d_arr);
                if signing.verifying_key() != verifying {
                    tracerr!(Err::MalformedKey, "d member does not correspond to x member");
                }
                Some(signing)
            }
            None => None,
        };

        Ok(Self { verifying, signing })
    }

    fn to_jwk(&self, include_private: bool) -> Result<Jwk> {
        if include_private && self.signing.is_none() {
            tracerr!(Err::NoPrivateKey, "no private key material to export");
        }
        Ok(Jwk {
            kty: "OKP".to_string(),
            crv: Some("Ed25519".to_string()),
            x: Some(Base64UrlUnpadded::encode_string(self.verifying.as_bytes())),
            d: self
                .signing
                .as_ref()
                .filter(|_| include_private)
                .map(|sk| Base64UrlUnpadded::encode_string(&sk.to_bytes())),
            ..Default::default()
        })
    }

    fn from_raw_public(bytes: &[u8]) -> Result<Self> {
        let Ok(arr) = <[u8; 32]>::try_from(bytes) else {
            tracerr!(
                Err::InvalidEncoding,
                "Ed25519 public key must be 32 bytes, got {}",
                bytes.len()
            );
        };
        let Ok(verifying) = VerifyingKey::from_bytes(&arr) else {
            tracerr!(Err::InvalidEncoding, "bytes are not a valid Ed25519 curve point");
        };
        Ok(Self {
            verifying,
            signing: None,
        })
    }

    fn raw_public(&self) -> Result<Vec<u8>> {
        Ok(self.verifying.to_bytes().to_vec())
    }

    // Ed25519 PEM envelopes are an explicitly unsupported combination.
    fn from_pkcs8_der(_der: &[u8]) -> Result<Self> {
        tracerr!(Err::UnsupportedAlgorithm, "Ed25519 private key PEM import is not supported")
    }

    fn from_spki_der(_der: &[u8]) -> Result<Self> {
        tracerr!(Err::UnsupportedAlgorithm, "Ed25519 public key PEM import is not supported")
    }

    fn to_pem(&self) -> Result<String> {
        tracerr!(Err::UnsupportedAlgorithm, "Ed25519 PEM export is not supported")
    }

    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let Some(sk) = &self.signing else {
            tracerr!(Err::NoPrivateKey, "key holds no private material");
        };
        Ok(sk.sign(msg).to_bytes().to_vec())
    }

    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool> {
        let Ok(sig) = Signature::from_slice(sig) else {
            return Ok(false);
        };
        Ok(self.verifying.verify(msg, &sig).is_ok())
    }
}
