//! Cryptographic key types: the supported algorithm set, a simplified JWK structure and
//! RFC 7638 thumbprint computation.

use base64ct::{Base64UrlUnpadded, Encoding};
use olpc_cjson::CanonicalFormatter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

pub mod key;

use crate::{error::Err, tracerr, Result};

/// Types of signing key supported by the sovra framework.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum KeyType {
    /// EdDSA using the Ed25519 curve.
    Ed25519,
    /// ECDSA using the secp256k1 curve.
    Secp256k1,
    /// ECDSA using the secp256r1 (P-256) curve.
    Secp256r1,
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    Rsa,
}

/// Display the JOSE signing algorithm name for the key type.
impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Ed25519 => write!(f, "EdDSA"),
            KeyType::Secp256k1 => write!(f, "ES256K"),
            KeyType::Secp256r1 => write!(f, "ES256"),
            KeyType::Rsa => write!(f, "RS256"),
        }
    }
}

impl KeyType {
    /// The JWK `kty` member for the key type.
    #[must_use]
    pub const fn kty(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "OKP",
            KeyType::Secp256k1 | KeyType::Secp256r1 => "EC",
            KeyType::Rsa => "RSA",
        }
    }

    /// The JWK `crv` member for the key type, where the algorithm family has one.
    #[must_use]
    pub const fn crv(&self) -> Option<&'static str> {
        match self {
            KeyType::Ed25519 => Some("Ed25519"),
            KeyType::Secp256k1 => Some("secp256k1"),
            KeyType::Secp256r1 => Some("P-256"),
            KeyType::Rsa => None,
        }
    }

    /// Get the verification method type for the key type.
    #[must_use]
    pub const fn cryptosuite(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "Ed25519VerificationKey2020",
            KeyType::Secp256k1 => "EcdsaSecp256k1VerificationKey2019",
            KeyType::Secp256r1 => "EcdsaSecp256r1VerificationKey2019",
            KeyType::Rsa => "RsaVerificationKey2018",
        }
    }
}

/// Simplified JSON Web Key (JWK) structure.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Jwk {
    /// Key type.
    pub kty: String,
    /// Cryptographic curve type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// X coordinate (or Ed25519 public key bytes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// Y coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// RSA modulus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Secret key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// Key identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Intended use of the key ("sig" or "enc").
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
}

impl Jwk {
    /// Attempt to match the key parameters to one of the supported key types.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedKey` - A member required to classify the key is absent.
    /// * `Err::UnsupportedAlgorithm` - The key is well formed but names an algorithm or curve
    ///   outside the supported set.
    pub fn infer_key_type(&self) -> Result<KeyType> {
        match self.kty.as_str() {
            "OKP" => match self.crv.as_deref() {
                Some("Ed25519") => Ok(KeyType::Ed25519),
                Some(crv) => tracerr!(Err::UnsupportedAlgorithm, "unsupported OKP curve: {crv}"),
                None => tracerr!(Err::MalformedKey, "OKP key without crv member"),
            },
            "EC" => match self.crv.as_deref() {
                Some("secp256k1") => Ok(KeyType::Secp256k1),
                Some("P-256") => Ok(KeyType::Secp256r1),
                Some(crv) => tracerr!(Err::UnsupportedAlgorithm, "unsupported EC curve: {crv}"),
                None => tracerr!(Err::MalformedKey, "EC key without crv member"),
            },
            "RSA" => Ok(KeyType::Rsa),
            "" => tracerr!(Err::MalformedKey, "missing kty member"),
            kty => tracerr!(Err::UnsupportedAlgorithm, "unsupported key type: {kty}"),
        }
    }

    /// Compute the RFC 7638 thumbprint of the key.
    ///
    /// The thumbprint is the base64url-encoded SHA-256 digest of the canonical JSON serialization
    /// of the required public members for the key's algorithm family.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedKey` - A required public member is absent.
    /// * `Err::UnsupportedAlgorithm` - The `kty` member is outside the supported set.
    pub fn thumbprint(&self) -> Result<String> {
        let required = match self.kty.as_str() {
            "OKP" | "EC" => {
                let Some(crv) = &self.crv else {
                    tracerr!(Err::MalformedKey, "{} key without crv member", self.kty);
                };
                let Some(x) = &self.x else {
                    tracerr!(Err::MalformedKey, "{} key without x member", self.kty);
                };
                if self.kty == "EC" {
                    let Some(y) = &self.y else {
                        tracerr!(Err::MalformedKey, "EC key without y member");
                    };
                    json!({"crv": crv, "kty": self.kty, "x": x, "y": y})
                } else {
                    json!({"crv": crv, "kty": self.kty, "x": x})
                }
            }
            "RSA" => {
                let (Some(n), Some(e)) = (&self.n, &self.e) else {
                    tracerr!(Err::MalformedKey, "RSA key without n or e member");
                };
                json!({"e": e, "kty": self.kty, "n": n})
            }
            kty => tracerr!(Err::UnsupportedAlgorithm, "unsupported key type: {kty}"),
        };

        // CanonicalFormatter orders members lexicographically with no insignificant whitespace,
        // as RFC 7638 requires.
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter::new());
        required.serialize(&mut ser)?;
        let digest: [u8; 32] = Sha256::digest(&buf).into();
        Ok(Base64UrlUnpadded::encode_string(&digest))
    }

    /// The public members of the key, stripping any private material.
    #[must_use]
    pub fn to_public(&self) -> Self {
        Self {
            d: None,
            ..self.clone()
        }
    }
}
