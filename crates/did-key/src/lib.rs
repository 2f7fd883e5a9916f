//! # DID Key Implementation
//! <https://w3c-ccg.github.io/did-method-key/>
//!
//! The method-specific identifier is a multibase (base58btc) string of a multicodec prefix
//! followed by the public key: the raw key bytes for the default encoding, or the
//! JCS-canonicalized public JWK behind the `jwk_jcs-pub` multicodec when the `useJwkJcsPub`
//! creation option is set.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// DID Key registrar. Implementation of the create operation.
pub mod registrar;
/// DID Key resolver. Implementation of the read operation.
pub mod resolver;

use base64ct::{Base64UrlUnpadded, Encoding};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::Serialize;
use sovra_core::error::Err;
use sovra_core::{
    tracerr, Context, DidDocument, Jwk, KeyType, Result, VerificationMethod, VmRelationship,
    DID_CONTEXT,
};

/// The `did:key` method implementation, registered for both resolution and registration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DidKey;

impl DidKey {
    /// Create a new method instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

// Unsigned-varint encoding of the jwk_jcs-pub multicodec (0xeb51).
pub(crate) const JWK_JCS_PUB_PREFIX: [u8; 3] = [0xd1, 0xd6, 0x03];

// Two-byte multicodec prefixes for the raw public key encodings.
pub(crate) const fn multicodec_prefix(key_type: KeyType) -> Option<[u8; 2]> {
    match key_type {
        KeyType::Ed25519 => Some([0xed, 0x01]),
        KeyType::Secp256k1 => Some([0xe7, 0x01]),
        KeyType::Secp256r1 => Some([0x80, 0x24]),
        // RSA keys have no raw-key multicodec form here; use the JCS encoding instead
        KeyType::Rsa => None,
    }
}

pub(crate) const fn key_type_from_prefix(prefix: [u8; 2]) -> Option<KeyType> {
    match prefix {
        [0xed, 0x01] => Some(KeyType::Ed25519),
        [0xe7, 0x01] => Some(KeyType::Secp256k1),
        [0x80, 0x24] => Some(KeyType::Secp256r1),
        _ => None,
    }
}

// JCS-canonical bytes of the public JWK.
pub(crate) fn jcs_bytes(jwk: &Jwk) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, olpc_cjson::CanonicalFormatter::new());
    if let Err(e) = jwk.serialize(&mut ser) {
        tracerr!(Err::SerializationError, "failed to canonicalize JWK: {e}");
    }
    Ok(buf)
}

// The method encodes EC keys as compressed SEC1 points; key backends export uncompressed ones.
pub(crate) fn compress_point(key_type: KeyType, uncompressed: &[u8]) -> Result<Vec<u8>> {
    match key_type {
        KeyType::Ed25519 => Ok(uncompressed.to_vec()),
        KeyType::Secp256k1 => {
            let Ok(pk) = k256::PublicKey::from_sec1_bytes(uncompressed) else {
                tracerr!(Err::InvalidEncoding, "bytes are not a point on the secp256k1 curve");
            };
            Ok(pk.to_encoded_point(true).as_bytes().to_vec())
        }
        KeyType::Secp256r1 => {
            let Ok(pk) = p256::PublicKey::from_sec1_bytes(uncompressed) else {
                tracerr!(Err::InvalidEncoding, "bytes are not a point on the P-256 curve");
            };
            Ok(pk.to_encoded_point(true).as_bytes().to_vec())
        }
        KeyType::Rsa => tracerr!(Err::UnsupportedAlgorithm, "RSA keys have no point encoding"),
    }
}

// Rebuild a public JWK from the multicodec raw key bytes.
pub(crate) fn jwk_from_raw(key_type: KeyType, bytes: &[u8]) -> Result<Jwk> {
    match key_type {
        KeyType::Ed25519 => {
            if bytes.len() != 32 {
                tracerr!(Err::InvalidEncoding, "Ed25519 public key must be 32 bytes");
            }
            Ok(Jwk {
                kty: "OKP".to_string(),
                crv: Some("Ed25519".to_string()),
                x: Some(Base64UrlUnpadded::encode_string(bytes)),
                ..Default::default()
            })
        }
        KeyType::Secp256k1 => {
            let Ok(pk) = k256::PublicKey::from_sec1_bytes(bytes) else {
                tracerr!(Err::InvalidEncoding, "bytes are not a point on the secp256k1 curve");
            };
            let point = pk.to_encoded_point(false);
            let (Some(x), Some(y)) = (point.x(), point.y()) else {
                tracerr!(Err::InvalidEncoding, "point has no coordinates");
            };
            Ok(Jwk {
                kty: "EC".to_string(),
                crv: Some("secp256k1".to_string()),
                x: Some(Base64UrlUnpadded::encode_string(x)),
                y: Some(Base64UrlUnpadded::encode_string(y)),
                ..Default::default()
            })
        }
        KeyType::Secp256r1 => {
            let Ok(pk) = p256::PublicKey::from_sec1_bytes(bytes) else {
                tracerr!(Err::InvalidEncoding, "bytes are not a point on the P-256 curve");
            };
            let point = pk.to_encoded_point(false);
            let (Some(x), Some(y)) = (point.x(), point.y()) else {
                tracerr!(Err::InvalidEncoding, "point has no coordinates");
            };
            Ok(Jwk {
                kty: "EC".to_string(),
                crv: Some("P-256".to_string()),
                x: Some(Base64UrlUnpadded::encode_string(x)),
                y: Some(Base64UrlUnpadded::encode_string(y)),
                ..Default::default()
            })
        }
        KeyType::Rsa => {
            tracerr!(Err::UnsupportedAlgorithm, "RSA keys have no raw multicodec encoding")
        }
    }
}

// Convert a public JWK to a DID document. The fragment doubles as the verification method
// reference and, for the default encoding, the multibase key itself.
pub(crate) fn document_from_jwk(
    key: &Jwk, did: &str, fragment: &str, use_jwk_jcs_pub: bool,
) -> Result<DidDocument> {
    let vm = if use_jwk_jcs_pub {
        VerificationMethod {
            id: format!("{did}#{fragment}"),
            controller: did.to_string(),
            type_: "JsonWebKey2020".to_string(),
            public_key_jwk: Some(key.to_public()),
            ..Default::default()
        }
    } else {
        VerificationMethod {
            id: format!("{did}#{fragment}"),
            controller: did.to_string(),
            type_: key.infer_key_type()?.cryptosuite().to_string(),
            public_key_multibase: Some(fragment.to_string()),
            ..Default::default()
        }
    };

    let vm_ref = VmRelationship::from(&vm);
    let mut doc = DidDocument {
        context: vec![Context {
            url: Some(DID_CONTEXT.to_string()),
            ..Default::default()
        }],
        id: did.to_string(),
        verification_method: Some(vec![vm]),
        authentication: Some(vec![vm_ref.clone()]),
        assertion_method: Some(vec![vm_ref.clone()]),
        capability_invocation: Some(vec![vm_ref.clone()]),
        capability_delegation: Some(vec![vm_ref.clone()]),
        ..Default::default()
    };
    if key.use_.as_deref() != Some("sig") {
        doc.key_agreement = Some(vec![vm_ref]);
    }
    Ok(doc)
}
