//! Read operation for the `did:key` method. Inverts both identifier encodings back into a
//! public JWK and expands it to a DID document.

use async_trait::async_trait;
use sovra_core::error::Err;
use sovra_core::{
    tracerr, DidResolver, DocumentMetadata, Jwk, Resolution, ResolutionMetadata, Result,
    DID_CONTEXT,
};

use crate::{document_from_jwk, jwk_from_raw, key_type_from_prefix, DidKey, JWK_JCS_PUB_PREFIX};

#[async_trait]
impl DidResolver for DidKey {
    fn name(&self) -> &'static str {
        "sovra-did-key"
    }

    async fn resolve(&self, did: &str) -> Result<Resolution> {
        let Some(multibase_id) = did.strip_prefix("did:key:") else {
            tracerr!(Err::MalformedDid, "DID is not a valid did:key: {did}");
        };

        let Ok((_, decoded)) = multibase::decode(multibase_id) else {
            tracerr!(Err::MalformedDid, "method-specific id is not valid multibase: {did}");
        };

        let (jwk, use_jcs) = decode_key(&decoded)?;
        let did_document = document_from_jwk(&jwk, did, multibase_id, use_jcs)?;

        Ok(Resolution {
            context: DID_CONTEXT.to_string(),
            did_document,
            did_document_metadata: Some(DocumentMetadata::default()),
            did_resolution_metadata: Some(ResolutionMetadata::default()),
        })
    }
}

// Decode multicodec-prefixed bytes into a public JWK, reporting whether the JCS encoding was
// used.
fn decode_key(bytes: &[u8]) -> Result<(Jwk, bool)> {
    if let Some(canonical) = bytes.strip_prefix(JWK_JCS_PUB_PREFIX.as_slice()) {
        let jwk: Jwk = match serde_json::from_slice(canonical) {
            Ok(jwk) => jwk,
            Err(e) => tracerr!(Err::ResolutionFailed, "embedded JWK is not valid JSON: {e}"),
        };
        return Ok((jwk, true));
    }

    if bytes.len() < 2 {
        tracerr!(Err::ResolutionFailed, "method-specific id is too short");
    }
    let Some(key_type) = key_type_from_prefix([bytes[0], bytes[1]]) else {
        tracerr!(
            Err::ResolutionFailed,
            "unsupported multicodec prefix: {:#04x} {:#04x}",
            bytes[0],
            bytes[1]
        );
    };
    Ok((jwk_from_raw(key_type, &bytes[2..])?, false))
}

#[cfg(test)]
mod tests {
    use sovra_core::{CreateOptions, DidRegistrar, Key, KeyPurpose, KeyType};
    use sovra_keys::LocalKey;

    use super::*;

    #[tokio::test]
    async fn resolve_known_vector() {
        let resolution = DidKey::new()
            .resolve("did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp")
            .await
            .expect("failed to resolve");
        let vm = resolution
            .did_document
            .get_key(KeyPurpose::Authentication)
            .expect("expected method");
        assert_eq!(vm.type_, "Ed25519VerificationKey2020");
        assert_eq!(
            vm.public_key_multibase.as_deref(),
            Some("z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp")
        );
    }

    #[tokio::test]
    async fn register_then_resolve_reproduces_thumbprint() {
        for use_jcs in [false, true] {
            let key = LocalKey::generate(KeyType::Secp256r1).expect("failed to generate");
            let options = CreateOptions {
                use_jwk_jcs_pub: use_jcs,
                ..Default::default()
            };
            let registered = DidKey::new()
                .register(&key, &options)
                .await
                .expect("failed to register");

            let resolution =
                DidKey::new().resolve(&registered.did).await.expect("failed to resolve");
            let vm = resolution
                .did_document
                .get_key(KeyPurpose::AssertionMethod)
                .expect("expected method");

            // recover the embedded key and compare thumbprints with the original
            let embedded = if use_jcs {
                vm.public_key_jwk.expect("expected embedded JWK")
            } else {
                let multibase_id = vm.public_key_multibase.expect("expected multibase key");
                let (_, decoded) = multibase::decode(&multibase_id).expect("failed to decode");
                decode_key(&decoded).expect("failed to decode key").0
            };
            assert_eq!(
                embedded.thumbprint().expect("failed to compute thumbprint"),
                key.key_id().await.expect("failed to get key id"),
            );
        }
    }

    #[tokio::test]
    async fn wrong_method_is_malformed() {
        let err = DidKey::new().resolve("did:web:example.com").await.expect_err("expected error");
        assert!(err.is(Err::MalformedDid));
    }

    #[tokio::test]
    async fn invalid_multibase_is_malformed() {
        let err = DidKey::new().resolve("did:key:@@@").await.expect_err("expected error");
        assert!(err.is(Err::MalformedDid));
    }
}
