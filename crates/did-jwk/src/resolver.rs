//! Read operation for the `did:jwk` method. Decodes the embedded JWK out of the DID and expands
//! it to a DID document.

use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use sovra_core::error::Err;
use sovra_core::{
    tracerr, DidResolver, DocumentMetadata, Jwk, Resolution, ResolutionMetadata, Result,
    DID_CONTEXT,
};

use crate::{document_from_jwk, DidJwk};

#[async_trait]
impl DidResolver for DidJwk {
    fn name(&self) -> &'static str {
        "sovra-did-jwk"
    }

    async fn resolve(&self, did: &str) -> Result<Resolution> {
        let Some(encoded) = did.strip_prefix("did:jwk:") else {
            tracerr!(Err::MalformedDid, "DID is not a valid did:jwk: {did}");
        };
        if encoded.contains(':') {
            tracerr!(Err::MalformedDid, "did:jwk has a single method-specific id part: {did}");
        }

        let Ok(serialized) = Base64UrlUnpadded::decode_vec(encoded) else {
            tracerr!(Err::MalformedDid, "method-specific id is not valid base64url: {did}");
        };
        let key: Jwk = match serde_json::from_slice(&serialized) {
            Ok(key) => key,
            Err(e) => tracerr!(Err::ResolutionFailed, "embedded JWK is not valid JSON: {e}"),
        };

        let did_document = document_from_jwk(&key, did)?;
        Ok(Resolution {
            context: DID_CONTEXT.to_string(),
            did_document,
            did_document_metadata: Some(DocumentMetadata::default()),
            did_resolution_metadata: Some(ResolutionMetadata::default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use sovra_core::KeyPurpose;

    use super::*;

    #[tokio::test]
    async fn resolve_wrong_method_is_malformed() {
        let err = DidJwk::new().resolve("did:web:wibble").await.expect_err("expected error");
        assert!(err.is(Err::MalformedDid));
    }

    #[tokio::test]
    async fn resolve_known_secp256k1_did() {
        let did = "did:jwk:eyJrdHkiOiJFQyIsImNydiI6InNlY3AyNTZrMSIsIngiOiJKSnpQaTRxeTJydktTVk85RjItMDVWV2VYMm9oc3dYN1NUbzg3TUdxcVB3IiwieSI6IkMxUnRGbnFXOWxOTEI1ejcycG9uMTIzZHh2MWtEcVUzUWw1QjhzMFdjXzQifQ";
        let resolution = DidJwk::new().resolve(did).await.expect("failed to resolve");
        assert_eq!(resolution.did_document.id, did);

        let vm = resolution
            .did_document
            .get_key(KeyPurpose::Authentication)
            .expect("expected method");
        assert_eq!(vm.id, format!("{did}#0"));
        assert_eq!(vm.type_, "JsonWebKey2020");
        let jwk = vm.public_key_jwk.expect("expected embedded JWK");
        assert_eq!(jwk.crv.as_deref(), Some("secp256k1"));
        assert_eq!(jwk.x.as_deref(), Some("JJzPi4qy2rvKSVO9F2-05VWeX2ohswX7STo87MGqqPw"));
    }

    #[tokio::test]
    async fn resolve_undecodable_id_is_malformed() {
        let err = DidJwk::new().resolve("did:jwk:!!!").await.expect_err("expected error");
        assert!(err.is(Err::MalformedDid));
    }
}
