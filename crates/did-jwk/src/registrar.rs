//! Create operation for the `did:jwk` method.

use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use sovra_core::error::Err;
use sovra_core::{tracerr, CreateOptions, DidRegistrar, DidResult, Key, Result};

use crate::{document_from_jwk, DidJwk};

#[async_trait]
impl DidRegistrar for DidJwk {
    fn name(&self) -> &'static str {
        "sovra-did-jwk"
    }

    /// Construct a `did:jwk` DID and document for the key's public material. The method has no
    /// creation options.
    async fn register(&self, key: &dyn Key, _options: &CreateOptions) -> Result<DidResult> {
        let jwk = key.public_jwk().await?;
        let serialized = match serde_json::to_vec(&jwk.to_public()) {
            Ok(bytes) => bytes,
            Err(e) => tracerr!(Err::SerializationError, "failed to serialize JWK: {e}"),
        };

        let did = format!("did:jwk:{}", Base64UrlUnpadded::encode_string(&serialized));
        let did_document = document_from_jwk(&jwk, &did)?;
        Ok(DidResult { did, did_document })
    }
}

#[cfg(test)]
mod tests {
    use sovra_core::{DidResolver, KeyPurpose, KeyType};
    use sovra_keys::LocalKey;

    use super::*;

    #[tokio::test]
    async fn register_then_resolve_round_trip() {
        let key = LocalKey::generate(KeyType::Ed25519).expect("failed to generate");
        let result = DidJwk::new()
            .register(&key, &CreateOptions::default())
            .await
            .expect("failed to register");
        assert!(result.did.starts_with("did:jwk:"));

        let resolution = DidJwk::new().resolve(&result.did).await.expect("failed to resolve");
        let vm = resolution
            .did_document
            .get_key(KeyPurpose::AssertionMethod)
            .expect("expected method");
        let embedded = vm.public_key_jwk.expect("expected embedded JWK");
        assert_eq!(
            embedded.thumbprint().expect("failed to compute thumbprint"),
            key.key_id().await.expect("failed to get key id"),
        );
    }

    #[tokio::test]
    async fn registered_document_never_embeds_private_material() {
        let key = LocalKey::generate(KeyType::Secp256k1).expect("failed to generate");
        assert!(key.has_private_key());

        let result = DidJwk::new()
            .register(&key, &CreateOptions::default())
            .await
            .expect("failed to register");
        let vm = result
            .did_document
            .get_key(KeyPurpose::Authentication)
            .expect("expected method");
        assert!(vm.public_key_jwk.expect("expected embedded JWK").d.is_none());
    }
}
