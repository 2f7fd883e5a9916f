//! Create operation for the `did:web` method. Produces the DID and document; hosting the
//! document at the implied HTTPS location is the caller's responsibility.

use async_trait::async_trait;
use sovra_core::error::Err;
use sovra_core::{
    tracerr, Context, CreateOptions, DidDocument, DidRegistrar, DidResult, Key, Result,
    VerificationMethod, VmRelationship, DID_CONTEXT,
};

use crate::DidWeb;

#[async_trait]
impl DidRegistrar for DidWeb {
    fn name(&self) -> &'static str {
        "sovra-did-web"
    }

    /// Construct a `did:web` DID and document for the key's public material. Requires the
    /// `domain` creation option; `path` segments are appended colon-separated.
    async fn register(&self, key: &dyn Key, options: &CreateOptions) -> Result<DidResult> {
        let Some(domain) = &options.domain else {
            tracerr!(Err::RegistrationFailed, "did:web requires a domain creation option");
        };

        // a port is carried url-encoded inside the method-specific id
        let mut did = format!("did:web:{}", domain.replace(':', "%3A"));
        if let Some(path) = &options.path {
            for segment in path.trim_matches('/').split('/') {
                if !segment.is_empty() {
                    did.push(':');
                    did.push_str(segment);
                }
            }
        }

        let jwk = key.public_jwk().await?;
        let vm = VerificationMethod {
            id: format!("{did}#{}", key.key_id().await?),
            controller: did.clone(),
            type_: "JsonWebKey2020".to_string(),
            public_key_jwk: Some(jwk.to_public()),
            ..Default::default()
        };
        let vm_ref = VmRelationship::from(&vm);

        let did_document = DidDocument {
            context: vec![Context {
                url: Some(DID_CONTEXT.to_string()),
                ..Default::default()
            }],
            id: did.clone(),
            verification_method: Some(vec![vm]),
            authentication: Some(vec![vm_ref.clone()]),
            assertion_method: Some(vec![vm_ref]),
            ..Default::default()
        };

        Ok(DidResult { did, did_document })
    }
}

#[cfg(test)]
mod tests {
    use sovra_core::{KeyPurpose, KeyType};
    use sovra_keys::LocalKey;

    use super::*;

    #[tokio::test]
    async fn domain_is_required() {
        let key = LocalKey::generate(KeyType::Ed25519).expect("failed to generate");
        let err = DidWeb::new()
            .register(&key, &CreateOptions::default())
            .await
            .expect_err("expected error");
        assert!(err.is(Err::RegistrationFailed));
    }

    #[tokio::test]
    async fn did_encodes_domain_port_and_path() {
        let key = LocalKey::generate(KeyType::Secp256r1).expect("failed to generate");
        let options = CreateOptions {
            domain: Some("example.com:8443".to_string()),
            path: Some("/user/alice".to_string()),
            ..Default::default()
        };
        let result = DidWeb::new().register(&key, &options).await.expect("failed to register");
        assert_eq!(result.did, "did:web:example.com%3A8443:user:alice");

        let vm = result
            .did_document
            .get_key(KeyPurpose::Authentication)
            .expect("expected method");
        let embedded = vm.public_key_jwk.expect("expected embedded JWK");
        assert_eq!(
            embedded.thumbprint().expect("failed to compute thumbprint"),
            key.key_id().await.expect("failed to get key id"),
        );
    }
}
