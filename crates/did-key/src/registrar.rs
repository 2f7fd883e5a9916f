//! Create operation for the `did:key` method.

use async_trait::async_trait;
use multibase::Base::Base58Btc;
use sovra_core::error::Err;
use sovra_core::{tracerr, CreateOptions, DidRegistrar, DidResult, Key, Result};

use crate::{
    compress_point, document_from_jwk, jcs_bytes, multicodec_prefix, DidKey, JWK_JCS_PUB_PREFIX,
};

#[async_trait]
impl DidRegistrar for DidKey {
    fn name(&self) -> &'static str {
        "sovra-did-key"
    }

    /// Construct a `did:key` DID and document for the key's public material.
    ///
    /// With `useJwkJcsPub` set the method-specific identifier encodes the JCS-canonical public
    /// JWK; otherwise it encodes the raw public key behind the key type's multicodec prefix.
    async fn register(&self, key: &dyn Key, options: &CreateOptions) -> Result<DidResult> {
        let jwk = key.public_jwk().await?;

        let multibase = if options.use_jwk_jcs_pub {
            let canonical = jcs_bytes(&jwk.to_public())?;
            multibase::encode(Base58Btc, [JWK_JCS_PUB_PREFIX.as_slice(), &canonical].concat())
        } else {
            let Some(prefix) = multicodec_prefix(key.key_type()) else {
                tracerr!(
                    Err::UnsupportedAlgorithm,
                    "{} keys require the useJwkJcsPub encoding",
                    key.key_type()
                );
            };
            let raw = key.export_raw().await?;
            let compressed = compress_point(key.key_type(), &raw)?;
            multibase::encode(Base58Btc, [prefix.as_slice(), &compressed].concat())
        };

        let did = format!("did:key:{multibase}");
        let did_document = document_from_jwk(&jwk, &did, &multibase, options.use_jwk_jcs_pub)?;
        Ok(DidResult { did, did_document })
    }
}

#[cfg(test)]
mod tests {
    use sovra_core::{KeyPurpose, KeyType};
    use sovra_keys::LocalKey;

    use super::*;

    #[tokio::test]
    async fn ed25519_known_vector() {
        // raw public key with a known did:key form
        let json = r#"{
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik"
        }"#;
        let key = LocalKey::import_jwk(json).expect("failed to import");
        let result = DidKey::new()
            .register(&key, &CreateOptions::default())
            .await
            .expect("failed to register");
        assert_eq!(result.did, "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp");
        assert_eq!(result.did_document.id, result.did);
    }

    #[tokio::test]
    async fn encodings_differ_but_bind_the_same_key() {
        let key = LocalKey::generate(KeyType::Ed25519).expect("failed to generate");

        let plain = DidKey::new()
            .register(&key, &CreateOptions::default())
            .await
            .expect("failed to register");
        let jcs = DidKey::new()
            .register(
                &key,
                &CreateOptions {
                    use_jwk_jcs_pub: true,
                    ..Default::default()
                },
            )
            .await
            .expect("failed to register");

        assert_ne!(plain.did, jcs.did);

        let plain_vm =
            plain.did_document.get_key(KeyPurpose::Authentication).expect("expected method");
        assert!(plain_vm.public_key_multibase.is_some());
        assert!(plain_vm.public_key_jwk.is_none());

        let jcs_vm = jcs.did_document.get_key(KeyPurpose::Authentication).expect("expected method");
        let embedded = jcs_vm.public_key_jwk.expect("expected embedded JWK");
        assert_eq!(
            embedded.thumbprint().expect("failed to compute thumbprint"),
            key.key_id().await.expect("failed to get key id"),
        );
    }

    #[tokio::test]
    async fn rsa_requires_jcs_encoding() {
        let key = LocalKey::generate(KeyType::Rsa).expect("failed to generate");

        let err = DidKey::new()
            .register(&key, &CreateOptions::default())
            .await
            .expect_err("expected error");
        assert!(err.is(Err::UnsupportedAlgorithm));

        let result = DidKey::new()
            .register(
                &key,
                &CreateOptions {
                    use_jwk_jcs_pub: true,
                    ..Default::default()
                },
            )
            .await
            .expect("failed to register");
        assert!(result.did.starts_with("did:key:z"));
    }
}
