//! End-to-end flow over the default registry: obtain a key, register it with a method, resolve
//! the resulting DID and check the embedded key material still identifies the original key.

use sovra::error::Err;
use sovra::{CreateOptions, DidMethodRegistry, Key, KeyPurpose, KeyType, LocalKey};

#[tokio::test]
async fn did_key_both_encodings_reproduce_the_thumbprint() {
    let registry = DidMethodRegistry::with_default_methods();
    let key = LocalKey::generate(KeyType::Ed25519).expect("failed to generate");
    let key_id = key.key_id().await.expect("failed to get key id");

    let plain = registry
        .register_by_key("key", &key, &CreateOptions::default())
        .await
        .expect("failed to register");
    let jcs = registry
        .register_by_key(
            "key",
            &key,
            &CreateOptions {
                use_jwk_jcs_pub: true,
                ..Default::default()
            },
        )
        .await
        .expect("failed to register");

    // the two options produce different verification method encodings
    assert_ne!(plain.did, jcs.did);
    let plain_vm = plain
        .did_document
        .get_key(KeyPurpose::Authentication)
        .expect("expected verification method");
    let jcs_vm = jcs
        .did_document
        .get_key(KeyPurpose::Authentication)
        .expect("expected verification method");
    assert!(plain_vm.public_key_multibase.is_some() && plain_vm.public_key_jwk.is_none());
    assert!(jcs_vm.public_key_jwk.is_some() && jcs_vm.public_key_multibase.is_none());

    // resolving either DID reproduces a document bound to the same key
    let resolved = registry.resolve(&jcs.did).await.expect("failed to resolve");
    let vm = resolved
        .did_document
        .get_key(KeyPurpose::AssertionMethod)
        .expect("expected verification method");
    let embedded = vm.public_key_jwk.expect("expected embedded JWK");
    assert_eq!(embedded.thumbprint().expect("failed to compute thumbprint"), key_id);

    let resolved = registry.resolve(&plain.did).await.expect("failed to resolve");
    assert_eq!(resolved.did_document.id, plain.did);
}

#[tokio::test]
async fn did_jwk_register_and_resolve() {
    let registry = DidMethodRegistry::with_default_methods();
    let key = LocalKey::generate(KeyType::Secp256k1).expect("failed to generate");

    let result = registry
        .register_by_key("jwk", &key, &CreateOptions::default())
        .await
        .expect("failed to register");
    let resolved = registry.resolve(&result.did).await.expect("failed to resolve");

    let vm = resolved
        .did_document
        .get_key(KeyPurpose::Authentication)
        .expect("expected verification method");
    assert_eq!(
        vm.public_key_jwk.expect("expected embedded JWK").thumbprint().expect("failed to compute"),
        key.key_id().await.expect("failed to get key id"),
    );
}

#[tokio::test]
async fn did_web_register_produces_resolvable_location_shape() {
    let registry = DidMethodRegistry::with_default_methods();
    let key = LocalKey::generate(KeyType::Secp256r1).expect("failed to generate");

    let result = registry
        .register_by_key(
            "web",
            &key,
            &CreateOptions {
                domain: Some("wallet.example.com".to_string()),
                path: Some("holder/1234".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("failed to register");
    assert_eq!(result.did, "did:web:wallet.example.com:holder:1234");
    assert_eq!(result.did_document.id, result.did);

    // registration without the required option fails with the method's error
    let err = registry
        .register_by_key("web", &key, &CreateOptions::default())
        .await
        .expect_err("expected error");
    assert!(err.is(Err::RegistrationFailed));
}

#[tokio::test]
async fn imported_public_key_registers_like_the_original() {
    let registry = DidMethodRegistry::with_default_methods();
    let key = LocalKey::generate(KeyType::Ed25519).expect("failed to generate");

    // a public-only re-import of the same material produces the same DID
    let raw = key.export_raw().await.expect("failed to export raw");
    let public =
        LocalKey::import_raw_public_key(KeyType::Ed25519, &raw).expect("failed to import");
    assert!(!public.has_private_key());

    let from_private = registry
        .register_by_key("key", &key, &CreateOptions::default())
        .await
        .expect("failed to register");
    let from_public = registry
        .register_by_key("key", &public, &CreateOptions::default())
        .await
        .expect("failed to register");
    assert_eq!(from_private.did, from_public.did);
}
