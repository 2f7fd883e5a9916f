//! Method registry dispatch: grammar checks, unknown methods, override semantics and the
//! diagnostics listing.

use std::sync::Arc;

use async_trait::async_trait;
use sovra::error::Err;
use sovra::{
    CreateOptions, DidDocument, DidMethodRegistry, DidResolver, DocumentMetadata, KeyType,
    LocalKey, Resolution, ResolutionMetadata, Result, DID_CONTEXT,
};

#[tokio::test]
async fn resolve_unknown_method() {
    let registry = DidMethodRegistry::with_default_methods();
    let err = registry.resolve("did:unknown-method:abc").await.expect_err("expected error");
    assert!(err.is(Err::UnknownMethod));
}

#[tokio::test]
async fn resolve_malformed_did() {
    let registry = DidMethodRegistry::with_default_methods();
    let err = registry.resolve("not-a-did").await.expect_err("expected error");
    assert!(err.is(Err::MalformedDid));
}

#[tokio::test]
async fn register_by_key_unknown_method() {
    let registry = DidMethodRegistry::new();
    let key = LocalKey::generate(KeyType::Ed25519).expect("failed to generate");
    let err = registry
        .register_by_key("key", &key, &CreateOptions::default())
        .await
        .expect_err("expected error");
    assert!(err.is(Err::UnknownMethod));
}

struct StaticResolver {
    name: &'static str,
    id: &'static str,
}

#[async_trait]
impl DidResolver for StaticResolver {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn resolve(&self, _did: &str) -> Result<Resolution> {
        Ok(Resolution {
            context: DID_CONTEXT.to_string(),
            did_document: DidDocument {
                id: self.id.to_string(),
                ..Default::default()
            },
            did_document_metadata: Some(DocumentMetadata::default()),
            did_resolution_metadata: Some(ResolutionMetadata::default()),
        })
    }
}

#[tokio::test]
async fn later_registration_replaces_earlier() {
    let registry = DidMethodRegistry::with_default_methods();

    registry.register_resolver(
        "key",
        Arc::new(StaticResolver {
            name: "test-override",
            id: "did:key:override",
        }),
    );

    let resolution = registry
        .resolve("did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp")
        .await
        .expect("failed to resolve");
    assert_eq!(resolution.did_document.id, "did:key:override");
}

#[tokio::test]
async fn listing_groups_methods_by_implementation() {
    let registry = DidMethodRegistry::with_default_methods();
    registry.register_resolver(
        "example",
        Arc::new(StaticResolver {
            name: "test-static",
            id: "did:example:static",
        }),
    );

    let methods = registry.resolver_methods();
    assert_eq!(methods.get("key").map(String::as_str), Some("sovra-did-key"));
    assert_eq!(methods.get("example").map(String::as_str), Some("test-static"));

    let listing = registry.methods();
    assert_eq!(
        listing.resolvers.get("sovra-did-key").expect("expected did:key entry"),
        &vec!["key".to_string()]
    );
    assert_eq!(
        listing.resolvers.get("test-static").expect("expected override entry"),
        &vec!["example".to_string()]
    );
    // registrars are unaffected by the resolver-only registration
    assert!(!listing.registrars.contains_key("test-static"));
    assert_eq!(listing.registrars.len(), 3);
}

#[tokio::test]
async fn empty_registry_reports_unknown_before_first_registration() {
    let registry = DidMethodRegistry::new();
    let err = registry.resolve("did:key:z6Mk").await.expect_err("expected error");
    assert!(err.is(Err::UnknownMethod));
    assert!(registry.methods().resolvers.is_empty());
}
