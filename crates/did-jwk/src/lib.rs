//! # DID JWK Implementation
//! <https://github.com/quartzjer/did-jwk/blob/main/spec.md>
//!
//! The method-specific identifier is the base64url-encoded public JWK itself, so registration
//! and resolution are pure transformations with no anchoring or retrieval.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// DID JWK registrar. Implementation of the create operation.
pub mod registrar;
/// DID JWK resolver. Implementation of the DID read operation.
pub mod resolver;

use sovra_core::{
    Context, DidDocument, Jwk, Result, VerificationMethod, VmRelationship, DID_CONTEXT,
};

/// The `did:jwk` method implementation, registered for both resolution and registration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DidJwk;

impl DidJwk {
    /// Create a new method instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

// Convert a public JWK to a DID document with the method's single "#0" verification method.
pub(crate) fn document_from_jwk(key: &Jwk, did: &str) -> Result<DidDocument> {
    let vm = VerificationMethod {
        id: format!("{did}#0"),
        controller: did.to_string(),
        type_: "JsonWebKey2020".to_string(),
        public_key_jwk: Some(key.to_public()),
        ..Default::default()
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
