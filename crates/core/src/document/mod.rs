//! DID Document and its component data structures, shared by all DID method implementations.

use serde::{Deserialize, Serialize};

use crate::document::{
    context::{context_serialization, Context},
    service::Service,
    verification_method::{KeyPurpose, VerificationMethod, VmRelationship},
};
use crate::error::Err;
use crate::serde::{option_flexvec, option_flexvec_or_single};
use crate::{tracerr, Result};

pub mod context;
pub mod service;
pub mod verification_method;

/// A DID is associated with a DID document that can be serialized into a representation of the
/// DID. <https://www.w3.org/TR/did-core/>
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DidDocument {
    /// The DID document's unique identifier: "did:{method}:{method-specific-id}".
    pub id: String,
    /// The JSON-LD Context is either a string or a list containing any combination of strings
    /// and/or ordered maps.
    #[serde(rename = "@context", with = "context_serialization")]
    pub context: Vec<Context>,
    /// Entity or entities authorized to make changes to the DID document. A DID or list of DIDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "option_flexvec_or_single")]
    pub controller: Option<Vec<String>>,
    /// Other identifiers that refer to the same DID subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,
    /// Parameters that can be used to independently verify a proof, such as cryptographic public
    /// keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<Vec<VerificationMethod>>,
    /// How the DID subject is authenticated, for purposes such as logging into a website or
    /// engaging in challenge-response interactions. References or embeds verification methods.
    #[serde(skip_serializing_if = "Option::is_none", with = "option_flexvec")]
    pub authentication: Option<Vec<VmRelationship>>,
    /// How the DID subject is expected to express claims, such as for the purposes of issuing
    /// verifiable credentials.
    #[serde(skip_serializing_if = "Option::is_none", with = "option_flexvec")]
    pub assertion_method: Option<Vec<VmRelationship>>,
    /// How an entity can generate encryption material to transmit confidential messages to the
    /// DID subject.
    #[serde(skip_serializing_if = "Option::is_none", with = "option_flexvec")]
    pub key_agreement: Option<Vec<VmRelationship>>,
    /// How the DID subject can invoke a cryptographic capability, such as authorizing an update
    /// to the DID document.
    #[serde(skip_serializing_if = "Option::is_none", with = "option_flexvec")]
    pub capability_invocation: Option<Vec<VmRelationship>>,
    /// How the DID subject can delegate a cryptographic capability to another party.
    #[serde(skip_serializing_if = "Option::is_none", with = "option_flexvec")]
    pub capability_delegation: Option<Vec<VmRelationship>>,
    /// Ways of communicating with the DID subject or associated entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<Service>>,
}

/// Utility methods for looking up DID document components.
impl DidDocument {
    // Get a verification method from a reference, either by looking up the ID or returning the
    // embedded verification method.
    fn vm_from_ref(&self, vm_ref: &VmRelationship) -> Option<VerificationMethod> {
        if let Some(id) = &vm_ref.key_id {
            if let Some(vms) = &self.verification_method {
                for vm in vms {
                    if &vm.id == id {
                        return Some(vm.clone());
                    }
                }
            }
        } else if let Some(vm) = &vm_ref.verification_method {
            return Some(vm.clone());
        }
        None
    }

    /// Get the first verification method for the specified purpose.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedKey` - No verification method exists for the purpose.
    pub fn get_key(&self, purpose: KeyPurpose) -> Result<VerificationMethod> {
        let refs = match purpose {
            KeyPurpose::Authentication => &self.authentication,
            KeyPurpose::AssertionMethod => &self.assertion_method,
            KeyPurpose::KeyAgreement => &self.key_agreement,
            KeyPurpose::CapabilityInvocation => &self.capability_invocation,
            KeyPurpose::CapabilityDelegation => &self.capability_delegation,
        };
        if let Some(refs) = refs {
            for r in refs {
                if let Some(vm) = self.vm_from_ref(r) {
                    return Ok(vm);
                }
            }
        }
        tracerr!(Err::MalformedKey, "no key found for purpose {purpose}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::keys::Jwk;

    fn public_key() -> Jwk {
        Jwk {
            kty: "EC".to_string(),
            crv: Some("secp256k1".to_string()),
            x: Some("smmFWI4qLfWztIzwurLCvjjw7guNZvN99ai2oTXGUtc".to_string()),
            y: Some("rxp_kiiXHitxLHe545cePsF0y_Mdv_dy6zY4ov_0q9g".to_string()),
            ..Default::default()
        }
    }

    fn default_doc() -> DidDocument {
        DidDocument {
            id: "did:example:123".to_string(),
            context: vec![Context {
                url: Some(context::DID_CONTEXT.to_string()),
                url_map: None,
            }],
            verification_method: Some(vec![VerificationMethod {
                id: "did:example:123#key-0".to_string(),
                controller: "did:example:123".to_string(),
                type_: "EcdsaSecp256k1VerificationKey2019".to_string(),
                public_key_jwk: Some(public_key()),
                ..Default::default()
            }]),
            authentication: Some(vec![VmRelationship {
                key_id: Some("did:example:123#key-0".to_string()),
                verification_method: None,
            }]),
            assertion_method: Some(vec![VmRelationship {
                key_id: Some("did:example:123#key-0".to_string()),
                verification_method: None,
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn default_doc_is_empty() {
        let doc = DidDocument::default();
        assert_eq!(doc.id, "");
        assert!(doc.context.is_empty());
        assert!(doc.controller.is_none());
        assert!(doc.verification_method.is_none());
        assert!(doc.authentication.is_none());
        assert!(doc.service.is_none());
    }

    #[test]
    fn serialize_referenced_keys() {
        let doc = default_doc();
        let val = serde_json::to_value(&doc).expect("failed to serialize");

        // single context serializes to a string, references serialize to strings
        assert_eq!(*val.get("@context").expect("expected context"), json!(context::DID_CONTEXT));
        assert_eq!(
            *val.get("authentication").expect("expected authentication"),
            json!(["did:example:123#key-0"])
        );
        let vm = &val.get("verificationMethod").expect("expected verification methods")[0];
        assert_eq!(*vm.get("type").expect("expected type"), json!("EcdsaSecp256k1VerificationKey2019"));
    }

    #[test]
    fn deserialize_embedded_keys() {
        let input = json!({
            "@context": [
                "https://www.w3.org/ns/did/v1",
                "https://w3id.org/security/suites/ed25519-2020/v1"
            ],
            "id": "did:example:123",
            "authentication": [{
                "id": "did:example:123#z6MkecaLyHuYWkayBDLw5ihndj3T1m6zKTGqau3A51G7RBf3",
                "type": "Ed25519VerificationKey2020",
                "controller": "did:example:123",
                "publicKeyMultibase": "zAKJP3f7BD6W4iWEQ9jwndVTCBq8ua2Utt8EEjJ6Vxsf"
            }]
        });
        let doc: DidDocument = serde_json::from_value(input).expect("failed to deserialize");
        assert_eq!(doc.context.len(), 2);
        let auth = doc.authentication.expect("expected authentication");
        let vm = auth[0].verification_method.as_ref().expect("expected embedded method");
        assert_eq!(vm.type_, "Ed25519VerificationKey2020");
    }

    #[test]
    fn round_trip() {
        let doc = default_doc();
        let json = serde_json::to_string(&doc).expect("failed to serialize");
        let doc2: DidDocument = serde_json::from_str(&json).expect("failed to deserialize");
        assert_eq!(doc.id, doc2.id);
        assert_eq!(doc.verification_method.as_ref().map(Vec::len), doc2.verification_method.as_ref().map(Vec::len));
        assert_eq!(doc.authentication, doc2.authentication);
    }

    #[test]
    fn get_key() {
        let doc = default_doc();
        let key = doc
            .get_key(KeyPurpose::Authentication)
            .expect("failed to extract expected authentication key");
        assert_eq!(key.id, "did:example:123#key-0");
        let err = doc.get_key(KeyPurpose::KeyAgreement).expect_err("expected missing key error");
        assert!(err.is(Err::MalformedKey));
    }
}
