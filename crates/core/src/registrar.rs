//! DID registration: the capability a DID method implementation provides to turn a [`Key`] into
//! a DID and its DID Document. <https://identity.foundation/did-registration/>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::DidDocument;
use crate::keys::key::Key;
use crate::Result;

/// A registrar implements the create operation of a DID method, producing a DID and DID document
/// from a key. Implementations are registered with the method registry under a DID method name.
#[async_trait]
pub trait DidRegistrar: Send + Sync {
    /// The name of the registrar implementation, used for diagnostics listings.
    fn name(&self) -> &'static str;

    /// Construct a DID and DID document binding the key's public material.
    ///
    /// # Arguments
    ///
    /// * `key` - The key the DID should bind. Any backend implementing [`Key`].
    /// * `options` - Method-specific creation options; unknown members are ignored by methods
    ///   that do not use them.
    ///
    /// # Errors
    ///
    /// * `Err::RegistrationFailed` - A required option is absent or the method's registration
    ///   logic failed.
    /// * `Err::UnsupportedAlgorithm` - The method cannot encode the key's algorithm.
    async fn register(&self, key: &dyn Key, options: &CreateOptions) -> Result<DidResult>;
}

/// The output of a DID registration.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidResult {
    /// The registered DID.
    pub did: String,
    /// The DID document produced by the method.
    pub did_document: DidDocument,
}

/// Method-specific options for DID creation. A single options structure is shared by the bundled
/// methods; each method reads the members it understands.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOptions {
    /// For `did:key`: encode the public key as a JCS-canonicalized JWK behind the `jwk_jcs-pub`
    /// multicodec rather than the raw-key multicodec.
    pub use_jwk_jcs_pub: bool,
    /// For `did:web`: the host (and optional url-encoded port) the document will be served from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// For `did:web`: optional path below the host, as "/"-separated segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
