//! DID resolution: the capability a DID method implementation provides to turn a DID string into
//! a DID Document. <https://w3c-ccg.github.io/did-resolution/>

use async_trait::async_trait;

use serde::{Deserialize, Serialize};

use crate::document::DidDocument;
use crate::Result;

/// A resolver is responsible for resolving a DID to a DID document. Implementations are
/// registered with the method registry under a DID method name and dispatched by method token.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// The name of the resolver implementation, used for diagnostics listings.
    fn name(&self) -> &'static str;

    /// Resolve the DID to a DID document.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedDid` - The DID does not conform to the method's syntax.
    /// * `Err::ResolutionFailed` - The method's resolution logic failed (for example, a network
    ///   retrieval failed).
    async fn resolve(&self, did: &str) -> Result<Resolution>;
}

/// The output of a DID resolution: the document plus document and resolution metadata.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// JSON-LD context for the resolution result.
    #[serde(rename = "@context")]
    pub context: String,
    /// The resolved DID document.
    pub did_document: DidDocument,
    /// Metadata about the DID document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_document_metadata: Option<DocumentMetadata>,
    /// Metadata about the resolution process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_resolution_metadata: Option<ResolutionMetadata>,
}

/// Metadata about a resolved DID document.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    /// Timestamp of document creation, if the method records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Timestamp of the last document update, if the method records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Whether the DID has been deactivated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<bool>,
}

/// Metadata about the resolution process.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolutionMetadata {
    /// Media type of the resolved document representation.
    pub content_type: String,
}

impl Default for ResolutionMetadata {
    fn default() -> Self {
        Self {
            content_type: "application/did+ld+json".to_string(),
        }
    }
}
