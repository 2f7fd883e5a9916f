//! Read operation for the `did:web` method: maps the DID to its HTTPS document location and
//! retrieves the document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use sovra_core::error::Err;
use sovra_core::{
    tracerr, DidDocument, DidResolver, DocumentMetadata, Resolution, ResolutionMetadata, Result,
    DID_CONTEXT,
};

use crate::DidWeb;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
impl DidResolver for DidWeb {
    fn name(&self) -> &'static str {
        "sovra-did-web"
    }

    /// Resolve a DID of the form did:web:domain[%3Aport][:path:segments] by fetching the
    /// document from the implied HTTPS location.
    async fn resolve(&self, did: &str) -> Result<Resolution> {
        let url = url_for_did(did)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let Ok(http_client) =
            reqwest::Client::builder().default_headers(headers).timeout(REQUEST_TIMEOUT).build()
        else {
            tracerr!(Err::ResolutionFailed, "failed to create HTTP client");
        };

        let res = match http_client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracerr!(Err::ResolutionFailed, "error sending DID resolution request: {e}");
            }
        };
        if !res.status().is_success() {
            tracerr!(
                Err::ResolutionFailed,
                "DID resolution request returned status {}",
                res.status()
            );
        }

        let did_document = match res.json::<DidDocument>().await {
            Ok(doc) => doc,
            Err(e) => {
                tracerr!(Err::ResolutionFailed, "retrieved document is not a DID document: {e}");
            }
        };

        let content_type = if did_document.context.is_empty() {
            "application/did+json".to_string()
        } else {
            "application/did+ld+json".to_string()
        };

        Ok(Resolution {
            context: DID_CONTEXT.to_string(),
            did_document,
            did_document_metadata: Some(DocumentMetadata::default()),
            did_resolution_metadata: Some(ResolutionMetadata { content_type }),
        })
    }
}

// Map a did:web DID to the HTTPS location of its document. Port is carried url-encoded (%3A) and
// path sub-segments are separated by colons.
fn url_for_did(did: &str) -> Result<Url> {
    let Some(id) = did.strip_prefix("did:web:") else {
        tracerr!(Err::MalformedDid, "DID is not a valid did:web: {did}");
    };
    if id.is_empty() {
        tracerr!(Err::MalformedDid, "DID has no method-specific id: {did}");
    }

    let has_path = id.contains(':');
    let mut location = "https://".to_owned() + &id.replace(':', "/").replace("%3A", ":");
    if has_path {
        location += "/did.json";
    } else {
        location += "/.well-known/did.json";
    }

    let Ok(url) = Url::parse(&location) else {
        tracerr!(Err::MalformedDid, "DID does not map to a valid URL: {did}");
    };
    Ok(url)
}
