//! HTTP client for a secrets-transit engine. One method per service endpoint; every call is
//! authenticated with the bearer token supplied at construction and bounded by the client
//! timeout. Transport failures and service rejections are surfaced as distinct typed errors and
//! never retried here - retry policy belongs to the caller.

use std::collections::HashMap;
use std::time::Duration;

use base64ct::{Base64, Encoding};
use chrono::{DateTime, Utc};
use reqwest::{Response, Url};
use serde::{Deserialize, Serialize};
use sovra_core::error::Err;
use sovra_core::{tracerr, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Secrets-transit service client.
#[derive(Clone)]
pub struct TransitClient {
    /// Base URL of the transit engine, e.g. `https://vault.example.com/v1/transit`.
    endpoint: String,
    /// Bearer token presented on every request.
    token: String,
    /// Reusable HTTP client.
    http_client: reqwest::Client,
}

// Request body for key creation.
#[derive(Debug, Serialize)]
struct CreateKeyRequest {
    #[serde(rename = "type")]
    key_type: String,
}

// Request body for signing.
#[derive(Debug, Serialize)]
struct SignRequest {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    marshaling_algorithm: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_algorithm: Option<&'static str>,
}

// Request body for verification.
#[derive(Debug, Serialize)]
struct VerifyRequest {
    input: String,
    signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    marshaling_algorithm: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_algorithm: Option<&'static str>,
}

// Request body for key configuration updates.
#[derive(Debug, Serialize)]
struct ConfigureKeyRequest {
    deletion_allowed: bool,
}

#[derive(Debug, Deserialize)]
struct ReadKeyResponse {
    data: TransitKeyInfo,
}

/// Key information reported by the transit engine.
#[derive(Debug, Deserialize)]
pub struct TransitKeyInfo {
    /// Service-side key type label, e.g. "ed25519".
    #[serde(rename = "type")]
    pub key_type: String,
    /// The most recent key version.
    pub latest_version: u32,
    /// Key material by version.
    pub keys: HashMap<String, TransitKeyVersion>,
}

/// A single version of a transit key.
#[derive(Debug, Deserialize)]
pub struct TransitKeyVersion {
    /// Public key material: raw base64 for Ed25519, an SPKI PEM document otherwise.
    pub public_key: Option<String>,
    /// Creation time reported by the service.
    pub creation_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    data: SignData,
}

#[derive(Debug, Deserialize)]
struct SignData {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    data: VerifyData,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    valid: bool,
}

// Error body returned by the service on rejected requests.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    errors: Vec<String>,
}

/// Transit client constructor and service operation methods.
impl TransitClient {
    /// Constructor.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the transit engine.
    /// * `token` - Bearer token used to authenticate requests.
    ///
    /// # Panics
    ///
    /// If the HTTP client cannot be created.
    #[must_use]
    pub fn new(endpoint: &str, token: &str) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("failed to create HTTP client.");
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http_client,
        }
    }

    /// Create a named key of the given service-side type.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` - The service could not be reached or timed out.
    /// * `Err::BackendRejected` - The service rejected the request.
    pub async fn create_key(&self, key_name: &str, key_type: &str) -> Result<()> {
        let url = Url::parse(&format!("{}/keys/{}", self.endpoint, key_name))?;
        let body = CreateKeyRequest {
            key_type: key_type.to_string(),
        };
        let request = self.http_client.post(url).bearer_auth(&self.token).json(&body);

        let response = match request.send().await {
            Ok(res) => res,
            Err(e) => {
                tracerr!(Err::BackendUnavailable, "unable to reach transit service: {e}");
            }
        };
        check_status(response).await?;
        Ok(())
    }

    /// Read a key, returning the service-reported key information including public material for
    /// every version.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` - The service could not be reached or timed out.
    /// * `Err::BackendRejected` - The service rejected the request (for example, the key does
    ///   not exist).
    pub async fn read_key(&self, key_name: &str) -> Result<TransitKeyInfo> {
        let url = Url::parse(&format!("{}/keys/{}", self.endpoint, key_name))?;
        let res = match self.http_client.get(url).bearer_auth(&self.token).send().await {
            Ok(res) => res,
            Err(e) => {
                tracerr!(Err::BackendUnavailable, "unable to reach transit service: {e}");
            }
        };
        let parsed = unpack_response::<ReadKeyResponse>(res).await?;
        Ok(parsed.data)
    }

    /// Sign a message with the named key.
    ///
    /// # Arguments
    ///
    /// * `key_name` - Name of the signing key.
    /// * `msg` - The message to sign. Hashing is performed by the service.
    /// * `marshaling` - Optional signature marshaling algorithm understood by the service.
    /// * `algorithm` - Optional signature algorithm for key types that support more than one.
    ///
    /// # Returns
    ///
    /// The detached signature bytes.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` - The service could not be reached or timed out.
    /// * `Err::BackendRejected` - The service rejected the request.
    pub async fn sign(
        &self, key_name: &str, msg: &[u8], marshaling: Option<&'static str>,
        algorithm: Option<&'static str>,
    ) -> Result<Vec<u8>> {
        let url = Url::parse(&format!("{}/sign/{}", self.endpoint, key_name))?;
        let body = SignRequest {
            input: Base64::encode_string(msg),
            marshaling_algorithm: marshaling,
            signature_algorithm: algorithm,
        };
        let res = match self.http_client.post(url).bearer_auth(&self.token).json(&body).send().await
        {
            Ok(res) => res,
            Err(e) => {
                tracerr!(Err::BackendUnavailable, "unable to reach transit service: {e}");
            }
        };
        let parsed = unpack_response::<SignResponse>(res).await?;
        decode_signature(&parsed.data.signature)
    }

    /// Verify a signature with the named key. Returns false when the service reports the
    /// signature does not match.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` - The service could not be reached or timed out.
    /// * `Err::BackendRejected` - The service rejected the request.
    pub async fn verify(
        &self, key_name: &str, msg: &[u8], signature: &[u8], marshaling: Option<&'static str>,
        algorithm: Option<&'static str>,
    ) -> Result<bool> {
        let url = Url::parse(&format!("{}/verify/{}", self.endpoint, key_name))?;
        let body = VerifyRequest {
            input: Base64::encode_string(msg),
            signature: encode_signature(signature),
            marshaling_algorithm: marshaling,
            signature_algorithm: algorithm,
        };
        let res = match self.http_client.post(url).bearer_auth(&self.token).json(&body).send().await
        {
            Ok(res) => res,
            Err(e) => {
                tracerr!(Err::BackendUnavailable, "unable to reach transit service: {e}");
            }
        };
        let parsed = unpack_response::<VerifyResponse>(res).await?;
        Ok(parsed.data.valid)
    }

    /// Remove a key from the service. This is a convenience method for testing; dropping a
    /// [`super::TransitKey`] never deletes server-side material.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` - The service could not be reached or timed out.
    /// * `Err::BackendRejected` - The service rejected the request.
    pub async fn delete_key(&self, key_name: &str) -> Result<()> {
        // deletion must be enabled on the key before the service accepts the delete
        let url = Url::parse(&format!("{}/keys/{}/config", self.endpoint, key_name))?;
        let body = ConfigureKeyRequest {
            deletion_allowed: true,
        };
        let res = match self.http_client.post(url).bearer_auth(&self.token).json(&body).send().await
        {
            Ok(res) => res,
            Err(e) => {
                tracerr!(Err::BackendUnavailable, "unable to reach transit service: {e}");
            }
        };
        check_status(res).await?;

        let url = Url::parse(&format!("{}/keys/{}", self.endpoint, key_name))?;
        let res = match self.http_client.delete(url).bearer_auth(&self.token).send().await {
            Ok(res) => res,
            Err(e) => {
                tracerr!(Err::BackendUnavailable, "unable to reach transit service: {e}");
            }
        };
        check_status(res).await?;
        Ok(())
    }
}

// Signatures cross the wire as "<scheme>:v<version>:<base64>".
pub(crate) fn decode_signature(value: &str) -> Result<Vec<u8>> {
    let Some(encoded) = value.split(':').next_back() else {
        tracerr!(Err::BackendRejected, "service returned an empty signature");
    };
    match Base64::decode_vec(encoded) {
        Ok(bytes) => Ok(bytes),
        Err(e) => tracerr!(Err::BackendRejected, "undecodable signature from service: {e}"),
    }
}

pub(crate) fn encode_signature(signature: &[u8]) -> String {
    format!("vault:v1:{}", Base64::encode_string(signature))
}

// Surface a rejection for any non-success status, with the service's error detail when present.
async fn check_status(res: Response) -> Result<Response> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    match res.json::<ApiErrorResponse>().await {
        Ok(err) => tracerr!(
            Err::BackendRejected,
            "transit service rejected request ({status}): {}",
            err.errors.join("; ")
        ),
        Err(_) => tracerr!(Err::BackendRejected, "transit service rejected request ({status})"),
    }
}

// Unpack a JSON response body after status checking.
async fn unpack_response<T>(res: Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let res = check_status(res).await?;
    match res.json::<T>().await {
        Ok(obj) => Ok(obj),
        Err(e) => {
            tracerr!(Err::SerializationError, "unable to deserialize service response: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_wire_format_round_trip() {
        let sig = vec![1u8, 2, 3, 4];
        let encoded = encode_signature(&sig);
        assert!(encoded.starts_with("vault:v1:"));
        assert_eq!(decode_signature(&encoded).expect("failed to decode"), sig);
    }

    #[test]
    fn undecodable_signature_is_a_rejection() {
        let err = decode_signature("vault:v1:!!!").expect_err("expected error");
        assert!(err.is(Err::BackendRejected));
    }

    #[test]
    fn read_key_response_shape() {
        let body = r#"{
            "data": {
                "type": "ed25519",
                "latest_version": 1,
                "keys": {
                    "1": {
                        "public_key": "Gb9ECWmEzf6FQbrBZ9w7lshQhqowtrbLDFw4rXAxZuE=",
                        "creation_time": "2024-05-02T10:03:11.000000Z"
                    }
                }
            }
        }"#;
        let parsed: ReadKeyResponse = serde_json::from_str(body).expect("failed to parse");
        assert_eq!(parsed.data.key_type, "ed25519");
        assert_eq!(parsed.data.latest_version, 1);
        let version = parsed.data.keys.get("1").expect("expected version 1");
        assert!(version.public_key.is_some());
        assert!(version.creation_time.is_some());
    }

    #[test]
    fn sign_request_omits_absent_options() {
        let body = SignRequest {
            input: "AQID".to_string(),
            marshaling_algorithm: None,
            signature_algorithm: None,
        };
        let val = serde_json::to_value(&body).expect("failed to serialize");
        assert_eq!(val, serde_json::json!({"input": "AQID"}));
    }

    // Live-service tests follow. They require a running transit engine and are ignored by
    // default: set TRANSIT_ENDPOINT and TRANSIT_TOKEN to run them.
    fn test_client() -> TransitClient {
        let endpoint = std::env::var("TRANSIT_ENDPOINT").expect("TRANSIT_ENDPOINT env var not set");
        let token = std::env::var("TRANSIT_TOKEN").expect("TRANSIT_TOKEN env var not set");
        TransitClient::new(&endpoint, &token)
    }

    #[tokio::test]
    #[ignore]
    async fn create_key_then_read_then_delete() {
        let client = test_client();
        let key_name = format!("test-key-{}", uuid::Uuid::new_v4());

        client.create_key(&key_name, "ed25519").await.expect("failed to create key");

        let info = client.read_key(&key_name).await.expect("failed to read key");
        assert_eq!(info.key_type, "ed25519");
        assert!(info.keys.contains_key(&info.latest_version.to_string()));

        client.delete_key(&key_name).await.expect("failed to delete key");
    }

    #[tokio::test]
    #[ignore]
    async fn read_missing_key_is_rejected() {
        let client = test_client();
        let err = client.read_key("unlikely-test-key").await.expect_err("expected error");
        assert!(err.is(Err::BackendRejected));
    }
}
