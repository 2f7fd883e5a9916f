//! Remote key variant. Signing and verification are delegated to the transit service; the local
//! object stores the endpoint, token and server-assigned key name plus a public-only view of the
//! key, never private bytes.

use std::sync::Arc;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use sovra_core::error::Err;
use sovra_core::{tracerr, Jwk, Key, KeyType, Result};
use sovra_keys::LocalKey;

use crate::client::TransitClient;

/// Implementation of the [`Key`] capability backed by a secrets-transit engine.
pub struct TransitKey {
    key_type: KeyType,
    /// Server-side key name.
    name: String,
    client: Arc<TransitClient>,
    /// Public view of the key, used for exports and verification material.
    public: LocalKey,
    /// Thumbprint over the exported public material, computed once at construction.
    key_id: String,
}

impl TransitKey {
    /// Create a fresh key inside the transit service and return a handle to it.
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedAlgorithm` - The service does not offer the key type (secp256k1).
    /// * `Err::BackendUnavailable` / `Err::BackendRejected` - The create or read-back request
    ///   failed.
    pub async fn generate(key_type: KeyType, client: &Arc<TransitClient>) -> Result<Self> {
        let kind = service_key_type(key_type)?;
        let name = format!("sovra-{}", uuid::Uuid::new_v4());
        client.create_key(&name, kind).await?;
        Self::import(&name, client).await
    }

    /// Adopt an existing server-side key by name.
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedAlgorithm` - The service reports a key type outside the supported set.
    /// * `Err::BackendUnavailable` / `Err::BackendRejected` - The read request failed.
    /// * `Err::MalformedKey` - The service returned public material that could not be decoded.
    pub async fn import(name: &str, client: &Arc<TransitClient>) -> Result<Self> {
        let info = client.read_key(name).await?;
        let key_type = key_type_from_service(&info.key_type)?;

        let latest = info.latest_version.to_string();
        let Some(version) = info.keys.get(&latest) else {
            tracerr!(Err::BackendRejected, "service reported no material for version {latest}");
        };
        let Some(public_str) = &version.public_key else {
            tracerr!(Err::BackendRejected, "service reported no public key for {name}");
        };

        // Ed25519 public keys come back as raw base64; EC and RSA as SPKI PEM documents.
        let public = if key_type == KeyType::Ed25519 {
            let Ok(bytes) = Base64::decode_vec(public_str) else {
                tracerr!(Err::MalformedKey, "undecodable public key from service");
            };
            LocalKey::import_raw_public_key(key_type, &bytes)?
        } else {
            LocalKey::import_pem(public_str)?
        };
        let key_id = public.thumbprint().await?;

        Ok(Self {
            key_type,
            name: name.to_string(),
            client: client.clone(),
            public,
            key_id,
        })
    }

    /// The server-side key name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The public-only view of this key as an in-process key.
    #[must_use]
    pub const fn public_key(&self) -> &LocalKey {
        &self.public
    }

    /// Delete the server-side key. This is a convenience for test cleanup; dropping the handle
    /// never deletes server-side material.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` / `Err::BackendRejected` - The delete request failed.
    pub async fn destroy(&self) -> Result<()> {
        self.client.delete_key(&self.name).await
    }
}

#[async_trait]
impl Key for TransitKey {
    fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// True for every transit signing key: the key can produce signatures even though private
    /// bytes are never materialized locally.
    fn has_private_key(&self) -> bool {
        true
    }

    async fn key_id(&self) -> Result<String> {
        Ok(self.key_id.clone())
    }

    async fn public_jwk(&self) -> Result<Jwk> {
        self.public.public_jwk().await
    }

    async fn export_jwk(&self) -> Result<String> {
        // public members only - the service never releases private material
        self.public.export_jwk().await
    }

    async fn export_pem(&self) -> Result<String> {
        self.public.export_pem().await
    }

    async fn export_raw(&self) -> Result<Vec<u8>> {
        self.public.export_raw().await
    }

    async fn sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let (marshaling, algorithm) = signature_options(self.key_type);
        self.client.sign(&self.name, msg, marshaling, algorithm).await
    }

    async fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<bool> {
        let (marshaling, algorithm) = signature_options(self.key_type);
        self.client.verify(&self.name, msg, signature, marshaling, algorithm).await
    }
}

// Map a key type to the service-side type label. The transit engine does not offer secp256k1.
fn service_key_type(key_type: KeyType) -> Result<&'static str> {
    match key_type {
        KeyType::Ed25519 => Ok("ed25519"),
        KeyType::Secp256r1 => Ok("ecdsa-p256"),
        KeyType::Rsa => Ok("rsa-2048"),
        KeyType::Secp256k1 => {
            tracerr!(Err::UnsupportedAlgorithm, "transit service does not offer secp256k1 keys")
        }
    }
}

fn key_type_from_service(label: &str) -> Result<KeyType> {
    match label {
        "ed25519" => Ok(KeyType::Ed25519),
        "ecdsa-p256" => Ok(KeyType::Secp256r1),
        "rsa-2048" | "rsa-3072" | "rsa-4096" => Ok(KeyType::Rsa),
        other => {
            tracerr!(Err::UnsupportedAlgorithm, "unsupported service key type: {other}")
        }
    }
}

// Fixed-width (r || s) marshaling for ECDSA, PKCS#1 v1.5 for RSA, service defaults otherwise.
const fn signature_options(key_type: KeyType) -> (Option<&'static str>, Option<&'static str>) {
    match key_type {
        KeyType::Secp256r1 => (Some("jws"), None),
        KeyType::Rsa => (None, Some("pkcs1v15")),
        KeyType::Ed25519 | KeyType::Secp256k1 => (None, None),
    }
}
