//! The polymorphic key capability. Backends implement this trait so that callers can generate,
//! import, export and use signing keys without knowing whether the key material lives in-process
//! or inside a remote key management service.

use async_trait::async_trait;

use crate::keys::{Jwk, KeyType};
use crate::Result;

/// Capability surface shared by all key backends.
///
/// Implementations must be immutable once constructed: the same instance can be shared across
/// threads and used for concurrent sign/verify calls without coordination. The trait is
/// object-safe so DID method registrars can accept any backend as `&dyn Key`.
#[async_trait]
pub trait Key: Send + Sync {
    /// The signing algorithm family of the key.
    fn key_type(&self) -> KeyType;

    /// Whether the key can produce signatures. For remote backends this reports the capability,
    /// not local possession of private bytes.
    fn has_private_key(&self) -> bool;

    /// The key identifier. Equal to the RFC 7638 thumbprint of the public JWK unless an explicit
    /// identifier was supplied at import time.
    ///
    /// # Errors
    ///
    /// An error if the identifier could not be derived from the key material.
    async fn key_id(&self) -> Result<String>;

    /// The public portion of the key as a JWK.
    ///
    /// # Errors
    ///
    /// An error if the public material could not be expressed as a JWK.
    async fn public_jwk(&self) -> Result<Jwk>;

    /// Export the key as a JWK JSON string. Includes private members only when the backend holds
    /// private material locally.
    ///
    /// # Errors
    ///
    /// An error if the key could not be serialized.
    async fn export_jwk(&self) -> Result<String>;

    /// Export the key as PEM text: PKCS#8 for private material, SPKI for public-only keys.
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedAlgorithm` - The key type has no supported PEM form.
    async fn export_pem(&self) -> Result<String>;

    /// Export the public key in its raw fixed-length encoding (Ed25519 bytes or an uncompressed
    /// SEC1 point).
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedAlgorithm` - The key type has no raw public encoding.
    async fn export_raw(&self) -> Result<Vec<u8>>;

    /// Sign the message, returning the detached signature bytes.
    ///
    /// # Errors
    ///
    /// * `Err::NoPrivateKey` - The key was constructed from public material only.
    /// * `Err::BackendUnavailable` / `Err::BackendRejected` - A remote backend could not
    ///   complete the operation.
    async fn sign(&self, msg: &[u8]) -> Result<Vec<u8>>;

    /// Verify a detached signature over the message. Returns `Ok(false)` for a signature that
    /// does not verify; errors are reserved for structural and backend failures.
    ///
    /// # Errors
    ///
    /// * `Err::BackendUnavailable` / `Err::BackendRejected` - A remote backend could not
    ///   complete the operation.
    async fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<bool>;

    /// Freshly compute the RFC 7638 thumbprint over the key's public material. For a key with no
    /// explicit imported identifier this always equals [`Key::key_id`].
    ///
    /// # Errors
    ///
    /// An error if the public material could not be expressed as a JWK.
    async fn thumbprint(&self) -> Result<String> {
        self.public_jwk().await?.thumbprint()
    }
}
