//! # DID Web Implementation
//! <https://w3c-ccg.github.io/did-method-web/>
//!
//! The method-specific identifier names the host (and optional path) the DID document is served
//! from: `did:web:example.com%3A8443:user:alice` resolves to
//! `https://example.com:8443/user/alice/did.json`.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// DID Web registrar. Implementation of the create operation.
pub mod registrar;
/// DID Web resolver. Implementation of the DID read operation.
pub mod resolver;

/// The `did:web` method implementation, registered for both resolution and registration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DidWeb;

impl DidWeb {
    /// Create a new method instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}
