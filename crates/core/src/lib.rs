//! # Sovra Core
//! Shared types for the sovra trust primitives: the polymorphic [`Key`] capability, simplified
//! JWK handling with RFC 7638 thumbprints, the DID Document data model and the traits a DID
//! method implementation provides to the method registry.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub(crate) mod document;
pub mod error;
pub(crate) mod keys;
pub(crate) mod registrar;
pub(crate) mod resolver;
mod serde;

pub use document::context::{Context, DID_CONTEXT};
pub use document::service::{Endpoint, Service};
pub use document::verification_method::{KeyPurpose, VerificationMethod, VmRelationship};
pub use document::DidDocument;
pub use keys::key::Key;
pub use keys::{Jwk, KeyType};
pub use registrar::{CreateOptions, DidRegistrar, DidResult};
pub use resolver::{DidResolver, DocumentMetadata, Resolution, ResolutionMetadata};

/// Result type used throughout the sovra crates.
pub type Result<T, E = error::Error> = core::result::Result<T, E>;
