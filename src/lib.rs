//! # Sovra
//! Trust primitives for self-sovereign identity stacks: a polymorphic cryptographic key
//! abstraction with in-process ([`LocalKey`]) and transit-service ([`TransitKey`]) backends, and
//! a pluggable DID method registry ([`DidMethodRegistry`]) dispatching resolution and
//! registration to method implementations by DID method name.
//!
//! The bundled methods are `did:key`, `did:jwk` and `did:web`; additional methods plug in by
//! implementing [`DidResolver`] and/or [`DidRegistrar`] and registering under their method name.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod registry;

pub use registry::{DidMethodRegistry, MethodListing};
pub use sovra_core::error;
pub use sovra_core::{
    Context, CreateOptions, DidDocument, DidRegistrar, DidResolver, DidResult, DocumentMetadata,
    Endpoint, Jwk, Key, KeyPurpose, KeyType, Resolution, ResolutionMetadata, Result, Service,
    VerificationMethod, VmRelationship, DID_CONTEXT,
};
pub use sovra_did_jwk::DidJwk;
pub use sovra_did_key::DidKey;
pub use sovra_did_web::DidWeb;
pub use sovra_keys::LocalKey;
pub use sovra_transit::{TransitClient, TransitKey};
