//! # Sovra Transit
//! Remote key backend: private-key operations are delegated to an external secrets-transit
//! engine over HTTPS, authenticated with a bearer token. Private material never leaves the
//! service; the local [`TransitKey`] holds only the endpoint, token and server-side key name
//! plus a public view of the key.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod client;
mod key;

pub use client::{TransitClient, TransitKeyInfo, TransitKeyVersion};
pub use key::TransitKey;
