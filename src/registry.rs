//! Name-indexed dispatch to pluggable DID resolution and registration logic. The registry is an
//! explicitly constructed object, typically populated once at process start and then read far
//! more often than written; registration is an idempotent upsert so test and method overrides
//! are safe at any time.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;
use sovra_core::error::Err;
use sovra_core::{
    tracerr, CreateOptions, DidRegistrar, DidResolver, DidResult, Key, Resolution, Result,
};
use sovra_did_jwk::DidJwk;
use sovra_did_key::DidKey;
use sovra_did_web::DidWeb;

// Minimal DID grammar: lowercase method token plus a non-empty method-specific id.
static DID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^did:([a-z0-9-]+):.+$").expect("DID regex must compile"));

/// Registry mapping DID method names to resolver and registrar capabilities.
///
/// Reads and writes are safe under concurrency: each map is guarded by a lock, and lookups clone
/// the capability handle out before any awaiting so no lock is held across I/O.
#[derive(Default)]
pub struct DidMethodRegistry {
    resolvers: RwLock<HashMap<String, Arc<dyn DidResolver>>>,
    registrars: RwLock<HashMap<String, Arc<dyn DidRegistrar>>>,
}

/// Registered method names grouped by the name of the backing implementation, for diagnostics.
#[derive(Clone, Debug, Default)]
pub struct MethodListing {
    /// Resolver implementation name to the method names it serves.
    pub resolvers: HashMap<String, Vec<String>>,
    /// Registrar implementation name to the method names it serves.
    pub registrars: HashMap<String, Vec<String>>,
}

impl DidMethodRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled methods (`key`, `jwk`, `web`) registered for both
    /// resolution and registration.
    #[must_use]
    pub fn with_default_methods() -> Self {
        let registry = Self::new();

        let key = Arc::new(DidKey::new());
        registry.register_resolver("key", key.clone());
        registry.register_registrar("key", key);

        let jwk = Arc::new(DidJwk::new());
        registry.register_resolver("jwk", jwk.clone());
        registry.register_registrar("jwk", jwk);

        let web = Arc::new(DidWeb::new());
        registry.register_resolver("web", web.clone());
        registry.register_registrar("web", web);

        registry
    }

    /// Register a resolver for a method name. A later registration for the same name replaces
    /// the earlier one.
    pub fn register_resolver(&self, method: &str, resolver: Arc<dyn DidResolver>) {
        tracing::debug!("registering resolver {} for method {method}", resolver.name());
        let mut map = self.resolvers.write().expect("resolver map lock poisoned");
        map.insert(method.to_string(), resolver);
    }

    /// Register a registrar for a method name. A later registration for the same name replaces
    /// the earlier one.
    pub fn register_registrar(&self, method: &str, registrar: Arc<dyn DidRegistrar>) {
        tracing::debug!("registering registrar {} for method {method}", registrar.name());
        let mut map = self.registrars.write().expect("registrar map lock poisoned");
        map.insert(method.to_string(), registrar);
    }

    /// Resolve a DID through the resolver registered for its method.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedDid` - The string does not match the DID grammar.
    /// * `Err::UnknownMethod` - No resolver is registered for the method.
    /// * Any error surfaced by the method's resolver.
    pub async fn resolve(&self, did: &str) -> Result<Resolution> {
        let method = parse_method(did)?;
        let resolver = {
            let map = self.resolvers.read().expect("resolver map lock poisoned");
            map.get(method).cloned()
        };
        let Some(resolver) = resolver else {
            tracerr!(Err::UnknownMethod, "no resolver registered for method {method}");
        };
        resolver.resolve(did).await
    }

    /// Register a key with the registrar for the given method, producing a DID and document.
    ///
    /// # Errors
    ///
    /// * `Err::UnknownMethod` - No registrar is registered for the method.
    /// * Any error surfaced by the method's registrar.
    pub async fn register_by_key(
        &self, method: &str, key: &dyn Key, options: &CreateOptions,
    ) -> Result<DidResult> {
        let registrar = {
            let map = self.registrars.read().expect("registrar map lock poisoned");
            map.get(method).cloned()
        };
        let Some(registrar) = registrar else {
            tracerr!(Err::UnknownMethod, "no registrar registered for method {method}");
        };
        registrar.register(key, options).await
    }

    /// The registered method names and the name of the resolver implementation serving each.
    #[must_use]
    pub fn resolver_methods(&self) -> HashMap<String, String> {
        let map = self.resolvers.read().expect("resolver map lock poisoned");
        map.iter().map(|(method, r)| (method.clone(), r.name().to_string())).collect()
    }

    /// The registered method names and the name of the registrar implementation serving each.
    #[must_use]
    pub fn registrar_methods(&self) -> HashMap<String, String> {
        let map = self.registrars.read().expect("registrar map lock poisoned");
        map.iter().map(|(method, r)| (method.clone(), r.name().to_string())).collect()
    }

    /// The registered method names grouped by backing implementation name. A pure read with no
    /// side effects.
    #[must_use]
    pub fn methods(&self) -> MethodListing {
        let mut listing = MethodListing::default();
        for (method, implementation) in self.resolver_methods() {
            listing.resolvers.entry(implementation).or_default().push(method);
        }
        for (method, implementation) in self.registrar_methods() {
            listing.registrars.entry(implementation).or_default().push(method);
        }
        for methods in listing.resolvers.values_mut().chain(listing.registrars.values_mut()) {
            methods.sort();
        }
        listing
    }
}

// Extract the method token from a DID string.
fn parse_method(did: &str) -> Result<&str> {
    let Some(caps) = DID_REGEX.captures(did) else {
        tracerr!(Err::MalformedDid, "input does not match the DID grammar: {did}");
    };
    let Some(method) = caps.get(1) else {
        tracerr!(Err::MalformedDid, "input has no method token: {did}");
    };
    Ok(method.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_method_token() {
        assert_eq!(parse_method("did:key:z6Mk").expect("expected method"), "key");
        assert_eq!(parse_method("did:web:example.com:user").expect("expected method"), "web");

        for input in ["not-a-did", "did:", "did:key", "did:key:", "did:KEY:abc", ""] {
            let err = parse_method(input).expect_err("expected error");
            assert!(err.is(Err::MalformedDid), "expected MalformedDid for {input}");
        }
    }
}
