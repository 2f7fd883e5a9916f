//! # Errors
//!
//! Typed errors shared by the key abstraction and the DID method registry, including the traits
//! implemented by backend and method crates.

use std::fmt::Display;

use thiserror::Error;

/// Construct a typed error with tracing and optional formatted context.
///
/// # Example
/// ```
/// use sovra_core::error::Err;
/// use sovra_core::{tracerr, Result};
///
/// fn with_msg() -> Result<()> {
///     tracerr!(Err::MalformedKey, "missing member: {}", "x")
/// }
///
/// fn no_msg() -> Result<()> {
///     tracerr!(Err::MalformedKey)
/// }
/// ```
#[macro_export]
macro_rules! tracerr {
    // with context
    ($code:expr, $($msg:tt)*) => {
        {
        use $crate::error::Context as _;
        tracing::error!($($msg)*);
        return Err($code).context(format!($($msg)*));
        }
    };
    // no context
    ($code:expr) => {
        {
        tracing::error!("{}", $code);
        return Err($code.into());
        }
    }
}

/// Public error type. Wraps a typed [`Err`] with optional context.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(#[from] anyhow::Error);

impl Error {
    /// Express the error in a JSON-friendly shape with a stable code and a description.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.0.root_cause().to_string(),
            "error_description": self.to_string(),
        })
    }

    /// Returns true if `err` is the typed error held by this error object.
    #[must_use]
    pub fn is(&self, err: Err) -> bool {
        self.0.downcast_ref::<Err>().is_some_and(|e| e == &err)
    }
}

/// Typed errors for key handling and DID method dispatch.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum Err {
    /// A JWK or PEM input is structurally invalid: required members are missing or the envelope
    /// cannot be decoded.
    #[error("malformed_key")]
    MalformedKey,

    /// Well-formed input naming an algorithm, curve or encoding combination outside the
    /// supported set.
    #[error("unsupported_algorithm")]
    UnsupportedAlgorithm,

    /// Raw key bytes failed point or length validation.
    #[error("invalid_encoding")]
    InvalidEncoding,

    /// A private-key operation was requested on a key constructed from public material only.
    #[error("no_private_key")]
    NoPrivateKey,

    /// A remote key backend could not be reached or the request timed out.
    #[error("backend_unavailable")]
    BackendUnavailable,

    /// A remote key backend rejected the request (bad token, unknown key, service error).
    #[error("backend_rejected")]
    BackendRejected,

    /// The DID method has no registered resolver or registrar.
    #[error("unknown_method")]
    UnknownMethod,

    /// The input string does not match the DID grammar.
    #[error("malformed_did")]
    MalformedDid,

    /// A DID method registrar failed to produce a DID Document.
    #[error("registration_failed")]
    RegistrationFailed,

    /// A DID method resolver failed to produce a DID Document.
    #[error("resolution_failed")]
    ResolutionFailed,

    /// An error occurred serializing or deserializing data.
    #[error("serialization_error")]
    SerializationError,

    /// Failure to produce a signature.
    #[error("signing_error")]
    SigningError,
}

/// Context is used to decorate errors with useful context information.
pub trait Context<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Adds context to the error.
    ///
    /// # Errors
    ///
    /// * Original error with context appended.
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T, E> for core::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(Error(anyhow::Error::from(e).context(context))),
        }
    }
}

impl From<Err> for Error {
    fn from(error: Err) -> Self {
        Error(error.into())
    }
}

impl From<base64ct::Error> for Error {
    fn from(err: base64ct::Error) -> Error {
        Error(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error(err.into())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error(err.into())
    }
}
