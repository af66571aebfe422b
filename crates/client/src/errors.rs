//! Error types for request assembly, transport, decoding, and the facade.
//!
//! Each stage has its own error type. [`ContentApiError`] is the single
//! client-facing error every facade operation returns; it keeps the stage
//! error as its source so callers can still reach the original cause.

use model::UriError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Request assembly
// ---------------------------------------------------------------------------

/// The request builder was misconfigured.
#[derive(Debug, Error)]
pub enum BuildError {
    /// `build` was called before a query name was set.
    #[error("Configuration error: no query name set")]
    MissingQueryName,

    /// The query name has no template in the template store.
    #[error("Configuration error: unknown query '{name}'")]
    UnknownQuery {
        /// The requested query name.
        name: String,
    },

    /// A fragment was referenced (by spread, injection or recursion) but has
    /// no definition in the template store.
    #[error("Configuration error: unknown fragment '{name}'")]
    UnknownFragment {
        /// The referenced fragment name.
        name: String,
    },

    /// Fragments were injected into a query template that has no insertion
    /// point for them.
    #[error("Configuration error: query '{query}' has no '{marker}' insertion point")]
    MissingInsertionPoint {
        /// The query template name.
        query: String,
        /// The expected marker text.
        marker: &'static str,
    },

    /// A `#if` / `#endif` region in a template is not balanced.
    #[error("Configuration error: unbalanced '#if' region in '{template}'")]
    UnbalancedRegion {
        /// Name of the query or fragment template.
        template: String,
    },

    /// A variable value could not be serialised to JSON.
    #[error("Configuration error: variable '{name}' could not be serialised")]
    InvalidVariable {
        /// The variable name.
        name: String,
        /// The serialisation failure.
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::GraphqlTransport`].
///
/// The core treats this as opaque: it is wrapped and surfaced, never
/// inspected.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attaches the HTTP status the server answered with.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// HTTP status, when the failure came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// The response (or a sub-node of it) does not match the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// JSON parse failure, or a shape mismatch against `target`.
    #[error("unable to map result to {target}")]
    Mapping {
        /// Name of the type being decoded.
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The `__typename` discriminator names no known variant of `target`.
    #[error("unknown {target} variant '{discriminator}'")]
    UnknownVariant {
        /// Name of the polymorphic type being decoded.
        target: &'static str,
        /// The unrecognised discriminator value.
        discriminator: String,
    },
}

// ---------------------------------------------------------------------------
// Client-facing error
// ---------------------------------------------------------------------------

/// Error returned by every [`crate::PublicContentApi`] operation.
#[derive(Debug, Error)]
pub enum ContentApiError {
    /// A compact content identifier argument was invalid.
    #[error("invalid content URI")]
    Uri(#[from] UriError),

    /// The request could not be assembled.
    #[error("unable to build request")]
    Configuration(#[from] BuildError),

    /// The transport failed to execute the request.
    #[error("unable to execute query '{query}'")]
    Transport {
        /// Name of the query that was being executed.
        query: String,
        #[source]
        source: TransportError,
    },

    /// The response could not be decoded.
    #[error("unable to decode result")]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn transport_error_keeps_source_and_status() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::with_source("connect failed", io).with_status(503);
        assert_eq!(err.to_string(), "connect failed");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn content_api_error_exposes_cause() {
        let err = ContentApiError::Transport {
            query: "Publication".into(),
            source: TransportError::new("timed out"),
        };
        assert_eq!(err.to_string(), "unable to execute query 'Publication'");
        assert_eq!(err.source().unwrap().to_string(), "timed out");

        let err = ContentApiError::from(UriError::UnknownItemType { code: 3 });
        assert_eq!(err.source().unwrap().to_string(), "unknown item type code 3");
    }
}
