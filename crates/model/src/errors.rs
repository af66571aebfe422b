//! Error types for the content model.
//!
//! [`UriError`] covers every way a compact content identifier can be rejected.
//! Errors raised while building or executing requests live in the `client`
//! crate, which wraps this type in its own client-facing error.

use thiserror::Error;

/// Failure to parse or resolve a compact content identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// The text does not match `namespace:pubId-itemId[-itemType][-vVersion]`.
    ///
    /// Also produced when a numeric component does not fit in 32 bits.
    #[error("unable to parse content URI '{input}'")]
    Parse {
        /// The rejected input text.
        input: String,
    },

    /// The namespace token is not one of the registered namespaces.
    #[error("unable to resolve namespace '{token}'")]
    UnknownNamespace {
        /// The unrecognised namespace token (or numeric id rendered as text).
        token: String,
    },

    /// The numeric item type code is not in the item-type registry.
    #[error("unknown item type code {code}")]
    UnknownItemType {
        /// The unrecognised code.
        code: u32,
    },
}

/// A textual enumeration value did not match any known variant.
///
/// Produced by the `FromStr` implementations of the wire enumerations (e.g.
/// when parsing command-line arguments).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownValueError {
    /// Name of the enumeration that was being parsed.
    pub kind: &'static str,
    /// The rejected text.
    pub value: String,
}
