//! Public Content API client core.
//!
//! Assembles GraphQL requests from named templates, hands them to a
//! [`GraphqlTransport`], and decodes the responses into the types of the
//! `model` crate. [`PublicContentApi`] is the entry point; everything else is
//! exposed for callers that need to assemble or decode requests themselves.
//!
//! ## Architectural Layer
//!
//! **Application.** The transport is a port; the HTTP implementation lives
//! in the `graphql-http` crate and the composition root in `cli`.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`api`] | [`PublicContentApi`], [`ApiConfig`], per-call options |
//! | [`builder`] | [`RequestBuilder`] and fragment selection |
//! | [`templates`] | [`QueryTemplates`] store and built-in templates |
//! | [`request`] | [`GraphqlRequest`] |
//! | [`decode`] | [`Decode`] and polymorphic dispatch |
//! | [`transport`] | [`GraphqlTransport`] port |
//! | [`errors`] | Error types |

pub mod api;
pub mod builder;
pub mod decode;
pub mod errors;
pub mod request;
pub mod templates;
pub mod transport;

pub use api::{ApiConfig, ModelOptions, PublicContentApi, RequestOptions};
pub use builder::{fragments_for_item_types, RequestBuilder};
pub use decode::{decode_at, parse_response, Decode};
pub use errors::{BuildError, ContentApiError, DecodeError, TransportError};
pub use request::GraphqlRequest;
pub use templates::QueryTemplates;
pub use transport::GraphqlTransport;
