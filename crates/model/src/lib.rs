//! Content model for the Public Content API client.
//!
//! This crate contains every domain value the client exchanges with the
//! content-delivery service: compact content identifiers, the closed
//! enumerations and registries, the polymorphic item and sitemap types, the
//! paged connection shape, query inputs, context data and claims.
//!
//! ## Architectural Layer
//!
//! **Domain.** This crate has no I/O dependencies. Query assembly, response
//! decoding and transport live in the `client` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`uri`] | [`ContentUri`] parser/formatter |
//! | [`registry`] | Numeric registries: [`ContentNamespace`], [`ItemType`] |
//! | [`enums`] | Wire enumerations (`FilterItemType`, `ContentType`, …) |
//! | [`types`] | [`Timestamp`], [`Connection`], [`Pagination`] |
//! | [`items`] | [`Item`] and its variants |
//! | [`sitemap`] | [`SitemapItem`] trees |
//! | [`filters`] | Query input objects |
//! | [`context`] | [`ContextData`] and [`Claim`] |
//! | [`errors`] | [`UriError`] |

pub mod context;
pub mod enums;
pub mod errors;
pub mod filters;
pub mod items;
pub mod registry;
pub mod sitemap;
pub mod types;
pub mod uri;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use context::{claim_uris, Claim, ClaimValue, ContextData};
pub use enums::{
    Ancestor, ClaimValueType, ContentIncludeMode, ContentType, DataModelType, DcpType,
    FilterItemType, PageInclusion, SortFieldType, SortOrderType,
};
pub use errors::{UnknownValueError, UriError};
pub use filters::{InputCustomMetaCriteria, InputItemFilter, InputPublicationFilter, InputSortParam};
pub use items::{
    BinaryComponent, BinaryVariant, Component, CustomMeta, Item, ItemCommon, Keyword, Page,
    Publication, PublicationMapping, RawContent, StructureGroup, TYPENAME_FIELD,
};
pub use registry::{ContentNamespace, ItemType};
pub use sitemap::{Children, PageSitemapItem, SitemapCommon, SitemapItem, TaxonomySitemapItem};
pub use types::{Connection, Edge, PageInfo, Pagination, Timestamp};
pub use uri::ContentUri;
