//! Shared value types: timestamps and the paged connection shape.
//!
//! Every paged query returns a [`Connection`]: a page of [`Edge`]s (cursor +
//! node) plus a [`PageInfo`] block. [`Pagination`] is the matching input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC timestamp as reported by the content service (RFC 3339 on the wire).
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Page request for connection queries.
///
/// Both fields are optional; absent fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of edges to return.
    pub first: Option<u32>,
    /// Cursor to continue after (the previous page's `endCursor`).
    pub after: Option<String>,
}

impl Pagination {
    /// First page of at most `first` edges.
    pub fn first(first: u32) -> Self {
        Self {
            first: Some(first),
            after: None,
        }
    }

    /// Returns the request for the page following `page_info`, or `None` when
    /// there is no next page.
    pub fn next(&self, page_info: &PageInfo) -> Option<Self> {
        if !page_info.has_next_page {
            return None;
        }
        page_info.end_cursor.as_ref().map(|cursor| Self {
            first: self.first,
            after: Some(cursor.clone()),
        })
    }
}

/// Cursor-based page info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there is another page.
    #[serde(default)]
    pub has_next_page: bool,
    /// Cursor of the last edge in this page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One element of a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// Opaque position of this edge.
    #[serde(default)]
    pub cursor: Option<String>,
    /// The element itself.
    pub node: T,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Iterates the nodes of this page, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Consumes the connection, returning its nodes.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
