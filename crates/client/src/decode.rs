//! Response decoding.
//!
//! [`decode_at`] locates a sub-node of a response by JSON pointer and maps it
//! through [`Decode`]. Plain types decode with serde. [`Item`] and
//! [`SitemapItem`] read the `__typename` discriminator first and dispatch
//! through a fixed table; an unrecognised discriminator is an error, never a
//! fallback to some base shape.

use model::{
    BinaryComponent, Children, Component, Connection, Edge, Item, Keyword, Page, PageSitemapItem,
    Publication, PublicationMapping, SitemapItem, StructureGroup, TaxonomySitemapItem,
    TYPENAME_FIELD,
};
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::errors::DecodeError;

/// Field holding the children of a taxonomy sitemap node.
const CHILDREN_FIELD: &str = "items";

/// A type that can be built from a JSON node of a response.
pub trait Decode: Sized {
    /// Type name used in error messages.
    const TARGET: &'static str;

    fn decode(value: Value) -> Result<Self, DecodeError>;
}

fn from_serde<T: DeserializeOwned>(target: &'static str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Mapping { target, source })
}

macro_rules! decode_with_serde {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Decode for $ty {
                const TARGET: &'static str = $name;

                fn decode(value: Value) -> Result<Self, DecodeError> {
                    from_serde(Self::TARGET, value)
                }
            }
        )+
    };
}

decode_with_serde! {
    Publication => "Publication",
    PublicationMapping => "PublicationMapping",
    Page => "Page",
    Component => "Component",
    BinaryComponent => "BinaryComponent",
    Keyword => "Keyword",
    StructureGroup => "StructureGroup",
    String => "String",
}

impl Decode for Value {
    const TARGET: &'static str = "JSON";

    fn decode(value: Value) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl<T: Decode> Decode for Vec<T> {
    const TARGET: &'static str = "array";

    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Array(values) => values.into_iter().map(T::decode).collect(),
            other => Err(shape_mismatch(Self::TARGET, &other, "an array")),
        }
    }
}

impl<T: Decode> Decode for Connection<T> {
    const TARGET: &'static str = "Connection";

    /// Edges go through `T::decode` one by one so that polymorphic nodes
    /// dispatch per edge.
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut object = match value {
            Value::Object(object) => object,
            other => return Err(shape_mismatch(Self::TARGET, &other, "an object")),
        };
        let edges = match object.remove("edges") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(edges)) => edges
                .into_iter()
                .map(decode_edge::<T>)
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(shape_mismatch(Self::TARGET, &other, "an array of edges")),
        };
        let page_info = match object.remove("pageInfo") {
            None | Some(Value::Null) => Default::default(),
            Some(info) => from_serde(Self::TARGET, info)?,
        };
        Ok(Connection { edges, page_info })
    }
}

fn decode_edge<T: Decode>(value: Value) -> Result<Edge<T>, DecodeError> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(shape_mismatch("Edge", &other, "an object")),
    };
    let cursor = match object.remove("cursor") {
        None | Some(Value::Null) => None,
        Some(cursor) => Some(from_serde("Edge", cursor)?),
    };
    let node = T::decode(object.remove("node").unwrap_or(Value::Null))?;
    Ok(Edge { cursor, node })
}

fn shape_mismatch(target: &'static str, found: &Value, expected: &str) -> DecodeError {
    DecodeError::Mapping {
        target,
        source: serde_json::Error::custom(format!("expected {expected}, found {}", kind(found))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads the `__typename` of an object node.
fn discriminator(target: &'static str, value: &Value) -> Result<String, DecodeError> {
    match value.get(TYPENAME_FIELD) {
        Some(Value::String(name)) => Ok(name.clone()),
        _ => Err(DecodeError::Mapping {
            target,
            source: serde_json::Error::missing_field(TYPENAME_FIELD),
        }),
    }
}

/// Finds the decoder registered for a discriminator.
fn dispatch<T>(
    target: &'static str,
    table: &[(&'static str, fn(Value) -> Result<T, DecodeError>)],
    value: Value,
) -> Result<T, DecodeError> {
    let tag = discriminator(target, &value)?;
    match table.iter().find(|(name, _)| *name == tag) {
        Some((_, decode)) => decode(value),
        None => Err(DecodeError::UnknownVariant {
            target,
            discriminator: tag,
        }),
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

type ItemDecoder = fn(Value) -> Result<Item, DecodeError>;

const ITEM_VARIANTS: &[(&str, ItemDecoder)] = &[
    ("Page", decode_page),
    ("Component", decode_component),
    ("BinaryComponent", decode_binary_component),
    ("Keyword", decode_keyword),
    ("Publication", decode_publication),
    ("StructureGroup", decode_structure_group),
];

fn decode_page(value: Value) -> Result<Item, DecodeError> {
    Page::decode(value).map(Item::Page)
}

fn decode_component(value: Value) -> Result<Item, DecodeError> {
    Component::decode(value).map(Item::Component)
}

fn decode_binary_component(value: Value) -> Result<Item, DecodeError> {
    BinaryComponent::decode(value).map(Item::BinaryComponent)
}

fn decode_keyword(value: Value) -> Result<Item, DecodeError> {
    Keyword::decode(value).map(Item::Keyword)
}

fn decode_publication(value: Value) -> Result<Item, DecodeError> {
    Publication::decode(value).map(Item::Publication)
}

fn decode_structure_group(value: Value) -> Result<Item, DecodeError> {
    StructureGroup::decode(value).map(Item::StructureGroup)
}

impl Decode for Item {
    const TARGET: &'static str = "Item";

    fn decode(value: Value) -> Result<Self, DecodeError> {
        dispatch(Self::TARGET, ITEM_VARIANTS, value)
    }
}

// ---------------------------------------------------------------------------
// Sitemap
// ---------------------------------------------------------------------------

type SitemapDecoder = fn(Value) -> Result<SitemapItem, DecodeError>;

const SITEMAP_VARIANTS: &[(&str, SitemapDecoder)] = &[
    ("TaxonomySitemapItem", decode_taxonomy_node),
    ("PageSitemapItem", decode_page_node),
];

fn decode_page_node(value: Value) -> Result<SitemapItem, DecodeError> {
    from_serde::<PageSitemapItem>("PageSitemapItem", value).map(SitemapItem::Page)
}

/// Decodes a taxonomy node and, recursively, its children.
///
/// An absent or `null` children field means the query did not descend this
/// far; an array, even an empty one, is the complete set of children.
fn decode_taxonomy_node(value: Value) -> Result<SitemapItem, DecodeError> {
    const TARGET: &str = "TaxonomySitemapItem";

    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(shape_mismatch(TARGET, &other, "an object")),
    };
    let children = match object.remove(CHILDREN_FIELD) {
        None | Some(Value::Null) => Children::NotFetched,
        Some(Value::Array(items)) => Children::Fetched(
            items
                .into_iter()
                .map(SitemapItem::decode)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(other) => return Err(shape_mismatch(TARGET, &other, "an array of children")),
    };
    let mut node: TaxonomySitemapItem = from_serde(TARGET, Value::Object(object))?;
    node.items = children;
    Ok(SitemapItem::Taxonomy(node))
}

impl Decode for SitemapItem {
    const TARGET: &'static str = "SitemapItem";

    fn decode(value: Value) -> Result<Self, DecodeError> {
        dispatch(Self::TARGET, SITEMAP_VARIANTS, value)
    }
}

impl Decode for TaxonomySitemapItem {
    const TARGET: &'static str = "TaxonomySitemapItem";

    /// Sitemap roots are always taxonomy nodes; a page node here is an
    /// unknown variant for this target.
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match SitemapItem::decode(value)? {
            SitemapItem::Taxonomy(node) => Ok(node),
            SitemapItem::Page(_) => Err(DecodeError::UnknownVariant {
                target: Self::TARGET,
                discriminator: "PageSitemapItem".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parses a raw response document.
pub fn parse_response(raw: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(raw).map_err(|source| DecodeError::Mapping {
        target: "GraphQL response",
        source,
    })
}

/// Decodes the node at `pointer` (RFC 6901, e.g. `/data/page`).
///
/// Returns `Ok(None)` when the node is absent or `null`; the service reports
/// "not found" that way.
pub fn decode_at<T: Decode>(document: &Value, pointer: &str) -> Result<Option<T>, DecodeError> {
    match document.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(node) => T::decode(node.clone()).map(Some),
    }
}

/// Messages of the GraphQL `errors` array, if the response carries one.
pub fn graphql_errors(document: &Value) -> Vec<String> {
    document
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|error| match error.get("message").and_then(Value::as_str) {
                    Some(message) => message.to_string(),
                    None => error.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
