//! The item hierarchy.
//!
//! [`Item`] is a closed set of variants sharing [`ItemCommon`]. The concrete
//! variant of a JSON node is only known once its `__typename` discriminator
//! has been read; the decoder in the `client` crate owns that dispatch. The
//! variant structs themselves deserialise with plain serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Connection, ContentNamespace, ItemType, Timestamp};

/// Name of the JSON field carrying the concrete GraphQL type of a node.
pub const TYPENAME_FIELD: &str = "__typename";

// ---------------------------------------------------------------------------
// Shared fields
// ---------------------------------------------------------------------------

/// Fields every item variant carries. All are optional because a query only
/// returns what its fragments select.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCommon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owning_publication_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<ContentNamespace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_publish_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_publish_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metas: Option<Connection<CustomMeta>>,
}

/// One custom metadata key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMeta {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    /// `STRING`, `DATE` or `FLOAT`.
    #[serde(default)]
    pub value_type: Option<String>,
}

/// Raw (unmapped) content of a page or component presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    /// Structured content; its shape is defined by the data model requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Textual content, when the server renders it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<RawContent>,
    /// Regions and component presentations; kept as returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_items: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<RawContent>,
}

/// A multimedia component and its published binary variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryComponent {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Connection<BinaryVariant>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// MIME type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multimedia_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multimedia_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureGroup {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// Any item returned by a polymorphic query.
///
/// Serialises with its `__typename` tag so the output can be fed back to the
/// decoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__typename")]
pub enum Item {
    Page(Page),
    Component(Component),
    BinaryComponent(BinaryComponent),
    Keyword(Keyword),
    Publication(Publication),
    StructureGroup(StructureGroup),
}

impl Item {
    /// Returns the fields shared by every variant.
    pub fn common(&self) -> &ItemCommon {
        match self {
            Item::Page(v) => &v.common,
            Item::Component(v) => &v.common,
            Item::BinaryComponent(v) => &v.common,
            Item::Keyword(v) => &v.common,
            Item::Publication(v) => &v.common,
            Item::StructureGroup(v) => &v.common,
        }
    }

    /// Returns the GraphQL type name of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Item::Page(_) => "Page",
            Item::Component(_) => "Component",
            Item::BinaryComponent(_) => "BinaryComponent",
            Item::Keyword(_) => "Keyword",
            Item::Publication(_) => "Publication",
            Item::StructureGroup(_) => "StructureGroup",
        }
    }
}

// ---------------------------------------------------------------------------
// Publication mapping
// ---------------------------------------------------------------------------

/// The publication serving a site URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationMapping {
    pub publication_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<ContentNamespace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_url: Option<String>,
}
