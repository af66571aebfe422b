//! Taxonomy sitemap trees.
//!
//! A sitemap is a tree of [`SitemapItem`]s. Taxonomy nodes carry children;
//! page nodes are always leaves. How deep the tree goes is decided when the
//! query is built, so a taxonomy node distinguishes "children were not
//! fetched" ([`Children::NotFetched`]) from "fetched, and there are none"
//! (`Children::Fetched(vec![])`).

use serde::{Deserialize, Serialize, Serializer};

use crate::Timestamp;

/// Fields shared by every sitemap node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapCommon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Kind of node as reported by the service (e.g. `StructureGroup`, `Page`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Child nodes of a taxonomy node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Children {
    /// The query did not descend this far; the node may still have children.
    #[default]
    NotFetched,
    /// The children as returned; empty means the node is a leaf.
    Fetched(Vec<SitemapItem>),
}

impl Children {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Children::Fetched(_))
    }

    /// Returns the fetched children, or an empty slice when not fetched.
    pub fn as_slice(&self) -> &[SitemapItem] {
        match self {
            Children::NotFetched => &[],
            Children::Fetched(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Children::NotFetched => serializer.serialize_none(),
            Children::Fetched(items) => serializer.collect_seq(items),
        }
    }
}

/// A taxonomy (structure) node.
///
/// `items` is not read by serde: the decoder fills it in so that each child
/// goes through the same discriminator dispatch as the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomySitemapItem {
    #[serde(flatten)]
    pub common: SitemapCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_child_nodes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classified_items_count: Option<u32>,
    #[serde(skip_deserializing, skip_serializing_if = "is_not_fetched")]
    pub items: Children,
}

fn is_not_fetched(children: &Children) -> bool {
    !children.is_fetched()
}

/// A page node; always a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSitemapItem {
    #[serde(flatten)]
    pub common: SitemapCommon,
}

/// Any node of a sitemap tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__typename")]
pub enum SitemapItem {
    #[serde(rename = "TaxonomySitemapItem")]
    Taxonomy(TaxonomySitemapItem),
    #[serde(rename = "PageSitemapItem")]
    Page(PageSitemapItem),
}

impl SitemapItem {
    pub fn common(&self) -> &SitemapCommon {
        match self {
            SitemapItem::Taxonomy(node) => &node.common,
            SitemapItem::Page(node) => &node.common,
        }
    }

    /// Returns the children of a taxonomy node; page nodes have none.
    pub fn children(&self) -> &[SitemapItem] {
        match self {
            SitemapItem::Taxonomy(node) => node.items.as_slice(),
            SitemapItem::Page(_) => &[],
        }
    }

    /// Depth of the fetched tree below and including this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(SitemapItem::depth)
            .max()
            .unwrap_or(0)
    }
}
