//! Query inputs: item and publication filters, sort parameters.
//!
//! These serialise directly into GraphQL input objects. Unset fields are
//! skipped so the server applies its own defaults.

use serde::{Deserialize, Serialize};

use crate::{ContentNamespace, FilterItemType, SortFieldType, SortOrderType};

/// Custom metadata criterion (`key` must equal `value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCustomMetaCriteria {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl InputCustomMetaCriteria {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            scope: None,
        }
    }
}

/// Filter for the generic item query.
///
/// `item_types` also decides which item fragments the query requests: only
/// the listed variants are fetched and decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputItemFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_types: Option<Vec<FilterItemType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_ids: Option<Vec<ContentNamespace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_ids: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_ids: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<InputCustomMetaCriteria>,
    /// All nested filters must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<InputItemFilter>>,
    /// At least one nested filter must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<InputItemFilter>>,
}

impl InputItemFilter {
    /// Filter restricted to the given item variants.
    pub fn for_item_types(item_types: impl IntoIterator<Item = FilterItemType>) -> Self {
        Self {
            item_types: Some(item_types.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: ContentNamespace) -> Self {
        self.namespace_ids.get_or_insert_with(Vec::new).push(namespace);
        self
    }

    #[must_use]
    pub fn with_publication_id(mut self, publication_id: u32) -> Self {
        self.publication_ids
            .get_or_insert_with(Vec::new)
            .push(publication_id);
        self
    }

    #[must_use]
    pub fn with_custom_meta(mut self, criteria: InputCustomMetaCriteria) -> Self {
        self.custom_meta = Some(criteria);
        self
    }

    /// Requested item variants; empty when the filter does not restrict them.
    pub fn item_types(&self) -> &[FilterItemType] {
        self.item_types.as_deref().unwrap_or(&[])
    }
}

/// Filter for the publication listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPublicationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<InputCustomMetaCriteria>,
}

/// Sort order for item queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSortParam {
    pub order: SortOrderType,
    pub sort_by: SortFieldType,
}
