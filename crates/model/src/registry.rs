//! Closed numeric registries: content namespaces and item types.
//!
//! Both registries appear inside compact content identifiers and travel on the
//! wire as plain integers, so they serialise through their numeric value
//! rather than their variant name.

use serde::{Deserialize, Serialize};

use crate::{UnknownValueError, UriError};

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// A content namespace served by the content-delivery service.
///
/// Each namespace has a URI token used inside content identifiers
/// (`tcm:…`, `ish:…`) and a numeric id used as the `namespaceId` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ContentNamespace {
    /// Web sites content (`tcm`, id 1).
    Sites,
    /// Documentation content (`ish`, id 2).
    Docs,
}

impl ContentNamespace {
    /// All registered namespaces.
    pub const ALL: &'static [ContentNamespace] = &[ContentNamespace::Sites, ContentNamespace::Docs];

    /// Returns the numeric namespace id.
    pub fn id(self) -> u8 {
        match self {
            ContentNamespace::Sites => 1,
            ContentNamespace::Docs => 2,
        }
    }

    /// Returns the token used in compact content identifiers.
    pub fn uri_token(self) -> &'static str {
        match self {
            ContentNamespace::Sites => "tcm",
            ContentNamespace::Docs => "ish",
        }
    }

    /// Returns the human-readable namespace name (`"sites"` or `"docs"`).
    pub fn name(self) -> &'static str {
        match self {
            ContentNamespace::Sites => "sites",
            ContentNamespace::Docs => "docs",
        }
    }

    /// Resolves a content identifier token. Matching is case-sensitive.
    pub fn from_uri_token(token: &str) -> Result<Self, UriError> {
        Self::ALL
            .iter()
            .copied()
            .find(|ns| ns.uri_token() == token)
            .ok_or_else(|| UriError::UnknownNamespace {
                token: token.to_owned(),
            })
    }

    /// Resolves a numeric namespace id.
    pub fn from_id(id: u8) -> Result<Self, UriError> {
        Self::ALL
            .iter()
            .copied()
            .find(|ns| ns.id() == id)
            .ok_or_else(|| UriError::UnknownNamespace {
                token: id.to_string(),
            })
    }
}

impl From<ContentNamespace> for u8 {
    fn from(ns: ContentNamespace) -> Self {
        ns.id()
    }
}

impl TryFrom<u8> for ContentNamespace {
    type Error = UriError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl std::fmt::Display for ContentNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ContentNamespace {
    type Err = UnknownValueError;

    /// Accepts either the namespace name (`sites`, `docs`) or its URI token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|ns| ns.name().eq_ignore_ascii_case(s) || ns.uri_token() == s)
            .ok_or_else(|| UnknownValueError {
                kind: "ContentNamespace",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Item types
// ---------------------------------------------------------------------------

/// Content Manager item type codes, as used in the optional third component
/// of a content identifier and in the `itemType` field of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum ItemType {
    Publication,
    Folder,
    StructureGroup,
    Schema,
    /// The default when a content identifier omits the item type.
    #[default]
    Component,
    ComponentTemplate,
    Page,
    PageTemplate,
    TargetGroup,
    Category,
    Keyword,
    TemplateBuildingBlock,
    BusinessProcessType,
    VirtualFolder,
}

impl ItemType {
    /// Every registered item type, in ascending code order.
    pub const ALL: &'static [ItemType] = &[
        ItemType::Publication,
        ItemType::Folder,
        ItemType::StructureGroup,
        ItemType::Schema,
        ItemType::Component,
        ItemType::ComponentTemplate,
        ItemType::Page,
        ItemType::PageTemplate,
        ItemType::TargetGroup,
        ItemType::Category,
        ItemType::Keyword,
        ItemType::TemplateBuildingBlock,
        ItemType::BusinessProcessType,
        ItemType::VirtualFolder,
    ];

    /// Returns the numeric item type code.
    pub fn code(self) -> u32 {
        match self {
            ItemType::Publication => 1,
            ItemType::Folder => 2,
            ItemType::StructureGroup => 4,
            ItemType::Schema => 8,
            ItemType::Component => 16,
            ItemType::ComponentTemplate => 32,
            ItemType::Page => 64,
            ItemType::PageTemplate => 128,
            ItemType::TargetGroup => 256,
            ItemType::Category => 512,
            ItemType::Keyword => 1024,
            ItemType::TemplateBuildingBlock => 2048,
            ItemType::BusinessProcessType => 4096,
            ItemType::VirtualFolder => 8192,
        }
    }

    /// Resolves a numeric code against the registry.
    pub fn from_code(code: u32) -> Result<Self, UriError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(UriError::UnknownItemType { code })
    }
}

impl From<ItemType> for u32 {
    fn from(t: ItemType) -> Self {
        t.code()
    }
}

impl TryFrom<u32> for ItemType {
    type Error = UriError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_resolve_by_token_and_id() {
        assert_eq!(ContentNamespace::from_uri_token("tcm"), Ok(ContentNamespace::Sites));
        assert_eq!(ContentNamespace::from_uri_token("ish"), Ok(ContentNamespace::Docs));
        assert_eq!(ContentNamespace::from_id(2), Ok(ContentNamespace::Docs));
    }

    #[test]
    fn namespace_token_is_case_sensitive() {
        assert!(matches!(
            ContentNamespace::from_uri_token("TCM"),
            Err(UriError::UnknownNamespace { .. })
        ));
    }

    #[test]
    fn namespace_serialises_as_numeric_id() {
        assert_eq!(serde_json::to_value(ContentNamespace::Sites).unwrap(), serde_json::json!(1));
        let ns: ContentNamespace = serde_json::from_value(serde_json::json!(2)).unwrap();
        assert_eq!(ns, ContentNamespace::Docs);
    }

    #[test]
    fn namespace_from_str_accepts_name_and_token() {
        assert_eq!("sites".parse::<ContentNamespace>(), Ok(ContentNamespace::Sites));
        assert_eq!("ish".parse::<ContentNamespace>(), Ok(ContentNamespace::Docs));
        assert!("web".parse::<ContentNamespace>().is_err());
    }

    #[test]
    fn item_type_codes_round_trip() {
        for t in ItemType::ALL {
            assert_eq!(ItemType::from_code(t.code()), Ok(*t));
        }
    }

    #[test]
    fn unknown_item_type_code_is_rejected() {
        assert_eq!(ItemType::from_code(3), Err(UriError::UnknownItemType { code: 3 }));
        assert!(serde_json::from_value::<ItemType>(serde_json::json!(0)).is_err());
    }

    #[test]
    fn default_item_type_is_component() {
        assert_eq!(ItemType::default(), ItemType::Component);
        assert_eq!(ItemType::default().code(), 16);
    }
}
