//! Closed enumerations exchanged with the content service by name.
//!
//! Every type here serialises to the exact GraphQL enum value (or claim
//! value) the service expects, and parses back from it case-insensitively.

use serde::{Deserialize, Serialize};

use crate::UnknownValueError;

// ---------------------------------------------------------------------------
// Macro for enums that travel on the wire as a fixed string.
// Generates: enum, ALL, as_str(), Display, FromStr.
// ---------------------------------------------------------------------------
macro_rules! wire_enum {
    (
        $(#[$attr:meta])*
        $name:ident {
            $( $(#[$vattr:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vattr])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the value sent to the content service.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownValueError {
                        kind: stringify!($name),
                        value: s.to_owned(),
                    })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Request shaping
// ---------------------------------------------------------------------------

wire_enum! {
    /// How much of an item's raw content a query asks for.
    ///
    /// Controls the `includeContent` template region and the `renderContent`
    /// variable.
    #[derive(Default)]
    ContentIncludeMode {
        /// Omit raw content entirely.
        Exclude => "EXCLUDE",
        /// Include raw content without server-side rendering.
        #[default]
        Include => "INCLUDE",
        /// Include raw content and ask the server to render it.
        IncludeAndRender => "INCLUDE_AND_RENDER",
    }
}

impl ContentIncludeMode {
    /// Returns `true` if the `includeContent` region should be kept.
    pub fn includes_content(self) -> bool {
        !matches!(self, ContentIncludeMode::Exclude)
    }

    /// Returns the value bound to the `renderContent` variable.
    pub fn renders_content(self) -> bool {
        matches!(self, ContentIncludeMode::IncludeAndRender)
    }
}

wire_enum! {
    /// Item variants that can be requested from the generic item query.
    ///
    /// Each tag selects one `<PascalCase>Fields` fragment.
    FilterItemType {
        Page => "PAGE",
        Component => "COMPONENT",
        BinaryComponent => "BINARY_COMPONENT",
        Keyword => "KEYWORD",
        Publication => "PUBLICATION",
        StructureGroup => "STRUCTURE_GROUP",
    }
}

wire_enum! {
    /// Which ancestors a sitemap subtree query returns alongside the subtree.
    Ancestor {
        /// Return only the requested subtree.
        None => "NONE",
        /// Include the path from the root to the requested node.
        IncludePath => "INCLUDE_PATH",
        /// Include the path and the siblings of every node on it.
        IncludePathSiblings => "INCLUDE_PATH_SIBLINGS",
    }
}

wire_enum! {
    /// Sort direction for item queries.
    SortOrderType {
        Ascending => "Ascending",
        Descending => "Descending",
    }
}

wire_enum! {
    /// Field an item query is sorted by.
    SortFieldType {
        CreationDate => "CREATION_DATE",
        InitialPublishDate => "INITIAL_PUBLISH_DATE",
        LastPublishDate => "LAST_PUBLISH_DATE",
        Title => "TITLE",
        UpdatedDate => "UPDATED_DATE",
    }
}

// ---------------------------------------------------------------------------
// Claim values
// ---------------------------------------------------------------------------

wire_enum! {
    /// Value type tag carried by context claims.
    ClaimValueType {
        String => "STRING",
        Int => "INT",
        Float => "FLOAT",
        Boolean => "BOOLEAN",
        Date => "DATE",
    }
}

wire_enum! {
    /// Shape of the raw content returned by model-data operations.
    ContentType {
        /// Content as published, untouched.
        Raw => "RAW",
        /// Content converted to the requested data model.
        Model => "MODEL",
    }
}

wire_enum! {
    /// Data model the model service converts content into.
    DataModelType {
        R2 => "R2",
        Dd4t => "DD4T",
    }
}

wire_enum! {
    /// Whether page model data expands include pages (header, footer, …).
    PageInclusion {
        Include => "INCLUDE",
        Exclude => "EXCLUDE",
    }
}

wire_enum! {
    /// Which dynamic component presentation an entity model is built from.
    DcpType {
        Default => "DEFAULT",
        Highlighted => "HIGHLIGHTED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_item_type_serialises_to_graphql_enum_value() {
        let json = serde_json::to_value(FilterItemType::BinaryComponent).unwrap();
        assert_eq!(json, serde_json::json!("BINARY_COMPONENT"));
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("structure_group".parse(), Ok(FilterItemType::StructureGroup));
        assert_eq!("dd4t".parse(), Ok(DataModelType::Dd4t));
    }

    #[test]
    fn from_str_reports_enum_name() {
        let err = "PDF".parse::<ContentType>().unwrap_err();
        assert_eq!(err.kind, "ContentType");
        assert_eq!(err.value, "PDF");
    }

    #[test]
    fn content_include_mode_flags() {
        assert!(!ContentIncludeMode::Exclude.includes_content());
        assert!(ContentIncludeMode::Include.includes_content());
        assert!(!ContentIncludeMode::Include.renders_content());
        assert!(ContentIncludeMode::IncludeAndRender.renders_content());
    }
}
