//! Compact content identifiers.
//!
//! A [`ContentUri`] addresses one item in the content-delivery service:
//!
//! ```text
//! tcm:5-1234-64-v3
//! └┬┘ │ └┬─┘ └┤ └┤
//!  │  │  │    │  └ version (optional)
//!  │  │  │    └─── item type code (optional, defaults to Component = 16)
//!  │  │  └──────── item id
//!  │  └─────────── publication id
//!  └────────────── namespace token
//! ```
//!
//! Formatting is canonical: the Component item type is implied and therefore
//! never written, and the version suffix only appears when a version is
//! present. `parse(format(u)) == u` holds for every value.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{ContentNamespace, ItemType, UriError};

static CONTENT_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<namespace>[a-zA-Z]+):(?P<publication>[0-9]+)-(?P<item>[0-9]+)(?:-(?P<item_type>[0-9]+))?(?:-v(?P<version>[0-9]+))?$",
    )
    .expect("invalid content URI regex")
});

/// An immutable, parsed content identifier.
///
/// Equality is structural over namespace, publication id, item id, item type
/// and version. An omitted item type is stored as [`ItemType::Component`], so
/// `tcm:1-2` equals `tcm:1-2-16`. An omitted version stays `None` and is never
/// equal to an explicit `-v0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContentUri {
    namespace: ContentNamespace,
    publication_id: u32,
    item_id: u32,
    item_type: ItemType,
    version: Option<u32>,
}

impl ContentUri {
    /// Creates an unversioned identifier from its parts.
    pub fn new(
        namespace: ContentNamespace,
        publication_id: u32,
        item_id: u32,
        item_type: ItemType,
    ) -> Self {
        Self {
            namespace,
            publication_id,
            item_id,
            item_type,
            version: None,
        }
    }

    /// Returns a copy of this identifier pinned to `version`.
    #[must_use]
    pub fn with_version(self, version: u32) -> Self {
        Self {
            version: Some(version),
            ..self
        }
    }

    /// Parses `namespace:pubId-itemId[-itemType][-vVersion]`.
    ///
    /// # Errors
    ///
    /// - [`UriError::Parse`] if the text does not match the grammar or a number
    ///   overflows 32 bits.
    /// - [`UriError::UnknownNamespace`] if the namespace token is not registered.
    /// - [`UriError::UnknownItemType`] if the item type code is not registered.
    pub fn parse(text: &str) -> Result<Self, UriError> {
        let parse_error = || UriError::Parse {
            input: text.to_owned(),
        };
        let caps = CONTENT_URI_RE.captures(text).ok_or_else(parse_error)?;
        let number = |name: &str| -> Result<Option<u32>, UriError> {
            caps.name(name)
                .map(|m| m.as_str().parse::<u32>().map_err(|_| parse_error()))
                .transpose()
        };

        let namespace = ContentNamespace::from_uri_token(&caps["namespace"])?;
        let publication_id = number("publication")?.ok_or_else(parse_error)?;
        let item_id = number("item")?.ok_or_else(parse_error)?;
        let item_type = match number("item_type")? {
            Some(code) => ItemType::from_code(code)?,
            None => ItemType::default(),
        };
        let version = number("version")?;

        Ok(Self {
            namespace,
            publication_id,
            item_id,
            item_type,
            version,
        })
    }

    pub fn namespace(&self) -> ContentNamespace {
        self.namespace
    }

    /// Numeric id of the namespace, as bound to the `namespaceId` variable.
    pub fn namespace_id(&self) -> u8 {
        self.namespace.id()
    }

    pub fn publication_id(&self) -> u32 {
        self.publication_id
    }

    pub fn item_id(&self) -> u32 {
        self.item_id
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Returns the version, or `None` when the identifier is unversioned.
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Compares against raw identifier text.
    ///
    /// Text that fails to parse is never equal to any identifier; the failure
    /// is logged at debug level and otherwise swallowed.
    pub fn matches_str(&self, text: &str) -> bool {
        match Self::parse(text) {
            Ok(other) => *self == other,
            Err(error) => {
                tracing::debug!(uri = %self, input = text, %error, "unparsable content URI treated as unequal");
                false
            }
        }
    }
}

impl std::fmt::Display for ContentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}",
            self.namespace.uri_token(),
            self.publication_id,
            self.item_id
        )?;
        if self.item_type != ItemType::default() {
            write!(f, "-{}", self.item_type.code())?;
        }
        if let Some(version) = self.version {
            write!(f, "-v{version}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ContentUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ContentUri> for String {
    fn from(uri: ContentUri) -> Self {
        uri.to_string()
    }
}

impl TryFrom<String> for ContentUri {
    type Error = UriError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl PartialEq<str> for ContentUri {
    fn eq(&self, other: &str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<&str> for ContentUri {
    fn eq(&self, other: &&str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<String> for ContentUri {
    fn eq(&self, other: &String) -> bool {
        self.matches_str(other)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
