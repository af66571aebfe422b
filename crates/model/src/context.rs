//! Context data and claims.
//!
//! Both describe the caller's situation to the content service, but they
//! travel differently:
//!
//! - [`ContextData`] is sent as the `contextData` GraphQL variable.
//! - [`Claim`]s ride out of band (as transport headers) and are never merged
//!   into the variable set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::{ClaimValueType, ContentType, DataModelType, DcpType, PageInclusion};

// ---------------------------------------------------------------------------
// Claim values and context data
// ---------------------------------------------------------------------------

/// One context claim: a URI-keyed typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimValue {
    /// Claim URI, e.g. `taf:language`.
    pub uri: String,
    /// Textual value.
    pub value: String,
    /// Declared type of `value`.
    #[serde(rename = "type")]
    pub value_type: ClaimValueType,
}

impl ClaimValue {
    /// Creates a claim value of type [`ClaimValueType::String`].
    pub fn string(uri: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            value: value.into(),
            value_type: ClaimValueType::String,
        }
    }
}

/// A set of context claims keyed by claim URI.
///
/// Serialises as the array of claim values the `contextData` variable
/// expects, ordered by URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextData {
    claims: BTreeMap<String, ClaimValue>,
}

impl ContextData {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a claim, keyed by its URI.
    #[must_use]
    pub fn with_claim(mut self, claim: ClaimValue) -> Self {
        self.insert(claim);
        self
    }

    /// Adds (or replaces) a claim, keyed by its URI.
    pub fn insert(&mut self, claim: ClaimValue) {
        self.claims.insert(claim.uri.clone(), claim);
    }

    /// Looks up a claim by URI.
    pub fn get(&self, uri: &str) -> Option<&ClaimValue> {
        self.claims.get(uri)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterates the claims in URI order.
    pub fn iter(&self) -> impl Iterator<Item = &ClaimValue> {
        self.claims.values()
    }

    /// Merges a process-wide default context with a per-call override.
    ///
    /// Claims from `overrides` win when both contain the same URI.
    pub fn merge(defaults: &ContextData, overrides: &ContextData) -> ContextData {
        let mut claims = defaults.claims.clone();
        claims.extend(
            overrides
                .claims
                .iter()
                .map(|(uri, claim)| (uri.clone(), claim.clone())),
        );
        ContextData { claims }
    }
}

impl FromIterator<ClaimValue> for ContextData {
    fn from_iter<I: IntoIterator<Item = ClaimValue>>(iter: I) -> Self {
        let mut context = ContextData::new();
        for claim in iter {
            context.insert(claim);
        }
        context
    }
}

impl Serialize for ContextData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.claims.values())
    }
}

impl<'de> Deserialize<'de> for ContextData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let claims = Vec::<ClaimValue>::deserialize(deserializer)?;
        Ok(claims.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Out-of-band claims
// ---------------------------------------------------------------------------

/// Claim URIs understood by the model service.
pub mod claim_uris {
    pub const CONTENT_TYPE: &str = "taf:modelservice:content:type";
    pub const MODEL_TYPE: &str = "taf:modelservice:model:type";
    pub const PAGE_INCLUDE_REGIONS: &str = "taf:modelservice:page:include:regions";
    pub const ENTITY_DCP_TYPE: &str = "taf:modelservice:entity:dcp:type";
}

/// A typed hint for the model service, attached to a request outside its
/// GraphQL variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Claim {
    ContentType(ContentType),
    ModelType(DataModelType),
    PageInclusion(PageInclusion),
    DcpType(DcpType),
}

impl Claim {
    /// Returns the claim URI this claim is sent under.
    pub fn uri(self) -> &'static str {
        match self {
            Claim::ContentType(_) => claim_uris::CONTENT_TYPE,
            Claim::ModelType(_) => claim_uris::MODEL_TYPE,
            Claim::PageInclusion(_) => claim_uris::PAGE_INCLUDE_REGIONS,
            Claim::DcpType(_) => claim_uris::ENTITY_DCP_TYPE,
        }
    }

    /// Returns the claim value as sent to the service.
    pub fn value(self) -> &'static str {
        match self {
            Claim::ContentType(v) => v.as_str(),
            Claim::ModelType(v) => v.as_str(),
            Claim::PageInclusion(v) => v.as_str(),
            Claim::DcpType(v) => v.as_str(),
        }
    }

    /// Converts the claim into its generic claim value form.
    pub fn to_claim_value(self) -> ClaimValue {
        ClaimValue::string(self.uri(), self.value())
    }
}

impl From<ContentType> for Claim {
    fn from(v: ContentType) -> Self {
        Claim::ContentType(v)
    }
}

impl From<DataModelType> for Claim {
    fn from(v: DataModelType) -> Self {
        Claim::ModelType(v)
    }
}

impl From<PageInclusion> for Claim {
    fn from(v: PageInclusion) -> Self {
        Claim::PageInclusion(v)
    }
}

impl From<DcpType> for Claim {
    fn from(v: DcpType) -> Self {
        Claim::DcpType(v)
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.uri(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_override_wins_on_collision() {
        let defaults = ContextData::new()
            .with_claim(ClaimValue::string("taf:language", "en"))
            .with_claim(ClaimValue::string("taf:device", "desktop"));
        let overrides = ContextData::new().with_claim(ClaimValue::string("taf:language", "nl"));

        let merged = ContextData::merge(&defaults, &overrides);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("taf:language").unwrap().value, "nl");
        assert_eq!(merged.get("taf:device").unwrap().value, "desktop");
        // inputs untouched
        assert_eq!(defaults.get("taf:language").unwrap().value, "en");
    }

    #[test]
    fn serialises_as_claim_array() {
        let context = ContextData::new().with_claim(ClaimValue::string("taf:language", "en"));
        assert_eq!(
            serde_json::to_value(&context).unwrap(),
            json!([{ "uri": "taf:language", "value": "en", "type": "STRING" }])
        );
    }

    #[test]
    fn claim_from_enum() {
        let claim = Claim::from(DataModelType::R2);
        assert_eq!(claim.uri(), claim_uris::MODEL_TYPE);
        assert_eq!(claim.value(), "R2");
        assert_eq!(claim.to_string(), "taf:modelservice:model:type=R2");
        assert_eq!(claim.to_claim_value().value_type, ClaimValueType::String);
    }
}
