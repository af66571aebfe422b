//! The assembled GraphQL request.

use std::time::Duration;

use model::Claim;
use serde::Serialize;
use serde_json::{Map, Value};

/// One fully assembled query, ready for a [`crate::GraphqlTransport`].
///
/// Produced only by [`crate::RequestBuilder::build`] and immutable afterwards.
/// Serialises to the GraphQL-over-HTTP body (`query`, `variables`,
/// `operationName`); claims and timeout travel out of band and are not part
/// of the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    #[serde(skip)]
    pub(crate) query_name: String,
    pub(crate) query: String,
    pub(crate) variables: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) operation_name: Option<String>,
    #[serde(skip)]
    pub(crate) custom_meta_filter: Option<String>,
    #[serde(skip)]
    pub(crate) fragments: Vec<String>,
    #[serde(skip)]
    pub(crate) claims: Vec<Claim>,
    #[serde(skip)]
    pub(crate) timeout: Option<Duration>,
}

impl GraphqlRequest {
    /// Name of the query template this request was built from.
    pub fn query_name(&self) -> &str {
        &self.query_name
    }

    /// The final query document (template plus fragment definitions).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Bound variables. Variables whose value was absent are not present.
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// Looks up a single variable.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    /// The custom meta filter, also bound as the `customMetaFilter` variable.
    pub fn custom_meta_filter(&self) -> Option<&str> {
        self.custom_meta_filter.as_deref()
    }

    /// Fragment names injected at the template's insertion point, in order.
    pub fn injected_fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Out-of-band claims, in the order they were added.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Timeout the transport should honour for this request.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl std::fmt::Display for GraphqlRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query_name)?;
        if !self.variables.is_empty() {
            let keys: Vec<&str> = self.variables.keys().map(String::as_str).collect();
            write!(f, " ({})", keys.join(", "))?;
        }
        Ok(())
    }
}
