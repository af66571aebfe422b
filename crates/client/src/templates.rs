//! Named query and fragment documents.
//!
//! Query templates are complete GraphQL operations that may contain builder
//! directives (`@fragmentList`, `#if` regions, recursion points). Fragment
//! templates are either `fragment X on Y { ... }` definitions, appended to a
//! query when it spreads them, or raw snippets used as recursion bodies.

use std::collections::HashMap;

macro_rules! template_table {
    ($dir:literal: $($name:literal),+ $(,)?) => {
        &[$(($name, include_str!(concat!("../", $dir, "/", $name, ".graphql")))),+]
    };
}

const BUILTIN_QUERIES: &[(&str, &str)] = template_table!("queries":
    "Publication",
    "Publications",
    "PublicationMapping",
    "PageById",
    "PageByUrl",
    "PageByCmUri",
    "Pages",
    "BinaryComponentById",
    "BinaryComponentByUrl",
    "BinaryComponentByCmUri",
    "ItemQuery",
    "ResolvePageLink",
    "ResolveComponentLink",
    "ResolveBinaryLink",
    "ResolveDynamicComponentLink",
    "PageModelById",
    "PageModelByUrl",
    "EntityModelById",
    "Sitemap",
    "SitemapSubtree",
);

const BUILTIN_FRAGMENTS: &[(&str, &str)] = template_table!("fragments":
    "ItemFields",
    "CustomMetaFields",
    "PageFields",
    "ComponentFields",
    "BinaryComponentFields",
    "KeywordFields",
    "PublicationFields",
    "StructureGroupFields",
    "SitemapItemFields",
    "TaxonomySitemapItemFields",
    "RecurseItems",
);

/// Store of query and fragment templates, looked up by name.
///
/// Immutable once handed to a [`crate::PublicContentApi`]; safe to share
/// between concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct QueryTemplates {
    queries: HashMap<String, String>,
    fragments: HashMap<String, String>,
}

impl QueryTemplates {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The templates shipped with this crate: one query per facade
    /// operation plus every fragment those queries use.
    pub fn builtin() -> Self {
        let mut templates = Self::new();
        for (name, text) in BUILTIN_QUERIES {
            templates.queries.insert((*name).to_string(), (*text).to_string());
        }
        for (name, text) in BUILTIN_FRAGMENTS {
            templates
                .fragments
                .insert((*name).to_string(), (*text).to_string());
        }
        templates
    }

    /// Adds or replaces a query template.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.queries.insert(name.into(), text.into());
        self
    }

    /// Adds or replaces a fragment template.
    #[must_use]
    pub fn with_fragment(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fragments.insert(name.into(), text.into());
        self
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.queries.get(name).map(String::as_str)
    }

    pub fn fragment(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    /// Names of all query templates, sorted.
    pub fn query_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.queries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
