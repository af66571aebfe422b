//! Request assembly.
//!
//! A [`RequestBuilder`] accumulates configuration through consuming `with_*`
//! calls and produces one [`GraphqlRequest`] from [`RequestBuilder::build`].
//! Assembly runs in a fixed order:
//!
//! 1. The query template is looked up by name.
//! 2. Injected fragments replace the `@fragmentList` insertion point.
//! 3. `#if <region>` / `#endif` regions are kept or dropped.
//! 4. The recursion point (`...<name>`) is expanded to the configured depth.
//! 5. Every fragment spread in the result gets its definition appended,
//!    transitively, once each, in first-reference order.
//! 6. Variable declarations the assembled document never references are
//!    dropped together with their bindings.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::LazyLock;
use std::time::Duration;

use model::{Claim, ContentIncludeMode, ContextData, FilterItemType, Pagination};
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::BuildError;
use crate::request::GraphqlRequest;
use crate::templates::QueryTemplates;

/// Fragment insertion point inside a query template.
pub const FRAGMENT_LIST_MARKER: &str = "@fragmentList";

/// Suffix appended to a PascalCase item type to name its fragment.
pub const FRAGMENT_SUFFIX: &str = "Fields";

/// Region toggled by [`RequestBuilder::with_content_include_mode`].
pub const INCLUDE_CONTENT_REGION: &str = "includeContent";

/// Region that expands a page's container items in item queries.
pub const INCLUDE_CONTAINER_ITEMS_REGION: &str = "includeContainerItems";

const REGION_START: &str = "#if ";
const REGION_END: &str = "#endif";

static FRAGMENT_SPREAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\.\.\s*([A-Za-z_][A-Za-z0-9_]*)").expect("fragment spread regex is valid")
});

static VARIABLE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\s*:[^,$)\n]*,?")
        .expect("variable declaration regex is valid")
});

static VARIABLE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("variable reference regex is valid")
});

/// Derives the fragment names needed to decode the given item types.
///
/// `STRUCTURE_GROUP` becomes `StructureGroupFields`. Order follows the input;
/// repeated tags produce one fragment.
pub fn fragments_for_item_types(item_types: &[FilterItemType]) -> Vec<String> {
    let mut fragments: Vec<String> = Vec::with_capacity(item_types.len());
    for item_type in item_types {
        let name = format!("{}{FRAGMENT_SUFFIX}", pascal_case(item_type.as_str()));
        if !fragments.contains(&name) {
            fragments.push(name);
        }
    }
    fragments
}

fn pascal_case(tag: &str) -> String {
    tag.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Accumulates the configuration of one request.
///
/// Every `with_*` call consumes and returns the builder, so a builder can only
/// ever produce one request and never shares state with another.
#[derive(Debug)]
#[must_use]
pub struct RequestBuilder<'t> {
    templates: &'t QueryTemplates,
    query_name: Option<String>,
    operation_name: Option<String>,
    fragments: Vec<String>,
    variables: Map<String, Value>,
    regions: BTreeMap<String, bool>,
    recursion: Option<(String, u32)>,
    custom_meta_filter: Option<String>,
    context: ContextData,
    claims: Vec<Claim>,
    timeout: Option<Duration>,
    deferred_error: Option<BuildError>,
}

impl<'t> RequestBuilder<'t> {
    pub fn new(templates: &'t QueryTemplates) -> Self {
        Self {
            templates,
            query_name: None,
            operation_name: None,
            fragments: Vec::new(),
            variables: Map::new(),
            regions: BTreeMap::new(),
            recursion: None,
            custom_meta_filter: None,
            context: ContextData::default(),
            claims: Vec::new(),
            timeout: None,
            deferred_error: None,
        }
    }

    /// Selects the query template.
    pub fn with_query_name(mut self, name: impl Into<String>) -> Self {
        self.query_name = Some(name.into());
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Adds a fragment spread at the template's `@fragmentList` point.
    pub fn with_injected_fragment(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.fragments.contains(&name) {
            self.fragments.push(name);
        }
        self
    }

    pub fn with_injected_fragments<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |builder, name| builder.with_injected_fragment(name))
    }

    /// Injects one fragment per requested item type.
    pub fn with_fragments_for_item_types(self, item_types: &[FilterItemType]) -> Self {
        self.with_injected_fragments(fragments_for_item_types(item_types))
    }

    /// Binds a variable. A value that serialises to `null` (such as `None`)
    /// is not sent at all.
    pub fn with_variable<T: Serialize>(mut self, name: impl Into<String>, value: T) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(Value::Null) => {
                self.variables.remove(&name);
            }
            Ok(value) => {
                self.variables.insert(name, value);
            }
            Err(source) => {
                if self.deferred_error.is_none() {
                    self.deferred_error = Some(BuildError::InvalidVariable { name, source });
                }
            }
        }
        self
    }

    /// Binds `first` and `after`; each is omitted when absent.
    pub fn with_pagination(self, pagination: &Pagination) -> Self {
        self.with_variable("first", pagination.first)
            .with_variable("after", pagination.after.as_deref())
    }

    /// Passes a custom meta filter through verbatim as `customMetaFilter`.
    pub fn with_custom_meta_filter(mut self, filter: Option<&str>) -> Self {
        self.custom_meta_filter = filter.map(str::to_string);
        self.with_variable("customMetaFilter", filter)
    }

    /// Keeps or drops the `includeContent` region and binds `renderContent`
    /// when content is included.
    pub fn with_content_include_mode(mut self, mode: ContentIncludeMode) -> Self {
        if mode.includes_content() {
            self = self.with_variable("renderContent", mode.renders_content());
        } else {
            self.variables.remove("renderContent");
        }
        self.with_region(INCLUDE_CONTENT_REGION, mode.includes_content())
    }

    /// Turns a `#if <name>` region on or off. Unset regions are off.
    pub fn with_region(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.regions.insert(name.into(), enabled);
        self
    }

    /// Expands `...<name>` into `depth` nested copies of fragment `name`.
    /// At depth 0 the recursion point is removed.
    pub fn with_recursive_fragment(mut self, name: impl Into<String>, depth: u32) -> Self {
        self.recursion = Some((name.into(), depth));
        self
    }

    /// Merges the default context with a per-call override; override claims
    /// win. The result is sent as `contextData` unless empty.
    pub fn with_context_data(mut self, defaults: &ContextData, overrides: Option<&ContextData>) -> Self {
        self.context = match overrides {
            Some(overrides) => ContextData::merge(defaults, overrides),
            None => defaults.clone(),
        };
        self
    }

    /// Appends an out-of-band claim.
    pub fn with_claim(mut self, claim: impl Into<Claim>) -> Self {
        self.claims.push(claim.into());
        self
    }

    pub fn with_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Assembles the request.
    pub fn build(self) -> Result<GraphqlRequest, BuildError> {
        let Self {
            templates,
            query_name,
            operation_name,
            fragments,
            mut variables,
            regions,
            recursion,
            custom_meta_filter,
            context,
            claims,
            timeout,
            deferred_error,
        } = self;

        if let Some(err) = deferred_error {
            return Err(err);
        }
        let query_name = query_name.ok_or(BuildError::MissingQueryName)?;
        let template = templates
            .query(&query_name)
            .ok_or_else(|| BuildError::UnknownQuery {
                name: query_name.clone(),
            })?;

        let query = inject_fragments(&query_name, template, &fragments)?;
        let query = apply_regions(&query_name, &query, &regions)?;
        let query = match &recursion {
            Some((name, depth)) => expand_recursion(templates, &query, name, *depth, &regions)?,
            None => query,
        };
        let query = append_fragment_definitions(templates, query, &regions)?;
        let query = drop_unused_variables(query, &mut variables);

        if !context.is_empty() {
            let value = serde_json::to_value(&context).map_err(|source| {
                BuildError::InvalidVariable {
                    name: "contextData".to_string(),
                    source,
                }
            })?;
            variables.insert("contextData".to_string(), value);
        }

        debug!(
            query = %query_name,
            variables = ?variables.keys().collect::<Vec<_>>(),
            fragments = ?fragments,
            claims = claims.len(),
            "Built GraphQL request"
        );

        Ok(GraphqlRequest {
            query_name,
            query,
            variables,
            operation_name,
            custom_meta_filter,
            fragments,
            claims,
            timeout,
        })
    }
}

fn inject_fragments(query_name: &str, template: &str, fragments: &[String]) -> Result<String, BuildError> {
    if !template.contains(FRAGMENT_LIST_MARKER) {
        if fragments.is_empty() {
            return Ok(template.to_string());
        }
        return Err(BuildError::MissingInsertionPoint {
            query: query_name.to_string(),
            marker: FRAGMENT_LIST_MARKER,
        });
    }

    let mut out = String::with_capacity(template.len());
    for line in template.lines() {
        if line.trim() == FRAGMENT_LIST_MARKER {
            let indent = &line[..line.len() - line.trim_start().len()];
            for fragment in fragments {
                out.push_str(indent);
                out.push_str("...");
                out.push_str(fragment);
                out.push('\n');
            }
        } else if line.contains(FRAGMENT_LIST_MARKER) {
            let spreads: Vec<String> = fragments.iter().map(|f| format!("...{f}")).collect();
            out.push_str(&line.replace(FRAGMENT_LIST_MARKER, &spreads.join(" ")));
            out.push('\n');
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Keeps the body of enabled regions and drops disabled ones. Nested regions
/// are kept only when every enclosing region is enabled.
fn apply_regions(
    template_name: &str,
    text: &str,
    regions: &BTreeMap<String, bool>,
) -> Result<String, BuildError> {
    let unbalanced = || BuildError::UnbalancedRegion {
        template: template_name.to_string(),
    };

    let mut active: Vec<bool> = Vec::new();
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix(REGION_START) {
            let enclosing = active.last().copied().unwrap_or(true);
            let enabled = regions.get(name.trim()).copied().unwrap_or(false);
            active.push(enclosing && enabled);
        } else if trimmed == REGION_END {
            active.pop().ok_or_else(unbalanced)?;
        } else if active.last().copied().unwrap_or(true) {
            out.push_str(line);
            out.push('\n');
        }
    }
    if active.is_empty() {
        Ok(out)
    } else {
        Err(unbalanced())
    }
}

fn expand_recursion(
    templates: &QueryTemplates,
    query: &str,
    name: &str,
    depth: u32,
    regions: &BTreeMap<String, bool>,
) -> Result<String, BuildError> {
    let body = templates
        .fragment(name)
        .ok_or_else(|| BuildError::UnknownFragment {
            name: name.to_string(),
        })?;
    let body = apply_regions(name, body, regions)?;
    let mut expansion = String::new();
    for _ in 0..depth {
        expansion = replace_spread(&body, name, expansion.trim_end());
    }
    let expanded = replace_spread(query, name, expansion.trim_end());

    Ok(expanded
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{line}\n"))
        .collect())
}

/// Replaces every `...<name>` spread, and only spreads of exactly that name.
fn replace_spread(text: &str, name: &str, replacement: &str) -> String {
    FRAGMENT_SPREAD
        .replace_all(text, |caps: &Captures<'_>| {
            if &caps[1] == name {
                replacement.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn spreads(text: &str) -> impl Iterator<Item = &str> {
    FRAGMENT_SPREAD
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| *name != "on")
}

fn append_fragment_definitions(
    templates: &QueryTemplates,
    mut query: String,
    regions: &BTreeMap<String, bool>,
) -> Result<String, BuildError> {
    let mut appended: Vec<String> = Vec::new();
    let mut definitions: Vec<String> = Vec::new();
    let mut pending: VecDeque<String> = spreads(&query).map(str::to_string).collect();

    while let Some(name) = pending.pop_front() {
        if appended.contains(&name) {
            continue;
        }
        let text = templates
            .fragment(&name)
            .ok_or_else(|| BuildError::UnknownFragment { name: name.clone() })?;
        let text = apply_regions(&name, text, regions)?;
        pending.extend(spreads(&text).map(str::to_string));
        appended.push(name);
        definitions.push(text);
    }

    for definition in definitions {
        query.push_str(&definition);
    }
    Ok(query)
}

/// Removes declarations of variables that nothing after the operation header
/// references, and unbinds them. An operation left with no declarations
/// loses its parentheses.
fn drop_unused_variables(query: String, variables: &mut Map<String, Value>) -> String {
    let Some(open) = query.find('{') else {
        return query;
    };
    let (header, body) = query.split_at(open);
    let (pruned, unused) = {
        let referenced: HashSet<&str> = VARIABLE_REFERENCE
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();
        let mut unused: Vec<String> = Vec::new();
        let pruned = VARIABLE_DECLARATION
            .replace_all(header, |caps: &Captures<'_>| {
                if referenced.contains(&caps[1]) {
                    caps[0].to_string()
                } else {
                    unused.push(caps[1].to_string());
                    String::new()
                }
            })
            .into_owned();
        (pruned, unused)
    };
    if unused.is_empty() {
        return query;
    }

    let mut header: String = pruned
        .split_inclusive('\n')
        .filter(|line| !(line.ends_with('\n') && line.trim().is_empty()))
        .collect();
    if !VARIABLE_DECLARATION.is_match(&header) {
        if let (Some(start), Some(end)) = (header.find('('), header.rfind(')')) {
            header.replace_range(start..=end, "");
        }
    }
    for name in &unused {
        variables.remove(name);
    }
    debug!(unused = ?unused, "Dropped unused variable declarations");

    header + body
}
