//! The typed facade.
//!
//! One async operation per use case. Every operation follows the same path:
//! build the request, execute it through the [`GraphqlTransport`], pick the
//! result node out of the response by JSON pointer and decode it. `Ok(None)`
//! means the service reported nothing at that path.

use std::sync::Arc;
use std::time::Duration;

use model::{
    Ancestor, BinaryComponent, Connection, ContentNamespace, ContentType, ContentUri, ContextData,
    ContentIncludeMode, DataModelType, DcpType, InputItemFilter, InputPublicationFilter,
    InputSortParam, Item, Page, PageInclusion, Pagination, Publication, PublicationMapping,
    TaxonomySitemapItem,
};
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::builder::{RequestBuilder, INCLUDE_CONTAINER_ITEMS_REGION};
use crate::decode::{decode_at, graphql_errors, parse_response, Decode};
use crate::errors::ContentApiError;
use crate::templates::QueryTemplates;
use crate::transport::GraphqlTransport;

/// Fragment that recurses into sitemap children.
const SITEMAP_RECURSION: &str = "RecurseItems";

/// Fragment used by item queries whose filter names no item types.
const ITEM_FALLBACK_FRAGMENT: &str = "ItemFields";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Facade-wide settings, fixed for the lifetime of a [`PublicContentApi`].
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Timeout attached to every request; the transport enforces it.
    pub request_timeout: Option<Duration>,
    /// Context data sent with every request that carries context; per-call
    /// context overrides it claim by claim.
    pub default_context: ContextData,
}

impl ApiConfig {
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_default_context(mut self, context: ContextData) -> Self {
        self.default_context = context;
        self
    }
}

/// Per-call options shared by the item operations.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Restricts which custom metadata is returned.
    pub custom_meta_filter: Option<String>,
    pub content_include_mode: ContentIncludeMode,
    /// Overrides the facade's default context data.
    pub context: Option<ContextData>,
}

impl RequestOptions {
    #[must_use]
    pub fn with_custom_meta_filter(mut self, filter: impl Into<String>) -> Self {
        self.custom_meta_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_content_include_mode(mut self, mode: ContentIncludeMode) -> Self {
        self.content_include_mode = mode;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: ContextData) -> Self {
        self.context = Some(context);
        self
    }
}

/// Per-call options for the model data operations. The typed settings travel
/// to the service as claims.
#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub content_type: ContentType,
    pub model_type: DataModelType,
    /// Page model operations only.
    pub page_inclusion: PageInclusion,
    /// Entity model operations only.
    pub dcp_type: DcpType,
    pub content_include_mode: ContentIncludeMode,
    pub context: Option<ContextData>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            content_type: ContentType::Model,
            model_type: DataModelType::R2,
            page_inclusion: PageInclusion::Include,
            dcp_type: DcpType::Default,
            content_include_mode: ContentIncludeMode::Include,
            context: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// Client for the public content service.
///
/// Cheap to clone and safe to share: it holds only the transport handle and
/// immutable configuration.
#[derive(Clone)]
pub struct PublicContentApi {
    transport: Arc<dyn GraphqlTransport>,
    templates: QueryTemplates,
    config: ApiConfig,
}

impl std::fmt::Debug for PublicContentApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicContentApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PublicContentApi {
    /// Creates a facade over `transport` with the built-in query templates.
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self::with_config(transport, ApiConfig::default())
    }

    pub fn with_config(transport: Arc<dyn GraphqlTransport>, config: ApiConfig) -> Self {
        Self {
            transport,
            templates: QueryTemplates::builtin(),
            config,
        }
    }

    /// Replaces the query templates.
    #[must_use]
    pub fn with_templates(mut self, templates: QueryTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // -- publications -------------------------------------------------------

    pub async fn get_publication(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        options: &RequestOptions,
    ) -> Result<Option<Publication>, ContentApiError> {
        self.run("Publication", "/data/publication", |b| {
            self.with_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
        })
        .await
    }

    pub async fn get_publications(
        &self,
        namespace: ContentNamespace,
        pagination: &Pagination,
        filter: Option<&InputPublicationFilter>,
        options: &RequestOptions,
    ) -> Result<Option<Connection<Publication>>, ContentApiError> {
        self.run("Publications", "/data/publications", |b| {
            self.with_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_pagination(pagination)
                .with_variable("filter", filter)
        })
        .await
    }

    /// Finds the publication that serves `site_url`.
    pub async fn get_publication_mapping(
        &self,
        namespace: ContentNamespace,
        site_url: &str,
    ) -> Result<Option<PublicationMapping>, ContentApiError> {
        self.run("PublicationMapping", "/data/publicationMapping", |b| {
            b.with_variable("namespaceId", namespace.id())
                .with_variable("siteUrl", site_url)
        })
        .await
    }

    // -- pages --------------------------------------------------------------

    pub async fn get_page_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        page_id: u32,
        options: &RequestOptions,
    ) -> Result<Option<Page>, ContentApiError> {
        self.run("PageById", "/data/page", |b| {
            self.with_content_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("pageId", page_id)
        })
        .await
    }

    pub async fn get_page_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Option<Page>, ContentApiError> {
        self.run("PageByUrl", "/data/page", |b| {
            self.with_content_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("url", url)
        })
        .await
    }

    /// Fetches a page by compact identifier, e.g. `tcm:5-640-64`.
    pub async fn get_page_by_cm_uri(
        &self,
        cm_uri: &str,
        options: &RequestOptions,
    ) -> Result<Option<Page>, ContentApiError> {
        let uri = ContentUri::parse(cm_uri)?;
        self.run("PageByCmUri", "/data/page", |b| {
            self.with_content_options(b, options)
                .with_variable("namespaceId", uri.namespace_id())
                .with_variable("publicationId", uri.publication_id())
                .with_variable("cmUri", uri.to_string())
        })
        .await
    }

    /// All pages published at `url` across publications.
    pub async fn get_pages(
        &self,
        namespace: ContentNamespace,
        pagination: &Pagination,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Option<Connection<Page>>, ContentApiError> {
        self.run("Pages", "/data/pages", |b| {
            self.with_content_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("url", url)
                .with_pagination(pagination)
        })
        .await
    }

    // -- binary components --------------------------------------------------

    pub async fn get_binary_component_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        binary_id: u32,
        options: &RequestOptions,
    ) -> Result<Option<BinaryComponent>, ContentApiError> {
        self.run("BinaryComponentById", "/data/binaryComponent", |b| {
            self.with_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("binaryId", binary_id)
        })
        .await
    }

    pub async fn get_binary_component_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Option<BinaryComponent>, ContentApiError> {
        self.run("BinaryComponentByUrl", "/data/binaryComponent", |b| {
            self.with_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("url", url)
        })
        .await
    }

    pub async fn get_binary_component_by_cm_uri(
        &self,
        cm_uri: &str,
        options: &RequestOptions,
    ) -> Result<Option<BinaryComponent>, ContentApiError> {
        let uri = ContentUri::parse(cm_uri)?;
        self.run("BinaryComponentByCmUri", "/data/binaryComponent", |b| {
            self.with_options(b, options)
                .with_variable("namespaceId", uri.namespace_id())
                .with_variable("publicationId", uri.publication_id())
                .with_variable("cmUri", uri.to_string())
        })
        .await
    }

    // -- item query ---------------------------------------------------------

    /// Runs a filtered item query. Only the fragments for the item types the
    /// filter names are requested.
    pub async fn execute_item_query(
        &self,
        filter: &InputItemFilter,
        sort: Option<&InputSortParam>,
        pagination: &Pagination,
        include_container_items: bool,
        options: &RequestOptions,
    ) -> Result<Option<Connection<Item>>, ContentApiError> {
        self.run("ItemQuery", "/data/items", |b| {
            let b = if filter.item_types().is_empty() {
                b.with_injected_fragment(ITEM_FALLBACK_FRAGMENT)
            } else {
                b.with_fragments_for_item_types(filter.item_types())
            };
            self.with_content_options(b, options)
                .with_region(INCLUDE_CONTAINER_ITEMS_REGION, include_container_items)
                .with_pagination(pagination)
                .with_variable("filter", filter)
                .with_variable("sort", sort)
        })
        .await
    }

    // -- links --------------------------------------------------------------

    pub async fn resolve_page_link(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        page_id: u32,
        render_relative_link: bool,
    ) -> Result<Option<String>, ContentApiError> {
        self.run("ResolvePageLink", "/data/pageLink/url", |b| {
            b.with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("pageId", page_id)
                .with_variable("renderRelativeLink", render_relative_link)
        })
        .await
    }

    pub async fn resolve_component_link(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        component_id: u32,
        source_page_id: Option<u32>,
        exclude_component_template_id: Option<u32>,
        render_relative_link: bool,
    ) -> Result<Option<String>, ContentApiError> {
        self.run("ResolveComponentLink", "/data/componentLink/url", |b| {
            b.with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("targetComponentId", component_id)
                .with_variable("sourcePageId", source_page_id)
                .with_variable("excludeComponentTemplateId", exclude_component_template_id)
                .with_variable("renderRelativeLink", render_relative_link)
        })
        .await
    }

    pub async fn resolve_binary_link(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        binary_id: u32,
        variant_id: Option<&str>,
        render_relative_link: bool,
    ) -> Result<Option<String>, ContentApiError> {
        self.run("ResolveBinaryLink", "/data/binaryLink/url", |b| {
            b.with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("binaryId", binary_id)
                .with_variable("variantId", variant_id)
                .with_variable("renderRelativeLink", render_relative_link)
        })
        .await
    }

    pub async fn resolve_dynamic_component_link(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        page_id: u32,
        component_id: u32,
        template_id: u32,
        render_relative_link: bool,
    ) -> Result<Option<String>, ContentApiError> {
        self.run(
            "ResolveDynamicComponentLink",
            "/data/dynamicComponentLink/url",
            |b| {
                b.with_variable("namespaceId", namespace.id())
                    .with_variable("publicationId", publication_id)
                    .with_variable("targetPageId", page_id)
                    .with_variable("targetComponentId", component_id)
                    .with_variable("targetTemplateId", template_id)
                    .with_variable("renderRelativeLink", render_relative_link)
            },
        )
        .await
    }

    // -- model data ---------------------------------------------------------

    /// Raw page model at `url`. The shape depends on the requested data model
    /// and is returned untouched.
    pub async fn get_page_model_data_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        url: &str,
        options: &ModelOptions,
    ) -> Result<Option<Value>, ContentApiError> {
        self.run("PageModelByUrl", "/data/page/rawContent/data", |b| {
            self.with_page_model_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("url", url)
        })
        .await
    }

    pub async fn get_page_model_data_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        page_id: u32,
        options: &ModelOptions,
    ) -> Result<Option<Value>, ContentApiError> {
        self.run("PageModelById", "/data/page/rawContent/data", |b| {
            self.with_page_model_options(b, options)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("pageId", page_id)
        })
        .await
    }

    /// Raw entity model of one component presentation.
    pub async fn get_entity_model_data(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        entity_id: u32,
        template_id: u32,
        options: &ModelOptions,
    ) -> Result<Option<Value>, ContentApiError> {
        self.run(
            "EntityModelById",
            "/data/componentPresentation/rawContent/data",
            |b| {
                self.with_model_options(b, options)
                    .with_claim(options.dcp_type)
                    .with_variable("namespaceId", namespace.id())
                    .with_variable("publicationId", publication_id)
                    .with_variable("componentId", entity_id)
                    .with_variable("templateId", template_id)
            },
        )
        .await
    }

    // -- sitemap ------------------------------------------------------------

    /// The sitemap root with `descendant_levels` levels of children.
    pub async fn get_sitemap(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        descendant_levels: u32,
        context: Option<&ContextData>,
    ) -> Result<Option<TaxonomySitemapItem>, ContentApiError> {
        self.run("Sitemap", "/data/sitemap", |b| {
            b.with_recursive_fragment(SITEMAP_RECURSION, descendant_levels)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_context_data(&self.config.default_context, context)
        })
        .await
    }

    /// The subtree under `taxonomy_node_id` (the root when `None`), with the
    /// ancestors selected by `ancestor`.
    pub async fn get_sitemap_subtree(
        &self,
        namespace: ContentNamespace,
        publication_id: u32,
        taxonomy_node_id: Option<&str>,
        descendant_levels: u32,
        ancestor: Ancestor,
        context: Option<&ContextData>,
    ) -> Result<Option<Vec<TaxonomySitemapItem>>, ContentApiError> {
        self.run("SitemapSubtree", "/data/sitemapSubtree", |b| {
            b.with_recursive_fragment(SITEMAP_RECURSION, descendant_levels)
                .with_variable("namespaceId", namespace.id())
                .with_variable("publicationId", publication_id)
                .with_variable("taxonomyNodeId", taxonomy_node_id)
                .with_variable("ancestor", ancestor)
                .with_context_data(&self.config.default_context, context)
        })
        .await
    }

    // -- plumbing -----------------------------------------------------------

    fn with_options<'t>(&self, builder: RequestBuilder<'t>, options: &RequestOptions) -> RequestBuilder<'t> {
        builder
            .with_custom_meta_filter(options.custom_meta_filter.as_deref())
            .with_context_data(&self.config.default_context, options.context.as_ref())
    }

    fn with_content_options<'t>(
        &self,
        builder: RequestBuilder<'t>,
        options: &RequestOptions,
    ) -> RequestBuilder<'t> {
        self.with_options(builder, options)
            .with_content_include_mode(options.content_include_mode)
    }

    fn with_model_options<'t>(&self, builder: RequestBuilder<'t>, options: &ModelOptions) -> RequestBuilder<'t> {
        builder
            .with_variable("renderContent", options.content_include_mode.renders_content())
            .with_context_data(&self.config.default_context, options.context.as_ref())
            .with_claim(options.content_type)
            .with_claim(options.model_type)
    }

    fn with_page_model_options<'t>(
        &self,
        builder: RequestBuilder<'t>,
        options: &ModelOptions,
    ) -> RequestBuilder<'t> {
        self.with_model_options(builder, options)
            .with_claim(options.page_inclusion)
    }

    /// Builds, executes and decodes one request inside its own span.
    async fn run<T, F>(&self, query: &'static str, pointer: &str, configure: F) -> Result<Option<T>, ContentApiError>
    where
        T: Decode,
        F: for<'t> FnOnce(RequestBuilder<'t>) -> RequestBuilder<'t>,
    {
        let span = info_span!("content_api", query, request_id = %Uuid::new_v4());
        async move {
            let builder = RequestBuilder::new(&self.templates)
                .with_query_name(query)
                .with_operation_name(query)
                .with_timeout(self.config.request_timeout);
            let request = configure(builder).build()?;

            let raw = self
                .transport
                .execute(&request)
                .await
                .map_err(|source| ContentApiError::Transport {
                    query: query.to_string(),
                    source,
                })?;

            let document = parse_response(&raw)?;
            for message in graphql_errors(&document) {
                warn!(error = %message, "Service reported a GraphQL error");
            }

            let result = decode_at::<T>(&document, pointer)?;
            debug!(target_type = T::TARGET, found = result.is_some(), "Decoded response");
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
