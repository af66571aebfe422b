//! `pca`: Public Content API command-line client.
//!
//! Composition root for the workspace:
//!
//! 1. **Parse configuration** from flags, with environment fallbacks for the
//!    connection settings (`PCA_ENDPOINT`, `PCA_TIMEOUT_SECS`,
//!    `PCA_BEARER_TOKEN`).
//! 2. **Wire logging**: `tracing-subscriber` with an `EnvFilter` (`RUST_LOG`,
//!    default `info`) writing to stderr, as JSON with `--log-json`.
//! 3. **Construct infrastructure**: an [`HttpTransport`] injected into a
//!    [`PublicContentApi`].
//! 4. **Run one facade operation** and print its result to stdout as JSON
//!    (`null` when the service found nothing).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client::{ApiConfig, ModelOptions, PublicContentApi, RequestOptions};
use graphql_http::HttpTransportBuilder;
use model::{
    Ancestor, ClaimValue, ContentIncludeMode, ContentNamespace, ContentType, ContextData,
    DataModelType, DcpType, FilterItemType, InputItemFilter, PageInclusion, Pagination,
};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Query a content-delivery service through its GraphQL API.
#[derive(Debug, Parser)]
#[command(name = "pca", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Default context claim sent with every request: <uri>=<value>.
    /// Repeat for multiple claims.
    #[arg(long = "context", value_name = "URI=VALUE", value_parser = parse_claim, global = true)]
    context: Vec<ClaimValue>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ConnectionArgs {
    /// GraphQL endpoint of the content service.
    #[arg(long, env = "PCA_ENDPOINT", global = true, default_value = "http://localhost:8081/cd/api")]
    endpoint: String,

    /// Request timeout in seconds.
    #[arg(long = "timeout-secs", env = "PCA_TIMEOUT_SECS", global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Bearer token for the Authorization header.
    #[arg(long, env = "PCA_BEARER_TOKEN", global = true, hide_env_values = true)]
    bearer_token: Option<String>,
}

/// Options shared by the item subcommands.
#[derive(Debug, Args)]
struct ItemArgs {
    /// Custom meta filter, passed through verbatim.
    #[arg(long)]
    custom_meta_filter: Option<String>,

    /// exclude | include | include_and_render
    #[arg(long, default_value = "include")]
    content: ContentIncludeMode,
}

impl ItemArgs {
    fn options(&self) -> RequestOptions {
        RequestOptions {
            custom_meta_filter: self.custom_meta_filter.clone(),
            content_include_mode: self.content,
            context: None,
        }
    }
}

#[derive(Debug, Args)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    first: u32,

    /// Cursor returned as `endCursor` by the previous page.
    #[arg(long)]
    after: Option<String>,
}

impl PageArgs {
    fn pagination(&self) -> Pagination {
        Pagination {
            first: Some(self.first),
            after: self.after.clone(),
        }
    }
}

/// Selects an item by exactly one of id, URL or compact identifier.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Lookup {
    #[arg(long)]
    id: Option<u32>,
    #[arg(long)]
    url: Option<String>,
    /// Compact identifier, e.g. tcm:5-640-64.
    #[arg(long)]
    cm_uri: Option<String>,
}

#[derive(Debug, Args)]
struct ModelArgs {
    /// raw | model
    #[arg(long, default_value = "model")]
    content_type: ContentType,

    /// r2 | dd4t
    #[arg(long, default_value = "r2")]
    model_type: DataModelType,

    /// include | exclude
    #[arg(long, default_value = "include")]
    page_inclusion: PageInclusion,

    /// default | highlighted
    #[arg(long, default_value = "default")]
    dcp_type: DcpType,

    /// Ask the service to render the content.
    #[arg(long)]
    render: bool,
}

impl ModelArgs {
    fn options(&self) -> ModelOptions {
        ModelOptions {
            content_type: self.content_type,
            model_type: self.model_type,
            page_inclusion: self.page_inclusion,
            dcp_type: self.dcp_type,
            content_include_mode: if self.render {
                ContentIncludeMode::IncludeAndRender
            } else {
                ContentIncludeMode::Include
            },
            context: None,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one publication.
    Publication {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[command(flatten)]
        item: ItemArgs,
    },

    /// List publications.
    Publications {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Find the publication serving a site URL.
    PublicationMapping {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        url: String,
    },

    /// Fetch a page by id, URL or compact identifier.
    Page {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        /// Required with --id or --url.
        #[arg(long)]
        publication_id: Option<u32>,
        #[command(flatten)]
        lookup: Lookup,
        #[command(flatten)]
        item: ItemArgs,
    },

    /// List the pages published at a URL.
    Pages {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        url: String,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Fetch a binary component by id, URL or compact identifier.
    Binary {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        /// Required with --id or --url.
        #[arg(long)]
        publication_id: Option<u32>,
        #[command(flatten)]
        lookup: Lookup,
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Run a filtered item query.
    Items {
        /// Item type to include: page | component | binary_component |
        /// keyword | publication | structure_group. Repeat for several.
        #[arg(long = "type", value_name = "TYPE")]
        item_types: Vec<FilterItemType>,
        #[arg(long)]
        namespace: Option<ContentNamespace>,
        #[arg(long)]
        publication_id: Option<u32>,
        /// Expand page regions and component presentations.
        #[arg(long)]
        container_items: bool,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Resolve a link to a page.
    PageLink {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[arg(long)]
        page_id: u32,
        #[arg(long)]
        relative: bool,
    },

    /// Resolve a link to a component.
    ComponentLink {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[arg(long)]
        component_id: u32,
        #[arg(long)]
        source_page_id: Option<u32>,
        #[arg(long)]
        exclude_template_id: Option<u32>,
        #[arg(long)]
        relative: bool,
    },

    /// Resolve a link to a binary variant.
    BinaryLink {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[arg(long)]
        binary_id: u32,
        #[arg(long)]
        variant_id: Option<String>,
        #[arg(long)]
        relative: bool,
    },

    /// Resolve a dynamic component presentation link.
    DynamicLink {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[arg(long)]
        page_id: u32,
        #[arg(long)]
        component_id: u32,
        #[arg(long)]
        template_id: u32,
        #[arg(long)]
        relative: bool,
    },

    /// Fetch the raw page model by id or URL.
    PageModel {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        page_id: Option<u32>,
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Fetch the raw entity model of a component presentation.
    EntityModel {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        #[arg(long)]
        entity_id: u32,
        #[arg(long)]
        template_id: u32,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Fetch the sitemap root.
    Sitemap {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        /// Levels of children to fetch below the root.
        #[arg(long, default_value_t = 1)]
        levels: u32,
    },

    /// Fetch a sitemap subtree.
    SitemapSubtree {
        #[arg(long, default_value = "sites")]
        namespace: ContentNamespace,
        #[arg(long)]
        publication_id: u32,
        /// Taxonomy node id, e.g. t1-k2. The root when omitted.
        #[arg(long)]
        node_id: Option<String>,
        #[arg(long, default_value_t = 1)]
        levels: u32,
        /// none | include_path | include_path_siblings
        #[arg(long, default_value = "none")]
        ancestor: Ancestor,
    },
}

fn parse_claim(text: &str) -> Result<ClaimValue, String> {
    match text.split_once('=') {
        Some((uri, value)) if !uri.is_empty() => Ok(ClaimValue::string(uri, value)),
        _ => Err(format!("expected <uri>=<value>, got '{text}'")),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn build_api(connection: &ConnectionArgs, context: Vec<ClaimValue>) -> Result<PublicContentApi> {
    let timeout = Duration::from_secs(connection.timeout_secs);
    let mut transport = HttpTransportBuilder::new(&connection.endpoint).with_timeout(timeout);
    if let Some(token) = &connection.bearer_token {
        transport = transport.with_bearer_token(token);
    }
    let transport = transport
        .build()
        .with_context(|| format!("Failed to configure transport for {}", connection.endpoint))?;

    let config = ApiConfig::default()
        .with_request_timeout(timeout)
        .with_default_context(context.into_iter().collect::<ContextData>());
    Ok(PublicContentApi::with_config(Arc::new(transport), config))
}

fn to_json<T: Serialize>(result: Option<T>) -> Result<Value> {
    serde_json::to_value(result).context("Failed to serialise result")
}

fn required(publication_id: Option<u32>) -> Result<u32> {
    publication_id.context("--publication-id is required with --id or --url")
}

async fn run(api: &PublicContentApi, command: Command) -> Result<Value> {
    match command {
        Command::Publication {
            namespace,
            publication_id,
            item,
        } => to_json(
            api.get_publication(namespace, publication_id, &item.options())
                .await?,
        ),

        Command::Publications {
            namespace,
            page,
            item,
        } => to_json(
            api.get_publications(namespace, &page.pagination(), None, &item.options())
                .await?,
        ),

        Command::PublicationMapping { namespace, url } => {
            to_json(api.get_publication_mapping(namespace, &url).await?)
        }

        Command::Page {
            namespace,
            publication_id,
            lookup,
            item,
        } => {
            let options = item.options();
            let page = match (lookup.id, lookup.url, lookup.cm_uri) {
                (Some(id), _, _) => {
                    api.get_page_by_id(namespace, required(publication_id)?, id, &options)
                        .await?
                }
                (_, Some(url), _) => {
                    api.get_page_by_url(namespace, required(publication_id)?, &url, &options)
                        .await?
                }
                (_, _, Some(cm_uri)) => api.get_page_by_cm_uri(&cm_uri, &options).await?,
                (None, None, None) => anyhow::bail!("one of --id, --url or --cm-uri is required"),
            };
            to_json(page)
        }

        Command::Pages {
            namespace,
            url,
            page,
            item,
        } => to_json(
            api.get_pages(namespace, &page.pagination(), &url, &item.options())
                .await?,
        ),

        Command::Binary {
            namespace,
            publication_id,
            lookup,
            item,
        } => {
            let options = item.options();
            let binary = match (lookup.id, lookup.url, lookup.cm_uri) {
                (Some(id), _, _) => {
                    api.get_binary_component_by_id(namespace, required(publication_id)?, id, &options)
                        .await?
                }
                (_, Some(url), _) => {
                    api.get_binary_component_by_url(namespace, required(publication_id)?, &url, &options)
                        .await?
                }
                (_, _, Some(cm_uri)) => api.get_binary_component_by_cm_uri(&cm_uri, &options).await?,
                (None, None, None) => anyhow::bail!("one of --id, --url or --cm-uri is required"),
            };
            to_json(binary)
        }

        Command::Items {
            item_types,
            namespace,
            publication_id,
            container_items,
            page,
            item,
        } => {
            let mut filter = if item_types.is_empty() {
                InputItemFilter::default()
            } else {
                InputItemFilter::for_item_types(item_types)
            };
            if let Some(namespace) = namespace {
                filter = filter.with_namespace(namespace);
            }
            if let Some(publication_id) = publication_id {
                filter = filter.with_publication_id(publication_id);
            }
            to_json(
                api.execute_item_query(
                    &filter,
                    None,
                    &page.pagination(),
                    container_items,
                    &item.options(),
                )
                .await?,
            )
        }

        Command::PageLink {
            namespace,
            publication_id,
            page_id,
            relative,
        } => to_json(
            api.resolve_page_link(namespace, publication_id, page_id, relative)
                .await?,
        ),

        Command::ComponentLink {
            namespace,
            publication_id,
            component_id,
            source_page_id,
            exclude_template_id,
            relative,
        } => to_json(
            api.resolve_component_link(
                namespace,
                publication_id,
                component_id,
                source_page_id,
                exclude_template_id,
                relative,
            )
            .await?,
        ),

        Command::BinaryLink {
            namespace,
            publication_id,
            binary_id,
            variant_id,
            relative,
        } => to_json(
            api.resolve_binary_link(
                namespace,
                publication_id,
                binary_id,
                variant_id.as_deref(),
                relative,
            )
            .await?,
        ),

        Command::DynamicLink {
            namespace,
            publication_id,
            page_id,
            component_id,
            template_id,
            relative,
        } => to_json(
            api.resolve_dynamic_component_link(
                namespace,
                publication_id,
                page_id,
                component_id,
                template_id,
                relative,
            )
            .await?,
        ),

        Command::PageModel {
            namespace,
            publication_id,
            page_id,
            url,
            model,
        } => {
            let options = model.options();
            let data = match (page_id, url) {
                (Some(page_id), _) => {
                    api.get_page_model_data_by_id(namespace, publication_id, page_id, &options)
                        .await?
                }
                (None, Some(url)) => {
                    api.get_page_model_data_by_url(namespace, publication_id, &url, &options)
                        .await?
                }
                (None, None) => anyhow::bail!("one of --page-id or --url is required"),
            };
            Ok(data.unwrap_or(Value::Null))
        }

        Command::EntityModel {
            namespace,
            publication_id,
            entity_id,
            template_id,
            model,
        } => Ok(api
            .get_entity_model_data(namespace, publication_id, entity_id, template_id, &model.options())
            .await?
            .unwrap_or(Value::Null)),

        Command::Sitemap {
            namespace,
            publication_id,
            levels,
        } => to_json(api.get_sitemap(namespace, publication_id, levels, None).await?),

        Command::SitemapSubtree {
            namespace,
            publication_id,
            node_id,
            levels,
            ancestor,
        } => to_json(
            api.get_sitemap_subtree(
                namespace,
                publication_id,
                node_id.as_deref(),
                levels,
                ancestor,
                None,
            )
            .await?,
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let api = build_api(&cli.connection, cli.context)?;
    tracing::debug!(endpoint = %cli.connection.endpoint, "Content API client ready");

    let output = run(&api, cli.command).await.context("Request failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to format result")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn context_flags_parse_into_claims() {
        let cli = Cli::try_parse_from([
            "pca",
            "--context",
            "taf:language=en",
            "--context",
            "taf:device=mobile",
            "sitemap",
            "--publication-id",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.context.len(), 2);
        assert_eq!(cli.context[0].uri, "taf:language");
        assert_eq!(cli.context[0].value, "en");
        assert!(matches!(cli.command, Command::Sitemap { levels: 1, .. }));
    }

    #[test]
    fn malformed_context_flag_is_rejected() {
        assert!(parse_claim("no-separator").is_err());
        assert!(parse_claim("=value").is_err());
        assert_eq!(parse_claim("a=b=c").unwrap().value, "b=c");
    }

    #[test]
    fn page_lookup_requires_exactly_one_key() {
        assert!(Cli::try_parse_from(["pca", "page", "--publication-id", "5"]).is_err());
        assert!(Cli::try_parse_from(["pca", "page", "--id", "1", "--url", "/a"]).is_err());
        let cli = Cli::try_parse_from(["pca", "page", "--cm-uri", "tcm:5-640-64", "--content", "exclude"])
            .unwrap();
        match cli.command {
            Command::Page { lookup, item, .. } => {
                assert_eq!(lookup.cm_uri.as_deref(), Some("tcm:5-640-64"));
                assert_eq!(item.content, ContentIncludeMode::Exclude);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn item_types_parse_case_insensitively() {
        let cli = Cli::try_parse_from(["pca", "items", "--type", "page", "--type", "STRUCTURE_GROUP"]).unwrap();
        match cli.command {
            Command::Items { item_types, .. } => {
                assert_eq!(item_types, vec![FilterItemType::Page, FilterItemType::StructureGroup]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
