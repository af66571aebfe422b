use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use client::{
    ApiConfig, ContentApiError, DecodeError, GraphqlRequest, GraphqlTransport, ModelOptions,
    PublicContentApi, RequestOptions, TransportError,
};
use model::{
    Ancestor, Claim, ClaimValue, ContentIncludeMode, ContentNamespace, ContentType, ContextData,
    DataModelType, DcpType, FilterItemType, InputItemFilter, Item, PageInclusion, Pagination,
    UriError,
};
use regex::Regex;
use serde_json::{json, Value};

/// Records every request and answers with a canned response.
struct RecordingTransport {
    response: Result<String, String>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl RecordingTransport {
    fn answering(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn raw(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn only_request(&self) -> GraphqlRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl GraphqlTransport for RecordingTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(message) => Err(TransportError::new(message.clone()).with_status(502)),
        }
    }
}

fn api(transport: &Arc<RecordingTransport>) -> PublicContentApi {
    PublicContentApi::new(transport.clone())
}

#[tokio::test]
async fn publication_mapping_end_to_end() {
    let transport = RecordingTransport::answering(json!({
        "data": { "publicationMapping": { "publicationId": 5 } }
    }));

    let mapping = api(&transport)
        .get_publication_mapping(ContentNamespace::Sites, "/home")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mapping.publication_id, 5);

    let request = transport.only_request();
    assert_eq!(request.query_name(), "PublicationMapping");
    assert_eq!(
        Value::Object(request.variables().clone()),
        json!({ "namespaceId": 1, "siteUrl": "/home" })
    );
    assert!(request.claims().is_empty());
}

#[tokio::test]
async fn missing_result_is_not_found() {
    let transport = RecordingTransport::answering(json!({ "data": { "publication": null } }));
    let publication = api(&transport)
        .get_publication(ContentNamespace::Docs, 9, &RequestOptions::default())
        .await
        .unwrap();
    assert!(publication.is_none());
    assert_eq!(transport.only_request().variable("namespaceId"), Some(&json!(2)));
}

#[tokio::test]
async fn transport_failure_is_wrapped() {
    let transport = RecordingTransport::failing("bad gateway");
    let err = api(&transport)
        .resolve_page_link(ContentNamespace::Sites, 5, 640, true)
        .await
        .unwrap_err();
    match err {
        ContentApiError::Transport { query, source } => {
            assert_eq!(query, "ResolvePageLink");
            assert_eq!(source.status(), Some(502));
            assert_eq!(source.to_string(), "bad gateway");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn malformed_identifier_never_reaches_the_transport() {
    let transport = RecordingTransport::answering(json!({ "data": {} }));
    let api = api(&transport);

    let err = api
        .get_page_by_cm_uri("tcm:5-abc", &RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentApiError::Uri(UriError::Parse { .. })));

    let err = api
        .get_binary_component_by_cm_uri("foo:5-6", &RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentApiError::Uri(UriError::UnknownNamespace { .. })));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn page_by_cm_uri_uses_identifier_parts() {
    let transport = RecordingTransport::answering(json!({
        "data": { "page": { "itemId": 640, "title": "Home", "url": "/index.html" } }
    }));
    let page = api(&transport)
        .get_page_by_cm_uri(
            "tcm:5-640-64",
            &RequestOptions::default().with_content_include_mode(ContentIncludeMode::Exclude),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.common.title.as_deref(), Some("Home"));

    let request = transport.only_request();
    assert_eq!(request.variable("publicationId"), Some(&json!(5)));
    assert_eq!(request.variable("cmUri"), Some(&json!("tcm:5-640-64")));
    assert!(request.variable("renderContent").is_none());
    assert!(!request.query().contains("rawContent"));
    assert!(request.query().contains("fragment PageFields on Page"));
    assert!(request.query().contains("fragment ItemFields on Item"));
}

#[tokio::test]
async fn item_query_requests_only_named_item_types() {
    let transport = RecordingTransport::answering(json!({
        "data": { "items": {
            "edges": [
                { "cursor": "c1", "node": { "__typename": "Page", "itemId": 1, "url": "/a" } },
                { "cursor": "c2", "node": { "__typename": "Component", "itemId": 2, "schemaId": 7 } }
            ],
            "pageInfo": { "hasNextPage": true, "endCursor": "c2" }
        } }
    }));
    let filter = InputItemFilter::for_item_types([FilterItemType::Page, FilterItemType::Component])
        .with_publication_id(5);

    let connection = api(&transport)
        .execute_item_query(&filter, None, &Pagination::first(2), true, &RequestOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(connection.len(), 2);
    assert!(matches!(connection.edges[0].node, Item::Page(_)));
    assert!(matches!(connection.edges[1].node, Item::Component(_)));
    let next = Pagination::first(2).next(&connection.page_info).unwrap();
    assert_eq!(next.after.as_deref(), Some("c2"));

    let request = transport.only_request();
    assert_eq!(request.injected_fragments(), ["PageFields", "ComponentFields"]);
    assert!(!request.query().contains("fragment KeywordFields"));
    assert!(request.query().contains("containerItems"));
    assert_eq!(request.variable("first"), Some(&json!(2)));
    assert!(request.variable("after").is_none());
    assert!(request.variable("sort").is_none());
    assert_eq!(request.variable("filter").unwrap()["itemTypes"], json!(["PAGE", "COMPONENT"]));
}

#[tokio::test]
async fn item_query_with_unknown_variant_fails() {
    let transport = RecordingTransport::answering(json!({
        "data": { "items": { "edges": [{ "node": { "__typename": "Gadget" } }] } }
    }));
    let err = api(&transport)
        .execute_item_query(
            &InputItemFilter::default(),
            None,
            &Pagination::default(),
            false,
            &RequestOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContentApiError::Decode(DecodeError::UnknownVariant { target: "Item", .. })
    ));
    assert_eq!(transport.only_request().injected_fragments(), ["ItemFields"]);
}

#[tokio::test]
async fn sitemap_query_depth_and_children() {
    let transport = RecordingTransport::answering(json!({
        "data": { "sitemap": {
            "__typename": "TaxonomySitemapItem",
            "id": "t1",
            "items": [
                { "__typename": "PageSitemapItem", "id": "p1", "url": "/a" },
                { "__typename": "TaxonomySitemapItem", "id": "t2", "items": [] },
                { "__typename": "TaxonomySitemapItem", "id": "t3" }
            ]
        } }
    }));
    let root = api(&transport)
        .get_sitemap(ContentNamespace::Sites, 5, 2, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(root.items.len(), 3);
    let children = root.items.as_slice();
    assert_eq!(children[1].children().len(), 0);
    match (&children[1], &children[2]) {
        (model::SitemapItem::Taxonomy(empty), model::SitemapItem::Taxonomy(unfetched)) => {
            assert!(empty.items.is_fetched());
            assert!(!unfetched.items.is_fetched());
        }
        other => panic!("unexpected children {other:?}"),
    }

    let request = transport.only_request();
    assert_eq!(request.query().matches("items {").count(), 2);
    assert!(!request.query().contains("...RecurseItems"));
    assert_eq!(
        request.query().matches("fragment TaxonomySitemapItemFields on").count(),
        1
    );
}

#[tokio::test]
async fn sitemap_subtree_sends_ancestor() {
    let transport = RecordingTransport::answering(json!({
        "data": { "sitemapSubtree": [
            { "__typename": "TaxonomySitemapItem", "id": "t1-k2" }
        ] }
    }));
    let nodes = api(&transport)
        .get_sitemap_subtree(
            ContentNamespace::Sites,
            5,
            Some("t1-k2"),
            0,
            Ancestor::IncludePath,
            None,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(nodes.len(), 1);

    let request = transport.only_request();
    assert_eq!(request.variable("ancestor"), Some(&json!("INCLUDE_PATH")));
    assert_eq!(request.variable("taxonomyNodeId"), Some(&json!("t1-k2")));
    assert!(!request.query().contains("items {"));
}

#[tokio::test]
async fn page_model_returns_raw_data_and_sends_claims() {
    let transport = RecordingTransport::answering(json!({
        "data": { "page": { "rawContent": { "data": { "Title": "Home", "Regions": [] } } } }
    }));
    let config = ApiConfig::default()
        .with_request_timeout(Duration::from_secs(10))
        .with_default_context(ContextData::default().with_claim(ClaimValue::string("a", "1")));
    let api = PublicContentApi::with_config(transport.clone(), config);

    let options = ModelOptions {
        content_type: ContentType::Raw,
        model_type: DataModelType::Dd4t,
        page_inclusion: PageInclusion::Exclude,
        ..ModelOptions::default()
    };
    let data = api
        .get_page_model_data_by_url(ContentNamespace::Sites, 5, "/index.html", &options)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(data, json!({ "Title": "Home", "Regions": [] }));

    let request = transport.only_request();
    assert_eq!(
        request.claims(),
        [
            Claim::ContentType(ContentType::Raw),
            Claim::ModelType(DataModelType::Dd4t),
            Claim::PageInclusion(PageInclusion::Exclude),
        ]
    );
    assert_eq!(request.timeout(), Some(Duration::from_secs(10)));
    assert_eq!(request.variable("renderContent"), Some(&json!(false)));
    assert_eq!(request.variable("contextData").unwrap()[0]["uri"], "a");
    assert!(request.variable("contentType").is_none());
}

#[tokio::test]
async fn link_resolution_decodes_url_string() {
    let transport = RecordingTransport::answering(json!({
        "data": { "componentLink": { "url": "/about.html" } }
    }));
    let url = api(&transport)
        .resolve_component_link(ContentNamespace::Sites, 5, 77, None, Some(3), false)
        .await
        .unwrap();
    assert_eq!(url.as_deref(), Some("/about.html"));

    let request = transport.only_request();
    assert!(request.variable("sourcePageId").is_none());
    assert_eq!(request.variable("excludeComponentTemplateId"), Some(&json!(3)));
    assert_eq!(request.variable("renderRelativeLink"), Some(&json!(false)));
    assert_eq!(request.operation_name(), Some("ResolveComponentLink"));
}

#[tokio::test]
async fn unparseable_response_is_a_decode_error() {
    let transport = RecordingTransport::raw("<html>oops</html>");
    let err = api(&transport)
        .get_publication_mapping(ContentNamespace::Sites, "/")
        .await
        .unwrap_err();
    assert!(matches!(err, ContentApiError::Decode(DecodeError::Mapping { .. })));
}

#[tokio::test]
async fn graphql_errors_do_not_fail_when_data_is_present() {
    let transport = RecordingTransport::answering(json!({
        "data": { "binaryLink": { "url": "/media/logo.png" } },
        "errors": [{ "message": "partial failure" }]
    }));
    let url = api(&transport)
        .resolve_binary_link(ContentNamespace::Sites, 5, 12, Some("default"), true)
        .await
        .unwrap();
    assert_eq!(url.as_deref(), Some("/media/logo.png"));
}

#[tokio::test]
async fn per_call_context_overrides_default() {
    let transport = RecordingTransport::answering(json!({ "data": { "pages": { "edges": [] } } }));
    let config = ApiConfig::default()
        .with_default_context(ContextData::default().with_claim(ClaimValue::string("x", "default")));
    let api = PublicContentApi::with_config(transport.clone(), config);
    let options = RequestOptions::default()
        .with_custom_meta_filter("KEY:'a'")
        .with_context(ContextData::default().with_claim(ClaimValue::string("x", "call")));

    let pages = api
        .get_pages(ContentNamespace::Sites, &Pagination::default(), "/index.html", &options)
        .await
        .unwrap()
        .unwrap();
    assert!(pages.is_empty());

    let request = transport.only_request();
    let context = request.variable("contextData").unwrap().as_array().unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(context[0]["value"], "call");
    assert_eq!(request.variable("customMetaFilter"), Some(&json!("KEY:'a'")));
    assert_eq!(request.custom_meta_filter(), Some("KEY:'a'"));
}

// -- every builtin operation ------------------------------------------------

/// Wraps `leaf` in objects so that it sits at `pointer`.
fn nest(pointer: &str, leaf: Value) -> Value {
    pointer
        .trim_start_matches('/')
        .split('/')
        .rev()
        .fold(leaf, |inner, key| {
            let mut object = serde_json::Map::new();
            object.insert(key.to_string(), inner);
            Value::Object(object)
        })
}

/// Asserts the assembled document declares exactly the variables it uses,
/// binds nothing undeclared and defines every fragment it spreads once.
fn assert_well_formed(request: &GraphqlRequest) {
    let query = request.query();
    let name = request.query_name();
    for directive in ["#if", "#endif", "@fragmentList"] {
        assert!(!query.contains(directive), "{name}: leftover {directive}");
    }

    let open = query.find('{').unwrap();
    let (header, body) = query.split_at(open);
    let declared: BTreeSet<&str> = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\s*:")
        .unwrap()
        .captures_iter(header)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();
    let referenced: BTreeSet<&str> = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap()
        .captures_iter(body)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();
    assert_eq!(declared, referenced, "{name}: declared vs referenced variables");
    for bound in request.variables().keys() {
        assert!(declared.contains(bound.as_str()), "{name}: ${bound} bound but not declared");
    }

    let spreads: BTreeSet<&str> = Regex::new(r"\.\.\.\s*([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap()
        .captures_iter(query)
        .map(|caps| caps.get(1).unwrap().as_str())
        .filter(|spread| *spread != "on")
        .collect();
    for spread in spreads {
        assert_eq!(
            query.matches(&format!("fragment {spread} on ")).count(),
            1,
            "{name}: fragment {spread} must be defined once"
        );
    }
}

struct OperationCase {
    label: &'static str,
    query: &'static str,
    pointer: &'static str,
    leaf: Value,
    variables: &'static [&'static str],
    claims: Vec<Claim>,
}

async fn invoke(api: &PublicContentApi, label: &str) -> Result<bool, ContentApiError> {
    let sites = ContentNamespace::Sites;
    let options = RequestOptions::default();
    let model = ModelOptions::default();
    let found = match label {
        "publication" => api.get_publication(sites, 5, &options).await?.is_some(),
        "publications" => api
            .get_publications(sites, &Pagination::first(10), None, &options)
            .await?
            .is_some(),
        "publication mapping" => api.get_publication_mapping(sites, "/home").await?.is_some(),
        "page by id" => api.get_page_by_id(sites, 5, 640, &options).await?.is_some(),
        "page by url" => api.get_page_by_url(sites, 5, "/index.html", &options).await?.is_some(),
        "page by cm uri" => api.get_page_by_cm_uri("tcm:5-640-64", &options).await?.is_some(),
        "pages" => api
            .get_pages(sites, &Pagination::default(), "/index.html", &options)
            .await?
            .is_some(),
        "binary by id" => api.get_binary_component_by_id(sites, 5, 12, &options).await?.is_some(),
        "binary by url" => api
            .get_binary_component_by_url(sites, 5, "/media/logo.png", &options)
            .await?
            .is_some(),
        "binary by cm uri" => api
            .get_binary_component_by_cm_uri("tcm:5-12", &options)
            .await?
            .is_some(),
        "items of keyword type" => api
            .execute_item_query(
                &InputItemFilter::for_item_types([FilterItemType::Keyword]),
                None,
                &Pagination::default(),
                false,
                &options,
            )
            .await?
            .is_some(),
        "items without type filter" => api
            .execute_item_query(&InputItemFilter::default(), None, &Pagination::default(), false, &options)
            .await?
            .is_some(),
        "items of page type" => api
            .execute_item_query(
                &InputItemFilter::for_item_types([FilterItemType::Page]),
                None,
                &Pagination::default(),
                true,
                &options,
            )
            .await?
            .is_some(),
        "page link" => api.resolve_page_link(sites, 5, 640, true).await?.is_some(),
        "component link" => api
            .resolve_component_link(sites, 5, 77, None, None, true)
            .await?
            .is_some(),
        "binary link" => api.resolve_binary_link(sites, 5, 12, None, true).await?.is_some(),
        "dynamic component link" => api
            .resolve_dynamic_component_link(sites, 5, 640, 77, 88, false)
            .await?
            .is_some(),
        "page model by url" => api
            .get_page_model_data_by_url(sites, 5, "/index.html", &model)
            .await?
            .is_some(),
        "page model by id" => api.get_page_model_data_by_id(sites, 5, 640, &model).await?.is_some(),
        "entity model" => api.get_entity_model_data(sites, 5, 77, 88, &model).await?.is_some(),
        "sitemap" => api.get_sitemap(sites, 5, 1, None).await?.is_some(),
        "sitemap subtree" => api
            .get_sitemap_subtree(sites, 5, None, 1, Ancestor::IncludePath, None)
            .await?
            .is_some(),
        other => panic!("no operation labelled {other}"),
    };
    Ok(found)
}

fn case(
    label: &'static str,
    query: &'static str,
    pointer: &'static str,
    leaf: &Value,
    variables: &'static [&'static str],
) -> OperationCase {
    OperationCase {
        label,
        query,
        pointer,
        leaf: leaf.clone(),
        variables,
        claims: Vec::new(),
    }
}

fn operation_cases() -> Vec<OperationCase> {
    let item = json!({ "itemId": 5 });
    let empty = json!({ "edges": [] });
    let node = json!({ "__typename": "TaxonomySitemapItem", "id": "t1" });
    let page_model = vec![
        Claim::ContentType(ContentType::Model),
        Claim::ModelType(DataModelType::R2),
        Claim::PageInclusion(PageInclusion::Include),
    ];
    vec![
        case("publication", "Publication", "/data/publication", &item, &["namespaceId", "publicationId"]),
        case("publications", "Publications", "/data/publications", &empty, &["namespaceId", "first"]),
        case(
            "publication mapping",
            "PublicationMapping",
            "/data/publicationMapping",
            &json!({ "publicationId": 5 }),
            &["namespaceId", "siteUrl"],
        ),
        case(
            "page by id",
            "PageById",
            "/data/page",
            &item,
            &["namespaceId", "publicationId", "pageId", "renderContent"],
        ),
        case(
            "page by url",
            "PageByUrl",
            "/data/page",
            &item,
            &["namespaceId", "publicationId", "url", "renderContent"],
        ),
        case(
            "page by cm uri",
            "PageByCmUri",
            "/data/page",
            &item,
            &["namespaceId", "publicationId", "cmUri", "renderContent"],
        ),
        case("pages", "Pages", "/data/pages", &empty, &["namespaceId", "url", "renderContent"]),
        case(
            "binary by id",
            "BinaryComponentById",
            "/data/binaryComponent",
            &item,
            &["namespaceId", "publicationId", "binaryId"],
        ),
        case(
            "binary by url",
            "BinaryComponentByUrl",
            "/data/binaryComponent",
            &item,
            &["namespaceId", "publicationId", "url"],
        ),
        case(
            "binary by cm uri",
            "BinaryComponentByCmUri",
            "/data/binaryComponent",
            &item,
            &["namespaceId", "publicationId", "cmUri"],
        ),
        case("items of keyword type", "ItemQuery", "/data/items", &empty, &["filter"]),
        case("items without type filter", "ItemQuery", "/data/items", &empty, &["filter"]),
        case("items of page type", "ItemQuery", "/data/items", &empty, &["filter", "renderContent"]),
        case(
            "page link",
            "ResolvePageLink",
            "/data/pageLink/url",
            &json!("/index.html"),
            &["namespaceId", "publicationId", "pageId", "renderRelativeLink"],
        ),
        case(
            "component link",
            "ResolveComponentLink",
            "/data/componentLink/url",
            &json!("/about.html"),
            &["namespaceId", "publicationId", "targetComponentId", "renderRelativeLink"],
        ),
        case(
            "binary link",
            "ResolveBinaryLink",
            "/data/binaryLink/url",
            &json!("/media/logo.png"),
            &["namespaceId", "publicationId", "binaryId", "renderRelativeLink"],
        ),
        case(
            "dynamic component link",
            "ResolveDynamicComponentLink",
            "/data/dynamicComponentLink/url",
            &json!("/news.html"),
            &[
                "namespaceId",
                "publicationId",
                "targetPageId",
                "targetComponentId",
                "targetTemplateId",
                "renderRelativeLink",
            ],
        ),
        OperationCase {
            claims: page_model.clone(),
            ..case(
                "page model by url",
                "PageModelByUrl",
                "/data/page/rawContent/data",
                &json!({ "Title": "Home" }),
                &["namespaceId", "publicationId", "url", "renderContent"],
            )
        },
        OperationCase {
            claims: page_model,
            ..case(
                "page model by id",
                "PageModelById",
                "/data/page/rawContent/data",
                &json!({ "Title": "Home" }),
                &["namespaceId", "publicationId", "pageId", "renderContent"],
            )
        },
        OperationCase {
            claims: vec![
                Claim::ContentType(ContentType::Model),
                Claim::ModelType(DataModelType::R2),
                Claim::DcpType(DcpType::Default),
            ],
            ..case(
                "entity model",
                "EntityModelById",
                "/data/componentPresentation/rawContent/data",
                &json!({ "Id": "77-88" }),
                &["namespaceId", "publicationId", "componentId", "templateId", "renderContent"],
            )
        },
        case("sitemap", "Sitemap", "/data/sitemap", &node, &["namespaceId", "publicationId"]),
        case(
            "sitemap subtree",
            "SitemapSubtree",
            "/data/sitemapSubtree",
            &json!([node]),
            &["namespaceId", "publicationId", "ancestor"],
        ),
    ]
}

#[tokio::test]
async fn every_operation_sends_a_well_formed_request() {
    for case in operation_cases() {
        let transport = RecordingTransport::answering(nest(case.pointer, case.leaf));
        let found = invoke(&api(&transport), case.label)
            .await
            .unwrap_or_else(|err| panic!("{}: {err}", case.label));
        assert!(found, "{}: no result at {}", case.label, case.pointer);

        let request = transport.only_request();
        assert_eq!(request.query_name(), case.query, "{}", case.label);
        assert_eq!(request.operation_name(), Some(case.query), "{}", case.label);
        assert_eq!(request.claims(), case.claims.as_slice(), "{}", case.label);
        let variables: BTreeSet<&str> = request.variables().keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = case.variables.iter().copied().collect();
        assert_eq!(variables, expected, "{}: bound variables", case.label);
        assert_well_formed(&request);
    }
}

#[tokio::test]
async fn item_query_without_content_fragments_omits_render_flag() {
    let transport = RecordingTransport::answering(nest("/data/items", json!({ "edges": [] })));
    api(&transport)
        .execute_item_query(
            &InputItemFilter::for_item_types([FilterItemType::Keyword]),
            None,
            &Pagination::default(),
            false,
            &RequestOptions::default().with_content_include_mode(ContentIncludeMode::IncludeAndRender),
        )
        .await
        .unwrap();
    let request = transport.only_request();
    assert!(!request.query().contains("$renderContent"));
    assert!(request.variable("renderContent").is_none());
    assert!(request.query().contains("fragment KeywordFields on Keyword"));
}
