//! HTTP transport for the Public Content API client.
//!
//! [`HttpTransport`] posts each [`GraphqlRequest`] as a GraphQL-over-HTTP JSON
//! body to a single endpoint. Claims travel as one `x-pca-claim: uri=value`
//! header each; the per-request timeout, when set, replaces the client-wide
//! one.
//!
//! ## Architectural Layer
//!
//! **Infrastructure adapter.** Implements [`client::GraphqlTransport`]; the
//! client core never sees `reqwest` types.

use std::time::Duration;

use async_trait::async_trait;
use client::{GraphqlRequest, GraphqlTransport, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use thiserror::Error;
use tracing::debug;

/// Header carrying one claim per occurrence.
pub const CLAIM_HEADER: &str = "x-pca-claim";

/// Longest slice of an error response body kept in a [`TransportError`].
const ERROR_BODY_LIMIT: usize = 512;

/// The transport could not be configured.
#[derive(Debug, Error)]
pub enum HttpConfigError {
    #[error("invalid value for header '{name}'")]
    InvalidHeader { name: String },

    #[error("invalid header name '{name}'")]
    InvalidHeaderName { name: String },

    #[error("unable to create the HTTP client")]
    Client(#[from] reqwest::Error),
}

/// Settings for an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Default timeout for requests that carry none of their own.
    pub timeout: Duration,
    /// Headers sent with every request.
    pub headers: HeaderMap,
    pub user_agent: String,
}

impl HttpTransportConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            headers,
            user_agent: concat!("pca-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    config: HttpTransportConfig,
    error: Option<HttpConfigError>,
}

impl HttpTransportBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            config: HttpTransportConfig::new(endpoint),
            error: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Adds a header sent with every request. An invalid name or value fails
    /// [`HttpTransportBuilder::build`].
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let header_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header_name) => header_name,
            Err(_) => {
                self.error.get_or_insert(HttpConfigError::InvalidHeaderName {
                    name: name.to_string(),
                });
                return self;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(header_value) => {
                self.config.headers.insert(header_name, header_value);
            }
            Err(_) => {
                self.error.get_or_insert(HttpConfigError::InvalidHeader {
                    name: name.to_string(),
                });
            }
        }
        self
    }

    #[must_use]
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header(AUTHORIZATION.as_str(), &value)
    }

    pub fn build(self) -> Result<HttpTransport, HttpConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        HttpTransport::with_config(self.config)
    }
}

/// [`GraphqlTransport`] over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// A transport with default settings.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, HttpConfigError> {
        Self::with_config(HttpTransportConfig::new(endpoint))
    }

    pub fn with_config(config: HttpTransportConfig) -> Result<Self, HttpConfigError> {
        let mut headers = config.headers;
        if let Ok(value) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            endpoint: config.endpoint,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn claim_headers(request: &GraphqlRequest) -> Result<HeaderMap, TransportError> {
        let name = HeaderName::from_static(CLAIM_HEADER);
        let mut headers = HeaderMap::new();
        for claim in request.claims() {
            let value = HeaderValue::from_str(&claim.to_string()).map_err(|err| {
                TransportError::with_source(format!("claim '{claim}' is not a valid header"), err)
            })?;
            headers.append(name.clone(), value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<String, TransportError> {
        let mut http_request = self
            .http
            .post(&self.endpoint)
            .headers(Self::claim_headers(request)?)
            .json(request);
        if let Some(timeout) = request.timeout() {
            http_request = http_request.timeout(timeout);
        }

        debug!(
            endpoint = %self.endpoint,
            query = request.query_name(),
            claims = request.claims().len(),
            "Sending GraphQL request"
        );

        let response = http_request.send().await.map_err(|err| {
            let message = if err.is_timeout() {
                format!("request to {} timed out", self.endpoint)
            } else {
                format!("request to {} failed", self.endpoint)
            };
            TransportError::with_source(message, err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            TransportError::with_source("unable to read response body", err).with_status(status.as_u16())
        })?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "GraphQL endpoint returned an error status");
            let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(
                TransportError::new(format!("HTTP {status}: {snippet}")).with_status(status.as_u16())
            );
        }
        Ok(body)
    }
}
