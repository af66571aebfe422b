//! The transport port.

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::request::GraphqlRequest;

/// Executes assembled requests against a content-delivery endpoint.
///
/// Implementations send the request body, honour [`GraphqlRequest::timeout`]
/// and deliver [`GraphqlRequest::claims`] out of band. They return the raw
/// response document; interpreting it is the caller's job.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<String, TransportError>;
}
