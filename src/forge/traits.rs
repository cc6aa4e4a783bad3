//! Traits related to the remote GraphQL API
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Body of a single GraphQL POST request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

/// Sends one GraphQL request and hands back the raw JSON response envelope
/// (`data` and `errors`). Implementations must not retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value>;
}
