//! The `RpcTransport` trait — the abstraction callers program against.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RpcError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The central async trait every RPC transport implements.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the decoded response.
    ///
    /// Resolves exactly once, with either a decoded response or a typed
    /// failure — never both, never neither.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, RpcError>;

    /// Send an ordered batch of JSON-RPC requests.
    ///
    /// Default implementation sends them sequentially; override for true
    /// wire-level batching.
    async fn send_batch(
        &self,
        reqs: Vec<JsonRpcRequest>,
    ) -> Result<Vec<JsonRpcResponse>, RpcError> {
        let mut responses = Vec::with_capacity(reqs.len());
        for req in reqs {
            responses.push(self.send(req).await?);
        }
        Ok(responses)
    }

    /// Return the transport's endpoint (URL or name).
    fn url(&self) -> &str;

    /// Convenience: call a method and deserialize the result.
    ///
    /// Not available through `dyn RpcTransport`; go through [`Self::send`]
    /// there instead.
    async fn call<T: DeserializeOwned>(
        &self,
        id: u64,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, RpcError>
    where
        Self: Sized,
    {
        let req = JsonRpcRequest::new(id, method, params);
        let resp = self.send(req).await?;
        let result = resp
            .into_result()
            .map_err(|e| RpcError::Node(e.to_string()))?;
        serde_json::from_value(result).map_err(RpcError::Decode)
    }
}
