//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! Each call is one HTTP POST, executed on its own Tokio task. The task is
//! registered in a [`PendingCalls`] registry before it starts, so a delegate
//! holding the registry handle can reject the call for as long as it is on
//! the wire; rejection fails the caller's future with a `Security` error and
//! aborts the network task.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tokio::sync::oneshot;

use relayrpc_core::error::RpcError;
use relayrpc_core::pending::{CallId, PendingCalls, RawOutcome};
use relayrpc_core::request::{JsonRpcRequest, JsonRpcResponse};
use relayrpc_core::transport::RpcTransport;

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout applied by the network layer to the whole exchange.
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP JSON-RPC client with in-flight call tracking.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    pending: PendingCalls,
}

impl HttpRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            url: url.into(),
            http,
            pending: PendingCalls::new(),
        }
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Self {
        Self::new(url, HttpClientConfig::default())
    }

    /// Handle to the in-flight call registry.
    ///
    /// Give this to whatever validates the connection (e.g. a TLS trust
    /// delegate); it can then call [`PendingCalls::reject_and_cancel`] with
    /// a call's identity to fail it mid-flight.
    pub fn pending(&self) -> PendingCalls {
        self.pending.clone()
    }

    /// Issue one POST on its own task and return the call identity plus the
    /// receiver its raw outcome will arrive on.
    ///
    /// Registration happens before the task is spawned, so the call is
    /// rejectable for its full lifetime and a completion can never slip in
    /// ahead of the registry entry.
    fn dispatch(&self, body: Vec<u8>) -> (CallId, oneshot::Receiver<RawOutcome>) {
        let (tx, rx) = oneshot::channel();
        let (abort, registration) = AbortHandle::new_pair();
        let id = self.pending.register(tx, abort);

        let http = self.http.clone();
        let url = self.url.clone();
        let pending = self.pending.clone();
        tokio::spawn(async move {
            match Abortable::new(post_once(http, url, body), registration).await {
                // The registry drops the entry on every terminal path.
                Ok(outcome) => {
                    pending.complete(id, outcome);
                }
                // Aborted by a rejection, which already resolved the future.
                Err(futures::future::Aborted) => {}
            }
        });

        (id, rx)
    }

    async fn round_trip(&self, body: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let (id, rx) = self.dispatch(body);
        tracing::debug!(%id, url = %self.url, "request dispatched");
        rx.await
            .unwrap_or_else(|_| Err(RpcError::Transport("in-flight call dropped".into())))
    }
}

/// One HTTP POST: always hits the network, never a cache.
async fn post_once(http: reqwest::Client, url: String, body: Vec<u8>) -> RawOutcome {
    let resp = http
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
        .send()
        .await
        .map_err(|e| RpcError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RpcError::Transport(format!(
            "HTTP {}: {body}",
            status.as_u16()
        )));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| RpcError::Transport(e.to_string()))?;
    if bytes.is_empty() {
        return Err(RpcError::Node("Node response is empty".into()));
    }
    Ok(bytes.to_vec())
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, RpcError> {
        if !req.has_method() {
            return Err(RpcError::Protocol("RPC method is nil".into()));
        }
        let body = serde_json::to_vec(&req)
            .map_err(|e| RpcError::Protocol(format!("failed to encode request: {e}")))?;

        let raw = self.round_trip(body).await?;

        let resp: JsonRpcResponse = serde_json::from_slice(&raw)?;
        if let Some(err) = &resp.error {
            return Err(RpcError::Node(format!(
                "received an error message from node: {err}"
            )));
        }
        Ok(resp)
    }

    /// True HTTP batch: all requests go out as one JSON array in one POST.
    ///
    /// Elements are returned as decoded, order preserved; a node-reported
    /// error inside an element does not fail the batch — inspect each via
    /// [`JsonRpcResponse::into_result`].
    async fn send_batch(
        &self,
        reqs: Vec<JsonRpcRequest>,
    ) -> Result<Vec<JsonRpcResponse>, RpcError> {
        if reqs.is_empty() {
            return Ok(vec![]);
        }
        let body = serde_json::to_vec(&reqs)
            .map_err(|e| RpcError::Protocol(format!("failed to encode batch: {e}")))?;

        let raw = self.round_trip(body).await?;

        let batch: Vec<JsonRpcResponse> = serde_json::from_slice(&raw)?;
        Ok(batch)
    }

    fn url(&self) -> &str {
        &self.url
    }
}
