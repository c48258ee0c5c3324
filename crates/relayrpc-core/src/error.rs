//! Transport-level error types.

use thiserror::Error;

/// Message used when a delegate rejects a call without giving a reason.
pub const DEFAULT_REJECTION_REASON: &str = "rejected from delegate";

/// Errors that can occur during an RPC round trip.
///
/// Every failure is scoped to its single in-flight call; nothing is retried
/// internally.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Malformed request, detected before any network activity
    /// (missing method name, body encoding failure).
    #[error("invalid request: {0}")]
    Protocol(String),

    /// The network stack reported a failure (DNS, connection refused or
    /// reset, network-layer timeout, non-success HTTP status).
    #[error("transport error: {0}")]
    Transport(String),

    /// The HTTP exchange succeeded but the payload is unusable: empty body,
    /// or an error object reported by the node.
    #[error("node error: {0}")]
    Node(String),

    /// Response bytes do not parse as a JSON-RPC response or response batch.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An external delegate rejected the call while it was in flight.
    /// The underlying network task is cancelled alongside.
    #[error("call rejected: {0}")]
    Security(String),
}

impl RpcError {
    /// Build a `Security` error, falling back to the default reason.
    pub fn security(reason: Option<&str>) -> Self {
        Self::Security(reason.unwrap_or(DEFAULT_REJECTION_REASON).to_string())
    }

    /// Returns `true` if this call was rejected by a delegate.
    pub fn is_security(&self) -> bool {
        matches!(self, Self::Security(_))
    }

    /// Returns `true` if the failure came from the node's payload rather
    /// than the network path.
    pub fn is_node_error(&self) -> bool {
        matches!(self, Self::Node(_))
    }
}
