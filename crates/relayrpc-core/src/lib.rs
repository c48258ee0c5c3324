//! relayrpc-core — foundation traits and types for RelayRPC.
//!
//! # Overview
//!
//! RelayRPC is a JSON-RPC client transport: it posts requests (single or
//! batched) to a node over HTTP, tracks every in-flight network operation,
//! and lets an external delegate reject a specific call mid-flight. The
//! core crate defines:
//!
//! - [`RpcTransport`] — the central async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — wire types
//! - [`RpcError`] — structured error type
//! - [`PendingCalls`] / [`CallId`] — the in-flight call registry and the
//!   delegate-facing rejection path

pub mod error;
pub mod pending;
pub mod request;
pub mod transport;

pub use error::RpcError;
pub use pending::{CallId, PendingCalls, RawOutcome};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId, RpcParam};
pub use transport::RpcTransport;
