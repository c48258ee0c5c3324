//! Pending-call registry: tracks every in-flight network operation so a
//! delegate (e.g. a TLS trust validator) can reject a specific call while it
//! is still on the wire.
//!
//! Resolution is single-shot by construction: an entry's resolver can only
//! be taken by removing the entry, so whichever path removes it first —
//! normal completion or external rejection — owns the outcome, and the loser
//! of the race finds nothing to resolve.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::AbortHandle;
use tokio::sync::oneshot;

use crate::error::RpcError;

/// Raw outcome of one network round trip: response body bytes or a failure.
pub type RawOutcome = Result<Vec<u8>, RpcError>;

/// Opaque identity of one in-flight network operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(u64);

impl CallId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

struct PendingEntry {
    resolver: oneshot::Sender<RawOutcome>,
    abort: AbortHandle,
}

struct Inner {
    entries: Mutex<HashMap<CallId, PendingEntry>>,
    next_id: AtomicU64,
}

/// Registry of in-flight calls, shared between the transport and any
/// delegate that may need to reject one.
///
/// Cloning the handle shares the underlying map. The registry is owned by
/// the transport that created it — it is never process-global, so two
/// transports never see each other's calls.
#[derive(Clone)]
pub struct PendingCalls {
    inner: Arc<Inner>,
}

impl Default for PendingCalls {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingCalls {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Track a new in-flight call. The resolver receives the raw outcome;
    /// the abort handle cancels the network task on external rejection.
    ///
    /// Must be called before the network task is spawned so the identity is
    /// visible to delegates for the full duration of the call.
    pub fn register(
        &self,
        resolver: oneshot::Sender<RawOutcome>,
        abort: AbortHandle,
    ) -> CallId {
        let id = CallId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .entries
            .lock()
            .unwrap()
            .insert(id, PendingEntry { resolver, abort });
        tracing::debug!(%id, "registered in-flight call");
        id
    }

    /// Resolve a call with the outcome of its network round trip and drop
    /// it from the registry. Returns `false` if the entry is already gone
    /// (resolved by an earlier completion or a delegate rejection); the
    /// outcome is discarded in that case.
    pub fn complete(&self, id: CallId, outcome: RawOutcome) -> bool {
        let entry = self.inner.entries.lock().unwrap().remove(&id);
        match entry {
            Some(e) => {
                // Receiver may have been dropped by the caller; nothing to do.
                let _ = e.resolver.send(outcome);
                true
            }
            None => {
                tracing::debug!(%id, "stale completion ignored");
                false
            }
        }
    }

    /// Reject a call from outside the transport: fail its future with a
    /// `Security` error and cancel the underlying network task.
    ///
    /// Unknown identities are a silent no-op — the call may have completed
    /// a moment earlier, and that race is expected.
    pub fn reject_and_cancel(&self, id: CallId, reason: Option<&str>) {
        let entry = self.inner.entries.lock().unwrap().remove(&id);
        if let Some(e) = entry {
            tracing::warn!(%id, reason = reason.unwrap_or_default(), "rejecting in-flight call");
            let _ = e.resolver.send(Err(RpcError::security(reason)));
            e.abort.abort();
        }
    }

    /// Returns `true` while the call is still pending.
    pub fn contains(&self, id: CallId) -> bool {
        self.inner.entries.lock().unwrap().contains_key(&id)
    }

    /// Identities of all calls currently in flight.
    pub fn ids(&self) -> Vec<CallId> {
        self.inner.entries.lock().unwrap().keys().copied().collect()
    }

    /// Number of calls currently in flight.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().unwrap().len()
    }

    /// Returns `true` if no calls are in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
