//! Session identity and request-scoped ambient state.
//!
//! Exactly one `SessionIdentity` is resolved per HTTP call (by the auth
//! middleware) and one `RequestScope` is constructed per call (by the
//! transport handler). Neither survives the call: the scope is dropped when
//! the handler returns, so no per-client state leaks into the next request
//! handled by the same worker.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// User identity derived from a validated bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub email: String,
    pub client_name: String,
}

/// Per-call ambient state visible to nested dispatch work.
///
/// The deferred-work collector is write-only during dispatch; the transport
/// drains it after the response has been framed and hands each task to the
/// runtime fire-and-forget. The protocol-version slot is written by an
/// `initialize` message within the call and read when stamping response
/// headers.
pub struct RequestScope {
    pub identity: SessionIdentity,
    protocol_version: Mutex<Option<String>>,
    deferred: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl RequestScope {
    pub fn new(identity: SessionIdentity) -> Self {
        Self {
            identity,
            protocol_version: Mutex::new(None),
            deferred: Mutex::new(Vec::new()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.identity.user_id
    }

    pub fn client_name(&self) -> &str {
        &self.identity.client_name
    }

    /// Record the protocol version negotiated by `initialize` in this call.
    pub fn set_protocol_version(&self, version: &str) {
        let mut slot = self.protocol_version.lock().expect("scope poisoned");
        *slot = Some(version.to_string());
    }

    /// The version negotiated in this call, if any message set one.
    pub fn protocol_version(&self) -> Option<String> {
        self.protocol_version.lock().expect("scope poisoned").clone()
    }

    /// Queue background work to run after the HTTP response is sent.
    pub fn defer(&self, task: BoxFuture<'static, ()>) {
        self.deferred.lock().expect("scope poisoned").push(task);
    }

    /// Number of queued deferred tasks.
    pub fn deferred_len(&self) -> usize {
        self.deferred.lock().expect("scope poisoned").len()
    }

    /// Hand all queued work to the runtime. Not awaited.
    pub fn spawn_deferred(&self) {
        let tasks: Vec<_> = self
            .deferred
            .lock()
            .expect("scope poisoned")
            .drain(..)
            .collect();
        for task in tasks {
            tokio::spawn(task);
        }
    }
}
