//! Mock transports and stores for exercising the controller without I/O

use crate::store::{KeyValueStore, SqliteStore, StoreError, StoreResult};
use crate::transport::{ChatRequest, ChatTransport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock Transport
// ============================================================================

/// Transport that returns queued responses and records every request
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse::new(status, body)));
    }

    pub fn queue_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock response queued")))
    }

    fn endpoint(&self) -> &str {
        "mock://chat"
    }
}

// ============================================================================
// Gated Transport (for in-flight testing)
// ============================================================================

/// Transport that parks inside `send` until released
pub struct GatedTransport {
    response: TransportResponse,
    /// Signalled once the request is in flight
    pub started: Arc<Notify>,
    /// Notify to let the request complete
    pub release: Arc<Notify>,
}

impl GatedTransport {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: TransportResponse::new(status, body),
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ChatTransport for GatedTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.response.clone())
    }

    fn endpoint(&self) -> &str {
        "mock://gated"
    }
}

// ============================================================================
// Flaky Store
// ============================================================================

/// In-memory store whose writes can be switched to fail
#[derive(Clone)]
pub struct FlakyStore {
    inner: SqliteStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        self.check()?;
        self.inner.set_many(entries)
    }
}
