//! Remote inference endpoint boundary
//!
//! The endpoint is opaque: one `POST /chat` carrying the new message and the
//! transport history. Status and raw body are handed back untouched; deciding
//! what they mean is the exchange controller's job.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransport;

use crate::session::TransportTurn;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Body of the single request issued per submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub chat: String,
    pub history: Vec<TransportTurn>,
}

/// Status and body of whatever the endpoint answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Issue exactly one request; no retry, no timeout
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError>;

    /// Base URL the transport talks to
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for chat transports
pub struct LoggingTransport {
    inner: Arc<dyn ChatTransport>,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn ChatTransport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ChatTransport for LoggingTransport {
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    status = response.status,
                    history_len = request.history.len(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Chat request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
