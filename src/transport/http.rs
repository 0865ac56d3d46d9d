//! reqwest-backed transport for the remote `/chat` endpoint

use super::{ChatRequest, ChatTransport, TransportError, TransportResponse};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

const CHAT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

pub struct HttpTransport {
    client: Client,
    endpoint: String,
    chat_url: String,
}

impl HttpTransport {
    /// `endpoint` is the scheme/host/port base, e.g. `http://127.0.0.1:9000`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let chat_url = format!("{endpoint}/chat");

        // No timeout: a hung endpoint keeps the conversation in Submitting
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            chat_url,
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<TransportResponse, TransportError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| TransportError::request(format!("Failed to encode request: {e}")))?;

        let response = self
            .client
            .post(&self.chat_url)
            .header(CONTENT_TYPE, CHAT_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TransportError::network(format!("Connection failed: {e}"))
                } else {
                    TransportError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        match response.text().await {
            Ok(body) => Ok(TransportResponse::new(status.as_u16(), body)),
            // An unreadable error body still carries a usable status
            Err(e) if !status.is_success() => {
                tracing::warn!(status = %status, error = %e, "Error body unreadable");
                Ok(TransportResponse::new(status.as_u16(), String::new()))
            }
            Err(e) => Err(TransportError::body(format!(
                "Failed to read response: {e}"
            ))),
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
