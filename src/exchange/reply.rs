//! Turning an endpoint response into the assistant's text
//!
//! Each fallback step is its own function so the precedence chain can be
//! read (and tested) one link at a time.

use crate::transport::TransportResponse;
use serde_json::Value;
use thiserror::Error;

/// Placeholder when a success body carries neither `text` nor `message`
pub const NO_RESPONSE: &str = "No response";

/// What the endpoint said, as an assistant turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answered(String),
    Rejected { status: u16, message: String },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answered(text) => text,
            Reply::Rejected { message, .. } => message,
        }
    }
}

/// A success status whose body is not JSON
#[derive(Debug, Error)]
#[error("Success response is not valid JSON: {0}")]
pub struct UnreadableReply(#[from] serde_json::Error);

pub fn interpret(response: &TransportResponse) -> Result<Reply, UnreadableReply> {
    if response.is_success() {
        Ok(Reply::Answered(success_text(&response.body)?))
    } else {
        Ok(Reply::Rejected {
            status: response.status,
            message: rejection_message(response.status, &response.body),
        })
    }
}

/// `text`, else `message`, else [`NO_RESPONSE`]
pub fn success_text(body: &str) -> Result<String, UnreadableReply> {
    let value: Value = serde_json::from_str(body)?;
    Ok(text_field(&value)
        .or_else(|| message_field(&value))
        .unwrap_or_else(|| NO_RESPONSE.to_string()))
}

pub fn text_field(value: &Value) -> Option<String> {
    string_field(value, "text")
}

pub fn message_field(value: &Value) -> Option<String> {
    string_field(value, "message")
}

fn string_field(value: &Value, name: &str) -> Option<String> {
    value.get(name)?.as_str().map(str::to_string)
}

/// JSON `error`, else the raw body, else a generic status-tagged message.
/// Never fails, whatever the body holds.
pub fn rejection_message(status: u16, body: &str) -> String {
    error_field(body)
        .or_else(|| raw_body(body))
        .unwrap_or_else(|| generic_failure(status))
}

pub fn error_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

pub fn raw_body(body: &str) -> Option<String> {
    (!body.trim().is_empty()).then(|| body.to_string())
}

pub fn generic_failure(status: u16) -> String {
    format!("Error occurred (HTTP {status}): response body could not be parsed")
}
