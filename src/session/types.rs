//! Display and transport message types

use serde::{Deserialize, Serialize};

/// Role of a rendered message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Message as the UI renders it; always derived, never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub role: Role,
    pub content: String,
}

impl DisplayMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Role vocabulary of the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// One turn in the format exchanged with the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportTurn {
    pub role: TransportRole,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl TransportTurn {
    pub fn new(role: TransportRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TransportRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(TransportRole::Model, text)
    }

    /// Text of the first part, empty when there is none
    pub fn first_text(&self) -> &str {
        self.parts
            .first()
            .and_then(|part| part.text.as_deref())
            .unwrap_or("")
    }
}

/// Chronological turns; the first is always the priming acknowledgment
pub type TransportHistory = Vec<TransportTurn>;

/// Everything persisted for one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub system_prompt: String,
    pub history: TransportHistory,
}

/// Result of opening a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSession {
    pub system_prompt: String,
    pub messages: Vec<DisplayMessage>,
}
