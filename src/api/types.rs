//! API request and response types

use crate::catalog::ConversationTopic;
use crate::exchange::{ConversationView, SubmitOutcome};
use crate::preferences::Preferences;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response with the catalog of topics
#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<ConversationTopic>,
}

/// Response for a resolved submission
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub outcome: SubmitOutcome,
    pub conversation: ConversationView,
}

/// Response after a preference change
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub preferences: Preferences,
    pub conversation: ConversationView,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
