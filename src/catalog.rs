//! Conversation topic catalog
//!
//! Read-only lookup of the topics a conversation can be about. The default
//! catalog is embedded in the binary; a JSON file can replace it at startup.

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets"]
struct Assets;

const DEFAULT_CATALOG: &str = "chat_options.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Embedded catalog missing: {0}")]
    MissingAsset(&'static str),
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One topic a conversation can be specialized in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTopic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub icon: String,
}

/// Static catalog keyed by topic id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "chats")]
    topics: Vec<ConversationTopic>,
}

impl Catalog {
    /// Load the catalog compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        let file = Assets::get(DEFAULT_CATALOG).ok_or(CatalogError::MissingAsset(DEFAULT_CATALOG))?;
        Ok(serde_json::from_slice(&file.data)?)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn find(&self, id: &str) -> Option<&ConversationTopic> {
        self.topics.iter().find(|topic| topic.id == id)
    }

    pub fn topics(&self) -> &[ConversationTopic] {
        &self.topics
    }
}
