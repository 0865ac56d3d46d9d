//! Startup configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1";
pub const DEFAULT_API_PORT: &str = "9000";
pub const DEFAULT_LISTEN_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base of the remote inference endpoint, `{url}:{port}`
    pub endpoint: String,
    /// SQLite file holding durable preferences
    pub prefs_path: PathBuf,
    /// Catalog override; the embedded catalog is used when absent
    pub catalog_path: Option<PathBuf>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var("CHAT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_port = var("CHAT_API_PORT").unwrap_or_else(|| DEFAULT_API_PORT.to_string());
        let endpoint = format!("{}:{}", api_url.trim_end_matches('/'), api_port.trim());

        let prefs_path = var("CHAT_PREFS_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.specialist-chat/preferences.db"))
            },
            PathBuf::from,
        );

        let port = var("CHAT_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_LISTEN_PORT);

        Self {
            endpoint,
            prefs_path,
            catalog_path: var("CHAT_CATALOG_PATH").map(PathBuf::from),
            port,
        }
    }
}
