//! Key/value schema and key naming

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Upsert used for every write
pub const UPSERT: &str = "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

// Durable preference keys
pub const PREF_BREVITY: &str = "pref:brevity";
pub const PREF_FONT_SIZE: &str = "pref:fontSize";
pub const PREF_LETTER_SPACING: &str = "pref:letterSpacing";
pub const PREF_LINE_HEIGHT: &str = "pref:lineHeight";

/// Key holding the JSON-encoded transport history of a conversation
pub fn history_key(conversation_id: &str) -> String {
    format!("history:{conversation_id}")
}

/// Key holding the primed system prompt of a conversation
pub fn system_prompt_key(conversation_id: &str) -> String {
    format!("systemPrompt:{conversation_id}")
}
