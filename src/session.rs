//! Session store
//!
//! Owns the per-conversation record (system prompt + transport history) and
//! the mapping between the stored transport format and what the UI renders.
//! Only the transport history is persisted; the display projection is
//! rebuilt from it every time.

mod projection;
mod prompt;
mod types;

#[cfg(test)]
mod proptests;

pub use projection::{is_blank, project_to_display, project_to_transport};
pub use prompt::{acknowledgment, build_system_prompt, greeting};
pub use types::*;

use crate::catalog::ConversationTopic;
use crate::preferences::Preferences;
use crate::store::{history_key, system_prompt_key, KeyValueStore, StoreResult};
use thiserror::Error;

/// Why a stored record could not be used
#[derive(Debug, Error)]
enum CorruptRecord {
    #[error("history is not a list of turns: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("history is empty")]
    Empty,
}

enum StoredRecord {
    Missing,
    Corrupt(CorruptRecord),
    Valid(SessionRecord),
}

fn parse_history(raw: &str) -> Result<TransportHistory, CorruptRecord> {
    let history: TransportHistory = serde_json::from_str(raw)?;
    if history.is_empty() {
        return Err(CorruptRecord::Empty);
    }
    Ok(history)
}

pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open a conversation, priming a fresh record when none is usable.
    ///
    /// Corrupt stored data is replaced silently; only backend failures are
    /// returned as errors.
    pub fn load_or_initialize(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        preferences: &Preferences,
    ) -> StoreResult<LoadedSession> {
        match self.read_record(conversation_id)? {
            StoredRecord::Valid(record) => Ok(LoadedSession {
                messages: project_to_display(&record.history),
                system_prompt: record.system_prompt,
            }),
            StoredRecord::Missing => self.initialize(conversation_id, topic, preferences),
            StoredRecord::Corrupt(reason) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    reason = %reason,
                    "Stored session unusable, reinitializing"
                );
                self.initialize(conversation_id, topic, preferences)
            }
        }
    }

    /// Replace the record unconditionally, re-priming from the current response style
    pub fn reset(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        preferences: &Preferences,
    ) -> StoreResult<LoadedSession> {
        tracing::info!(
            conversation_id = %conversation_id,
            response_style = preferences.response_style.as_str(),
            "Resetting session"
        );
        self.initialize(conversation_id, topic, preferences)
    }

    /// Overwrite prompt and history together in one write
    pub fn persist(
        &self,
        conversation_id: &str,
        system_prompt: &str,
        history: &[TransportTurn],
    ) -> StoreResult<()> {
        let history_json = serde_json::to_string(history)?;
        let history_key = history_key(conversation_id);
        let prompt_key = system_prompt_key(conversation_id);
        self.store.set_many(&[
            (history_key.as_str(), history_json.as_str()),
            (prompt_key.as_str(), system_prompt),
        ])
    }

    /// Fresh read of the stored history; unusable data reads as empty
    pub fn read_history(&self, conversation_id: &str) -> StoreResult<TransportHistory> {
        let Some(raw) = self.store.get(&history_key(conversation_id))? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Stored history unreadable, sending without it"
                );
                Ok(Vec::new())
            }
        }
    }

    fn read_record(&self, conversation_id: &str) -> StoreResult<StoredRecord> {
        let raw_history = self.store.get(&history_key(conversation_id))?;
        let system_prompt = self.store.get(&system_prompt_key(conversation_id))?;

        let (Some(raw_history), Some(system_prompt)) = (raw_history, system_prompt) else {
            return Ok(StoredRecord::Missing);
        };

        Ok(match parse_history(&raw_history) {
            Ok(history) => StoredRecord::Valid(SessionRecord {
                system_prompt,
                history,
            }),
            Err(reason) => StoredRecord::Corrupt(reason),
        })
    }

    fn initialize(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        preferences: &Preferences,
    ) -> StoreResult<LoadedSession> {
        let system_prompt = build_system_prompt(topic, preferences.response_style);
        let history = vec![TransportTurn::model(acknowledgment(topic))];
        self.persist(conversation_id, &system_prompt, &history)?;

        tracing::debug!(conversation_id = %conversation_id, topic = %topic.id, "Session primed");

        Ok(LoadedSession {
            system_prompt,
            messages: vec![DisplayMessage::assistant(greeting(topic))],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::Brevity;
    use crate::store::SqliteStore;

    fn law() -> ConversationTopic {
        ConversationTopic {
            id: "law".to_string(),
            title: "Law".to_string(),
            description: "Legal questions".to_string(),
            instruction: "Explain legal concepts plainly".to_string(),
            icon: String::new(),
        }
    }

    fn sessions() -> (SqliteStore, SessionStore<SqliteStore>) {
        let kv = SqliteStore::open_in_memory().unwrap();
        (kv.clone(), SessionStore::new(kv))
    }

    #[test]
    fn test_initialize_on_empty_store() {
        let (_, store) = sessions();
        let loaded = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();

        assert!(loaded.system_prompt.contains("Law"));
        assert!(loaded.system_prompt.contains("balanced"));
        assert_eq!(
            loaded.messages,
            vec![DisplayMessage::assistant(
                "Hello! I'm your Law model. How can I help you today?"
            )]
        );

        let history = store.read_history("law").unwrap();
        assert_eq!(
            history,
            vec![TransportTurn::model("Initialized as Law specialist.")]
        );
    }

    #[test]
    fn test_existing_record_is_projected() {
        let (_, store) = sessions();
        let history = vec![
            TransportTurn::model("Initialized as Law specialist."),
            TransportTurn::user("Hi"),
            TransportTurn::model("Hello back"),
        ];
        store.persist("law", "stored prompt", &history).unwrap();

        let loaded = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        assert_eq!(loaded.system_prompt, "stored prompt");
        assert_eq!(loaded.messages, project_to_display(&history));
    }

    #[test]
    fn test_invalid_json_heals_like_empty_store() {
        let (kv, store) = sessions();
        kv.set_many(&[("history:law", "{oops"), ("systemPrompt:law", "old")])
            .unwrap();

        let healed = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();

        let (_, fresh_store) = sessions();
        let fresh = fresh_store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();

        assert_eq!(healed, fresh);
        assert_eq!(store.read_history("law").unwrap().len(), 1);
    }

    #[test]
    fn test_non_array_history_heals() {
        let (kv, store) = sessions();
        kv.set_many(&[("history:law", r#"{"role":"user"}"#), ("systemPrompt:law", "old")])
            .unwrap();

        let loaded = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_ne!(loaded.system_prompt, "old");
    }

    #[test]
    fn test_unknown_role_heals() {
        let (kv, store) = sessions();
        kv.set_many(&[
            ("history:law", r#"[{"role":"system","parts":[{"text":"x"}]}]"#),
            ("systemPrompt:law", "old"),
        ])
        .unwrap();

        let loaded = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        assert_ne!(loaded.system_prompt, "old");
    }

    #[test]
    fn test_empty_history_heals() {
        let (kv, store) = sessions();
        kv.set_many(&[("history:law", "[]"), ("systemPrompt:law", "old")])
            .unwrap();

        store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        assert_eq!(store.read_history("law").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_prompt_reinitializes() {
        let (kv, store) = sessions();
        kv.set_many(&[(
            "history:law",
            r#"[{"role":"model","parts":[{"text":"Initialized as Law specialist."}]},{"role":"user","parts":[{"text":"Hi"}]}]"#,
        )])
        .unwrap();

        let loaded = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(store.read_history("law").unwrap().len(), 1);
    }

    #[test]
    fn test_turn_without_parts_loads() {
        let (kv, store) = sessions();
        kv.set_many(&[
            ("history:law", r#"[{"role":"model"},{"role":"user","parts":[]}]"#),
            ("systemPrompt:law", "kept"),
        ])
        .unwrap();

        let loaded = store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        assert_eq!(loaded.system_prompt, "kept");
        assert_eq!(
            loaded.messages,
            vec![DisplayMessage::assistant(""), DisplayMessage::user("")]
        );
    }

    #[test]
    fn test_reset_ignores_valid_record_and_reprimes() {
        let (_, store) = sessions();
        store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        let mut history = store.read_history("law").unwrap();
        history.push(TransportTurn::user("Hi"));
        history.push(TransportTurn::model("Hello"));
        store.persist("law", "whatever", &history).unwrap();

        let brief = Preferences {
            response_style: Brevity::Brief,
            ..Preferences::default()
        };
        let loaded = store.reset("law", &law(), &brief).unwrap();

        assert!(loaded.system_prompt.contains("concise"));
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(store.read_history("law").unwrap().len(), 1);
    }

    #[test]
    fn test_read_history_tolerates_garbage() {
        let (kv, store) = sessions();
        assert!(store.read_history("law").unwrap().is_empty());

        kv.set_many(&[("history:law", "not json")]).unwrap();
        assert!(store.read_history("law").unwrap().is_empty());
    }

    #[test]
    fn test_persisted_format_matches_wire_shape() {
        let (kv, store) = sessions();
        store
            .persist("law", "p", &[TransportTurn::model("Initialized as Law specialist.")])
            .unwrap();

        let raw = kv.get("history:law").unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"role":"model","parts":[{"text":"Initialized as Law specialist."}]}]"#
        );
    }

    #[test]
    fn test_conversations_are_isolated() {
        let (_, store) = sessions();
        store
            .load_or_initialize("law", &law(), &Preferences::default())
            .unwrap();
        store
            .persist("other", "p", &[TransportTurn::model("a"), TransportTurn::user("b")])
            .unwrap();

        assert_eq!(store.read_history("law").unwrap().len(), 1);
        assert_eq!(store.read_history("other").unwrap().len(), 2);
    }
}
