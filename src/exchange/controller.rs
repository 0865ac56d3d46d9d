//! Per-conversation exchange controller
//!
//! Each conversation sits behind its own short-lived mutex. The lock is taken
//! to validate and start a submission, released for the remote call, then
//! taken again to apply the outcome; it is never held across an await.

use super::reply::{self, Reply};
use super::{transition, Event, ExchangeState, TransitionError};
use crate::catalog::ConversationTopic;
use crate::preferences::Preferences;
use crate::session::{
    is_blank, project_to_display, project_to_transport, DisplayMessage, LoadedSession,
    SessionStore, TransportTurn,
};
use crate::store::{KeyValueStore, StoreError};
use crate::transport::{ChatRequest, ChatTransport, TransportError, TransportResponse};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Shown in place of an assistant reply when the exchange failed
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Error flag raised alongside the apology
pub const CONTACT_FAILURE: &str = "Failed to contact server. See logs for details.";

const STARTING_PLACEHOLDER: &str = "Starting chat session...";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Message is empty")]
    BlankInput,
    #[error("Chat session is not ready yet")]
    NotPrimed,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Exchange task ended abnormally: {0}")]
    Interrupted(String),
}

/// How a submission resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Answered,
    Rejected { status: u16 },
    Failed,
}

/// Snapshot of a conversation for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationView {
    pub conversation_id: String,
    pub title: String,
    pub messages: Vec<DisplayMessage>,
    pub state: ExchangeState,
    pub submitting: bool,
    pub input_enabled: bool,
    pub input_placeholder: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResult {
    pub outcome: SubmitOutcome,
    pub conversation: ConversationView,
}

struct Conversation {
    topic: ConversationTopic,
    system_prompt: Option<String>,
    messages: Vec<DisplayMessage>,
    state: ExchangeState,
    error: Option<String>,
}

impl Conversation {
    fn new(topic: &ConversationTopic) -> Self {
        Self {
            topic: topic.clone(),
            system_prompt: None,
            messages: Vec::new(),
            state: ExchangeState::Idle,
            error: None,
        }
    }

    fn load(&mut self, topic: &ConversationTopic, loaded: LoadedSession) {
        self.topic = topic.clone();
        self.system_prompt = Some(loaded.system_prompt);
        self.messages = loaded.messages;
        self.error = None;
    }

    fn advance(&mut self, conversation_id: &str, event: Event) {
        match transition(self.state, event) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::error!(
                    conversation_id = %conversation_id,
                    state = self.state.as_str(),
                    error = %e,
                    "Unexpected exchange transition"
                );
            }
        }
    }

    fn fail(&mut self, conversation_id: &str) {
        self.advance(conversation_id, Event::TransportFailed);
        self.messages.push(DisplayMessage::assistant(APOLOGY));
        self.error = Some(CONTACT_FAILURE.to_string());
    }

    fn view(&self, conversation_id: &str) -> ConversationView {
        let primed = self.system_prompt.is_some();
        let input_placeholder = if primed {
            format!(
                "Message about {}... (Shift+Enter for new line)",
                self.topic.title
            )
        } else {
            STARTING_PLACEHOLDER.to_string()
        };

        ConversationView {
            conversation_id: conversation_id.to_string(),
            title: self.topic.title.clone(),
            messages: self.messages.clone(),
            state: self.state,
            submitting: self.state == ExchangeState::Submitting,
            input_enabled: primed && self.state == ExchangeState::Idle,
            input_placeholder,
            error: self.error.clone(),
        }
    }
}

/// A submission that has left Idle and is waiting on the endpoint
struct PendingExchange {
    request: ChatRequest,
    system_prompt: String,
}

type ConversationHandle = Arc<Mutex<Conversation>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ExchangeController<S, T> {
    sessions: SessionStore<S>,
    transport: T,
    conversations: Mutex<HashMap<String, ConversationHandle>>,
}

impl<S: KeyValueStore, T: ChatTransport> ExchangeController<S, T> {
    pub fn new(sessions: SessionStore<S>, transport: T) -> Self {
        Self {
            sessions,
            transport,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Visit a conversation: reload it from the store unless a submission is
    /// in flight, in which case the live state is returned as is.
    pub fn open(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        preferences: &Preferences,
    ) -> Result<ConversationView, ExchangeError> {
        let handle = self.handle(conversation_id, topic);
        let mut conversation = lock(&handle);
        if !conversation.state.is_busy() {
            let loaded = self
                .sessions
                .load_or_initialize(conversation_id, topic, preferences)?;
            conversation.load(topic, loaded);
        }
        Ok(conversation.view(conversation_id))
    }

    /// Like [`open`](Self::open), but leaves an already primed conversation alone
    pub fn ensure_open(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        preferences: &Preferences,
    ) -> Result<ConversationView, ExchangeError> {
        match self.primed_view(conversation_id) {
            Some(view) => Ok(view),
            None => self.open(conversation_id, topic, preferences),
        }
    }

    /// Discard the conversation's history and re-prime it
    pub fn reset(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        preferences: &Preferences,
    ) -> Result<ConversationView, ExchangeError> {
        let handle = self.handle(conversation_id, topic);
        let mut conversation = lock(&handle);
        let next = transition(conversation.state, Event::ResetRequested)?;
        let loaded = self.sessions.reset(conversation_id, topic, preferences)?;
        conversation.state = next;
        conversation.load(topic, loaded);
        Ok(conversation.view(conversation_id))
    }

    /// React to a preference change made from this conversation. A new
    /// response style re-primes it; presentation changes leave it untouched.
    pub fn apply_preferences(
        &self,
        conversation_id: &str,
        topic: &ConversationTopic,
        current: &Preferences,
        next: &Preferences,
    ) -> Result<ConversationView, ExchangeError> {
        if current.changes_priming(next) {
            self.reset(conversation_id, topic, next)
        } else {
            self.ensure_open(conversation_id, topic, next)
        }
    }

    fn handle(&self, conversation_id: &str, topic: &ConversationTopic) -> ConversationHandle {
        lock(&self.conversations)
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new(topic))))
            .clone()
    }

    fn existing(&self, conversation_id: &str) -> Option<ConversationHandle> {
        lock(&self.conversations).get(conversation_id).cloned()
    }

    fn primed_view(&self, conversation_id: &str) -> Option<ConversationView> {
        let handle = self.existing(conversation_id)?;
        let conversation = lock(&handle);
        if conversation.system_prompt.is_some() {
            Some(conversation.view(conversation_id))
        } else {
            None
        }
    }

    fn begin(
        &self,
        handle: &ConversationHandle,
        conversation_id: &str,
        text: &str,
    ) -> Result<PendingExchange, ExchangeError> {
        let mut conversation = lock(handle);
        let system_prompt = conversation
            .system_prompt
            .clone()
            .ok_or(ExchangeError::NotPrimed)?;
        let next = transition(conversation.state, Event::Submit)?;

        let user_message = DisplayMessage::user(text.trim());
        let mut history = self.sessions.read_history(conversation_id)?;

        history.push(project_to_transport(&user_message));
        conversation.messages.push(user_message);
        conversation.state = next;
        conversation.error = None;

        tracing::info!(
            conversation_id = %conversation_id,
            history_len = history.len(),
            "Submitting message"
        );

        Ok(PendingExchange {
            request: ChatRequest {
                chat: text.to_string(),
                history,
            },
            system_prompt,
        })
    }

    fn settle(
        &self,
        handle: &ConversationHandle,
        conversation_id: &str,
        pending: PendingExchange,
        result: Result<TransportResponse, TransportError>,
    ) -> SubmitResult {
        let mut conversation = lock(handle);

        let reply = match result {
            Ok(response) => reply::interpret(&response).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let outcome = match reply {
            Ok(reply) => {
                let outcome = match &reply {
                    Reply::Answered(_) => SubmitOutcome::Answered,
                    Reply::Rejected { status, message } => {
                        tracing::warn!(
                            conversation_id = %conversation_id,
                            status = *status,
                            message = %message,
                            "Endpoint rejected message"
                        );
                        SubmitOutcome::Rejected { status: *status }
                    }
                };

                let mut history = pending.request.history;
                history.push(TransportTurn::model(reply.text()));

                match self
                    .sessions
                    .persist(conversation_id, &pending.system_prompt, &history)
                {
                    Ok(()) => {
                        conversation.advance(conversation_id, Event::ResponseReceived);
                        conversation.messages = project_to_display(&history);
                        outcome
                    }
                    Err(e) => {
                        tracing::error!(
                            conversation_id = %conversation_id,
                            error = %e,
                            "Failed to store reply"
                        );
                        conversation.fail(conversation_id);
                        SubmitOutcome::Failed
                    }
                }
            }
            Err(reason) => {
                tracing::error!(
                    conversation_id = %conversation_id,
                    error = %reason,
                    "Exchange failed"
                );
                conversation.fail(conversation_id);
                SubmitOutcome::Failed
            }
        };

        conversation.advance(conversation_id, Event::Finish);

        SubmitResult {
            outcome,
            conversation: conversation.view(conversation_id),
        }
    }
}

impl<S, T> ExchangeController<S, T>
where
    S: KeyValueStore + 'static,
    T: ChatTransport + 'static,
{
    /// Send one message and wait for its outcome.
    ///
    /// Validation failures are returned without touching any state. Once the
    /// submission starts it runs on its own task, so dropping the returned
    /// future (a disconnected client) still lets it settle back to Idle.
    pub async fn submit(
        self: &Arc<Self>,
        conversation_id: &str,
        text: &str,
    ) -> Result<SubmitResult, ExchangeError> {
        if is_blank(Some(text)) {
            return Err(ExchangeError::BlankInput);
        }
        let handle = self
            .existing(conversation_id)
            .ok_or(ExchangeError::NotPrimed)?;

        let pending = self.begin(&handle, conversation_id, text)?;

        let controller = Arc::clone(self);
        let conversation_id = conversation_id.to_string();
        let exchange = tokio::spawn(async move {
            let result = controller.transport.send(&pending.request).await;
            controller.settle(&handle, &conversation_id, pending, result)
        });

        exchange
            .await
            .map_err(|e| ExchangeError::Interrupted(e.to_string()))
    }
}
