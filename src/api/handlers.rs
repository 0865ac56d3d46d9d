//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, PreferencesResponse, TopicsResponse,
};
use super::AppState;
use crate::catalog::ConversationTopic;
use crate::exchange::{ConversationView, ExchangeError, TransitionError};
use crate::preferences::{Preferences, PreferencesUpdate};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Catalog
        .route("/api/topics", get(list_topics))
        // Preferences
        .route("/api/preferences", get(get_preferences))
        // Conversation lifecycle
        .route("/api/conversations/:id", get(get_conversation))
        .route("/api/conversations/:id/chat", post(send_chat))
        .route("/api/conversations/:id/reset", post(reset_conversation))
        .route(
            "/api/conversations/:id/preferences",
            put(update_preferences),
        )
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

fn find_topic(state: &AppState, id: &str) -> Result<ConversationTopic, AppError> {
    state
        .catalog
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Unknown conversation: {id}")))
}

// ============================================================
// Catalog & Preferences
// ============================================================

async fn list_topics(State(state): State<AppState>) -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: state.catalog.topics().to_vec(),
    })
}

async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.preferences())
}

// ============================================================
// Conversations
// ============================================================

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationView>, AppError> {
    let topic = find_topic(&state, &id)?;
    let view = state
        .controller
        .open(&id, &topic, &state.preferences())?;
    Ok(Json(view))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let topic = find_topic(&state, &id)?;
    state
        .controller
        .ensure_open(&id, &topic, &state.preferences())?;

    let result = state.controller.submit(&id, &req.text).await?;

    Ok(Json(ChatResponse {
        outcome: result.outcome,
        conversation: result.conversation,
    }))
}

async fn reset_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationView>, AppError> {
    let topic = find_topic(&state, &id)?;
    let view = state
        .controller
        .reset(&id, &topic, &state.preferences())?;
    Ok(Json(view))
}

async fn update_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let topic = find_topic(&state, &id)?;
    let current = state.preferences();
    let next = current.apply(&update);

    // Stored first: a failed write must leave the conversation untouched
    state
        .preference_store
        .save(&next)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let conversation = match state
        .controller
        .apply_preferences(&id, &topic, &current, &next)
    {
        Ok(conversation) => conversation,
        Err(e) => {
            if let Err(restore) = state.preference_store.save(&current) {
                tracing::error!(error = %restore, "Failed to restore preferences");
            }
            return Err(e.into());
        }
    };
    state.set_preferences(next);

    tracing::info!(
        conversation_id = %id,
        response_style = next.response_style.as_str(),
        font_size = next.font_size,
        "Preferences updated"
    );

    Ok(Json(PreferencesResponse {
        preferences: next,
        conversation,
    }))
}

async fn get_version() -> &'static str {
    concat!("specialist-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ExchangeError> for AppError {
    fn from(e: ExchangeError) -> Self {
        match e {
            ExchangeError::BlankInput | ExchangeError::NotPrimed => {
                AppError::BadRequest(e.to_string())
            }
            ExchangeError::Transition(TransitionError::Busy) => AppError::Conflict(e.to_string()),
            ExchangeError::Transition(TransitionError::InvalidTransition(_))
            | ExchangeError::Store(_)
            | ExchangeError::Interrupted(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
