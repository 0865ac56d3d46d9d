//! Pure mappings between the transport history and the display projection

use super::types::{DisplayMessage, Role, TransportRole, TransportTurn};

pub fn turn_to_display(turn: &TransportTurn) -> DisplayMessage {
    let role = match turn.role {
        TransportRole::User => Role::User,
        TransportRole::Model => Role::Assistant,
    };
    DisplayMessage {
        role,
        content: turn.first_text().to_string(),
    }
}

/// Rebuild what the UI shows from the stored history
pub fn project_to_display(history: &[TransportTurn]) -> Vec<DisplayMessage> {
    history.iter().map(turn_to_display).collect()
}

pub fn project_to_transport(message: &DisplayMessage) -> TransportTurn {
    match message.role {
        Role::User => TransportTurn::user(message.content.clone()),
        Role::Assistant => TransportTurn::model(message.content.clone()),
    }
}

/// Input gate: absent, empty, or whitespace-only text is blank
pub fn is_blank(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.trim().is_empty())
}
