//! Pure state transition function

use super::{Event, ExchangeState};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A message is already being sent for this conversation")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Compute the next state. No I/O.
pub fn transition(state: ExchangeState, event: Event) -> Result<ExchangeState, TransitionError> {
    use ExchangeState::{Failed, Idle, Settled, Submitting};

    match (state, event) {
        (Idle, Event::Submit) => Ok(Submitting),
        (Submitting, Event::ResponseReceived) => Ok(Settled),
        (Submitting, Event::TransportFailed) => Ok(Failed),
        (Settled | Failed, Event::Finish) => Ok(Idle),
        (Idle, Event::ResetRequested) => Ok(Idle),

        // Single in-flight gate: no queuing, no cancellation
        (Submitting | Settled | Failed, Event::Submit | Event::ResetRequested) => {
            Err(TransitionError::Busy)
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} in {}",
            state.as_str()
        ))),
    }
}
