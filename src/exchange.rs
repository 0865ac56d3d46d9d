//! Request/response lifecycle of a conversation
//!
//! `Idle → Submitting → {Settled, Failed} → Idle`, driven by a pure
//! transition function. The controller performs the I/O around it.

mod controller;
mod event;
pub mod reply;
mod state;
mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub mod testing;

pub use controller::{ConversationView, ExchangeController, ExchangeError, SubmitOutcome};
pub use event::Event;
pub use state::ExchangeState;
pub use transition::{transition, TransitionError};
