//! Exchange state types

use serde::{Deserialize, Serialize};

/// Where a conversation is in its request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeState {
    /// No request outstanding
    #[default]
    Idle,

    /// One request in flight; the only state the remote call happens in
    Submitting,

    /// The endpoint answered (success or server-reported error)
    Settled,

    /// The endpoint could not be reached or its answer could not be used
    Failed,
}

impl ExchangeState {
    /// True while a submission is unresolved
    pub fn is_busy(self) -> bool {
        !matches!(self, ExchangeState::Idle)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeState::Idle => "idle",
            ExchangeState::Submitting => "submitting",
            ExchangeState::Settled => "settled",
            ExchangeState::Failed => "failed",
        }
    }
}
