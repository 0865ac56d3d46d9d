//! Events driving the exchange state machine

/// Something that happened to a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// User submitted a message that passed validation
    Submit,
    /// Endpoint returned a response and it was stored
    ResponseReceived,
    /// Endpoint unreachable, its success body unusable, or storing failed
    TransportFailed,
    /// Outcome has been applied to the display
    Finish,
    /// Explicit reset or a response-style change
    ResetRequested,
}
