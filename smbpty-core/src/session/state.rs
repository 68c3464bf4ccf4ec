//! Session state machine

use serde::{Deserialize, Serialize};

/// Connection state of a session
///
/// ```text
/// Disconnected -> Connecting -> Connected -> Closed
///                      └────────────────────^
/// ```
///
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Subprocess spawned, handshake not started
    #[default]
    Disconnected,
    /// Waiting for the first prompt
    Connecting,
    /// Prompt seen; commands may be sent
    Connected,
    /// Torn down
    Closed,
}

impl SessionState {
    /// Whether moving to `next` is allowed
    pub fn can_transition_to(self, next: Self) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (_, Closed)
        )
    }

    /// Whether commands may be sent
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    /// Whether the session has been torn down
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}
