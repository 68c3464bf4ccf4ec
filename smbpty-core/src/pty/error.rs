//! PTY error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PtyError {
    #[error("Failed to create PTY: {0}")]
    CreateFailed(String),

    #[error("Failed to spawn process: {0}")]
    SpawnFailed(String),

    #[error("Client binary not found: {0}")]
    ClientNotFound(String),

    /// The pattern did not show up before the deadline.
    #[error("Timed out waiting for output")]
    Timeout { captured: String },

    /// The subprocess closed its side of the terminal.
    #[error("Terminal closed")]
    Closed { captured: String },

    #[error("PTY I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PtyError {
    /// Output read before the wait gave up, if any
    pub fn captured(&self) -> Option<&str> {
        match self {
            Self::Timeout { captured } | Self::Closed { captured } => Some(captured),
            _ => None,
        }
    }
}
