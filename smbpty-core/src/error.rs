//! Error types for smbpty-core

use thiserror::Error;

use crate::pty::PtyError;

/// Top-level error type for smbpty-core
///
/// Only session construction surfaces these to callers; public client
/// operations fold them into a failed [`crate::Response`].
#[derive(Error, Debug)]
pub enum SmbError {
    #[error("smbclient: {0}")]
    Connection(String),

    #[error("Failed to do {command}")]
    CommandTimeout { command: String },

    #[error("Session is not connected")]
    NotConnected,

    #[error("Terminal error: {0}")]
    Pty(#[from] PtyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SmbError {
    /// Whether this is a handshake failure
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Whether a command went unanswered
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::CommandTimeout { .. })
    }
}
