//! Session struct: handshake, teardown and the single expect primitive

use std::time::Duration;

use tracing::Span;

use super::prompt::PROMPT_BYTES;
use super::state::SessionState;
use crate::config::ClientOptions;
use crate::error::SmbError;
use crate::pty::{PtyBackend, PtyError, Terminal};

/// Marker smbclient prints when the server did not answer
const TIMED_OUT_MARKER: &str = "timed out";
/// Marker smbclient prints when the server shut down mid-handshake
const SERVER_STOPPED_MARKER: &str = "Server stopped";

/// One smbclient subprocess and its terminal
///
/// Session manages:
/// - The terminal the client runs in
/// - The connect handshake and teardown
/// - [`Session::ask`], through which every command is sent
pub struct Session {
    terminal: Box<dyn Terminal>,
    state: SessionState,
    timeout: Duration,
    span: Span,
    /// Command that timed out and whose prompt has not been read yet
    unanswered: Option<String>,
}

impl Session {
    /// Spawn the client through `backend` without waiting for it
    pub fn spawn(options: &ClientOptions, backend: &dyn PtyBackend) -> Result<Self, SmbError> {
        let span = options.session_span();
        let terminal = {
            let _enter = span.enter();
            backend.spawn(&options.client_args())?
        };

        Ok(Self::new(terminal, options.timeout(), span))
    }

    /// Wrap an already spawned terminal
    pub fn new(terminal: Box<dyn Terminal>, timeout: Duration, span: Span) -> Self {
        Self {
            terminal,
            state: SessionState::Disconnected,
            timeout,
            span,
            unanswered: None,
        }
    }

    /// Get current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the handshake succeeded and teardown has not run
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Prompt wait applied to the handshake and every command
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Span this session records under
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Wait for the first prompt
    ///
    /// On failure the subprocess is torn down before the error is returned.
    pub fn establish(&mut self) -> Result<(), SmbError> {
        let span = self.span.clone();
        let _enter = span.enter();

        if !self.state.can_transition_to(SessionState::Connecting) {
            return Err(SmbError::Connection(format!(
                "cannot connect from state {:?}",
                self.state
            )));
        }
        self.state = SessionState::Connecting;

        let failure = match self.terminal.expect(&PROMPT_BYTES, self.timeout) {
            Ok(greeting) => handshake_failure(&greeting),
            Err(e) => {
                let reason = handshake_failure(e.captured().unwrap_or_default())
                    .unwrap_or_else(|| match &e {
                        PtyError::Timeout { .. } | PtyError::Closed { .. } => {
                            "connection failed or timed out".to_string()
                        }
                        other => other.to_string(),
                    });
                Some(reason)
            }
        };

        if let Some(reason) = failure {
            tracing::warn!(reason = %reason, "Handshake failed");
            self.teardown();
            return Err(SmbError::Connection(reason));
        }

        self.state = SessionState::Connected;
        tracing::info!("Connected");
        Ok(())
    }

    /// Send `command` and return everything up to and including the next prompt
    ///
    /// `&mut self` keeps a second command from being written before this one's
    /// prompt has been read. After a timeout, the late prompt of the timed-out
    /// command is waited for and discarded before `command` is written; if it
    /// never comes the session is closed.
    pub fn ask(&mut self, command: &str) -> Result<String, SmbError> {
        let span = self.span.clone();
        let _enter = span.enter();

        if !self.state.is_connected() {
            return Err(SmbError::NotConnected);
        }
        if let Some(unanswered) = self.unanswered.take() {
            self.resync(unanswered)?;
        }

        tracing::debug!(command = %command, "Sending command");
        self.terminal.send_line(command)?;

        match self.terminal.expect(&PROMPT_BYTES, self.timeout) {
            Ok(response) => Ok(response),
            Err(PtyError::Timeout { captured }) => {
                tracing::error!(
                    command = %command,
                    captured = %captured,
                    "Failed to do command: no prompt before timeout"
                );
                self.unanswered = Some(command.to_string());
                Err(SmbError::CommandTimeout {
                    command: command.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read and drop the late reply to `unanswered`
    fn resync(&mut self, unanswered: String) -> Result<(), SmbError> {
        match self.terminal.expect(&PROMPT_BYTES, self.timeout) {
            Ok(late) => {
                tracing::debug!(command = %unanswered, late = %late, "Discarded late reply");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    command = %unanswered,
                    error = %e,
                    "Client never answered, closing session"
                );
                self.teardown();
                Err(match e {
                    PtyError::Timeout { .. } => SmbError::CommandTimeout {
                        command: unanswered,
                    },
                    other => other.into(),
                })
            }
        }
    }

    /// Send `quit` and mark the session closed
    ///
    /// A terminal that is already gone is not an error. Calling this again is
    /// a no-op.
    pub fn teardown(&mut self) {
        let span = self.span.clone();
        let _enter = span.enter();

        if self.state.is_closed() {
            return;
        }

        if let Err(e) = self.terminal.send_line("quit") {
            tracing::debug!(error = %e, "Client already disconnected");
        }
        self.state = SessionState::Closed;
        tracing::info!("Session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
        self.terminal.terminate();
    }
}

/// Reason the greeting shows a failed connection, if it does
fn handshake_failure(greeting: &str) -> Option<String> {
    if greeting.contains(TIMED_OUT_MARKER) {
        Some("timed out".to_string())
    } else if greeting.contains(SERVER_STOPPED_MARKER) {
        Some("server stopped".to_string())
    } else {
        None
    }
}
