//! PTY backend trait and implementations
//!
//! This module provides a trait-based abstraction for PTY backends,
//! allowing for different implementations (real PTY vs scripted for testing).

use std::path::PathBuf;

use portable_pty::{CommandBuilder, PtySize, native_pty_system};

use super::terminal::{PtyTerminal, Terminal};
use super::{PtyConfig, PtyError};

/// Trait for PTY backend implementations
pub trait PtyBackend: Send + Sync {
    /// Spawn the client with the given connection arguments
    ///
    /// `args` follow any arguments the backend itself prepends.
    fn spawn(&self, args: &[String]) -> Result<Box<dyn Terminal>, PtyError>;
}

/// Locate the configured client binary on PATH
pub fn check_installation(config: &PtyConfig) -> Option<PathBuf> {
    which::which(&config.client_path).ok()
}

/// Real PTY backend using portable_pty
pub struct RealPtyBackend {
    config: PtyConfig,
}

impl RealPtyBackend {
    /// Create a new real PTY backend
    pub fn new(config: PtyConfig) -> Self {
        Self { config }
    }

    /// Configuration this backend spawns with
    pub fn config(&self) -> &PtyConfig {
        &self.config
    }
}

impl Default for RealPtyBackend {
    fn default() -> Self {
        Self::new(PtyConfig::default())
    }
}

impl PtyBackend for RealPtyBackend {
    fn spawn(&self, args: &[String]) -> Result<Box<dyn Terminal>, PtyError> {
        let program = check_installation(&self.config).ok_or_else(|| {
            PtyError::ClientNotFound(self.config.client_path.display().to_string())
        })?;

        tracing::info!(
            command = %program.display(),
            cols = self.config.initial_cols,
            rows = self.config.initial_rows,
            "Spawning client in PTY"
        );

        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows: self.config.initial_rows,
                cols: self.config.initial_cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| PtyError::CreateFailed(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&program);
        for arg in self.config.client_args.iter().chain(args) {
            cmd.arg(arg);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| PtyError::SpawnFailed(e.to_string()))?;

        // The reader only sees EOF once no slave handle is left on our side
        drop(pair.slave);

        let terminal = PtyTerminal::new(pair.master, child)?;
        tracing::debug!(pid = ?terminal.process_id(), "Client spawned");

        Ok(Box::new(terminal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_backend_rejects_missing_binary() {
        let backend = RealPtyBackend::new(PtyConfig::from_command_line(
            "/nonexistent/smbclient-binary",
        ));
        let result = backend.spawn(&["//127.0.0.1/share".to_string()]);
        assert!(matches!(result, Err(PtyError::ClientNotFound(_))));
    }

    #[test]
    fn check_installation_misses_unknown_binary() {
        let config = PtyConfig::from_command_line("definitely-not-a-real-smb-client");
        assert!(check_installation(&config).is_none());
    }
}
