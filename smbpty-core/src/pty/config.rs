//! PTY configuration

use std::path::PathBuf;

/// Environment variable overriding the client command ("command arg1 arg2")
pub const CLIENT_ENV: &str = "SMBPTY_CLIENT";

/// Configuration for spawning the client in a PTY
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Path to the client binary (defaults to "smbclient", can be overridden via SMBPTY_CLIENT)
    pub client_path: PathBuf,
    /// Arguments placed before the connection arguments (from SMBPTY_CLIENT if it contains spaces)
    pub client_args: Vec<String>,
    /// Initial terminal columns
    pub initial_cols: u16,
    /// Initial terminal rows
    pub initial_rows: u16,
}

impl PtyConfig {
    /// Build a config from a "command arg1 arg2" string
    pub fn from_command_line(command: &str) -> Self {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let (client_path, client_args) = match parts.split_first() {
            Some((program, args)) => (
                PathBuf::from(program),
                args.iter().map(|s| s.to_string()).collect(),
            ),
            None => (PathBuf::from("smbclient"), Vec::new()),
        };

        Self {
            client_path,
            client_args,
            initial_cols: 120,
            initial_rows: 40,
        }
    }
}

impl Default for PtyConfig {
    fn default() -> Self {
        let command = std::env::var(CLIENT_ENV).unwrap_or_else(|_| "smbclient".to_string());
        let config = Self::from_command_line(&command);

        tracing::debug!(
            client_path = %config.client_path.display(),
            client_args = ?config.client_args,
            "PtyConfig initialized"
        );

        config
    }
}
