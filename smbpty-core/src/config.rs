//! Connection options for an smbclient session

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::Span;

/// Sent in place of a password when none is configured
pub const NO_PASSWORD: &str = "--no-pass";

/// Options used to spawn and drive smbclient
///
/// Every field has a default, so the struct can be embedded in an
/// application config and only partially filled in. The password and the
/// logging span are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Workgroup or domain (`-W`)
    pub domain: String,
    /// Server address
    pub host: String,
    /// Share name
    pub share: String,
    /// User name (`-U`)
    pub user: String,
    /// Password; `None` connects with `--no-pass`
    #[serde(skip)]
    pub password: Option<SecretString>,
    /// Server port (`-p`)
    pub port: u16,
    /// Seconds to wait for a prompt, for the handshake and every command
    pub timeout_secs: u64,
    /// Span all session activity is recorded under
    #[serde(skip)]
    pub span: Option<Span>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            domain: "WORKGROUP".to_string(),
            host: "127.0.0.1".to_string(),
            share: String::new(),
            user: "guest".to_string(),
            password: None,
            port: 445,
            timeout_secs: 10,
            span: None,
        }
    }
}

impl ClientOptions {
    /// Options for `//host/share` with everything else defaulted
    pub fn new(host: impl Into<String>, share: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            share: share.into(),
            ..Default::default()
        }
    }

    /// Set the password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Record session activity under `span`
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Prompt wait as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connection arguments in smbclient's order:
    /// `//{host}/{share} {password} -W {domain} -U {user} -p {port}`
    pub fn client_args(&self) -> Vec<String> {
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_string())
            .unwrap_or_else(|| NO_PASSWORD.to_string());

        vec![
            format!("//{}/{}", self.host, self.share),
            password,
            "-W".to_string(),
            self.domain.clone(),
            "-U".to_string(),
            self.user.clone(),
            "-p".to_string(),
            self.port.to_string(),
        ]
    }

    /// Span for a session built from these options
    pub(crate) fn session_span(&self) -> Span {
        self.span.clone().unwrap_or_else(|| {
            tracing::info_span!("smb_session", host = %self.host, share = %self.share)
        })
    }
}
