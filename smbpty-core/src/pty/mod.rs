//! PTY-backed terminal for the smbclient subprocess
//!
//! Spawns the client in a pseudo-terminal so its interactive, line-buffered
//! output can be read incrementally and matched against the prompt.

mod backend;
mod buffer;
mod config;
mod error;
mod mock;
mod terminal;

pub use backend::{PtyBackend, RealPtyBackend, check_installation};
pub use buffer::{DEFAULT_CAPACITY, ExpectBuffer};
pub use config::PtyConfig;
pub use error::PtyError;
pub use mock::{MOCK_PROMPT, MockPtyBackend, ScriptedTerminal, SentLog};
pub use terminal::{PtyTerminal, Terminal};
