//! Session lifecycle and the expect synchronizer
//!
//! A [`Session`] owns one smbclient subprocess and is the only writer to its
//! terminal.

mod lifecycle;
mod prompt;
mod state;

pub use lifecycle::Session;
pub use prompt::{PROMPT_PATTERN, is_prompt_line};
pub use state::SessionState;
