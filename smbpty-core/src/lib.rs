//! smbpty-core: drive an interactive smbclient session through a PTY
//!
//! This crate spawns `smbclient` in a pseudo-terminal, types commands into it
//! and turns its human-oriented output into typed results:
//!
//! - **Session** - [`Session`] owns the subprocess, performs the handshake and
//!   sends every command through one expect primitive
//! - **Client** - [`SmbClient`] offers `ls`, `cd`, `get`, `put`,
//!   `put_content`, `del` and recursive `rmdir`
//! - **Parsing** - [`parse_listing`] and the `classify_*` functions interpret
//!   smbclient's output
//! - **PTY backends** - [`pty::RealPtyBackend`] for real sessions,
//!   [`pty::MockPtyBackend`] for scripted tests
//!
//! # Quick Start
//!
//! ```no_run
//! use smbpty_core::{ClientOptions, SmbClient};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ClientOptions::new("nas.local", "public")
//!         .with_user("alice")
//!         .with_password("secret");
//!     let mut client = SmbClient::connect(options)?;
//!
//!     if let Ok(listing) = client.ls("*") {
//!         for (name, entry) in &listing {
//!             println!("{name} {:?} {}", entry.kind, entry.size);
//!         }
//!     }
//!
//!     let response = client.del("reports/2019/old.csv");
//!     if response.is_failure() {
//!         eprintln!("delete failed: {}", response.message());
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    SmbClient                     │
//! │   wrap ─► Session::ask ─► classify / parse       │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │                 Session                    │  │
//! │  │  ┌───────────────┐  ┌──────────────────┐   │  │
//! │  │  │   PTY Master  │  │ smbclient process│   │  │
//! │  │  │  (portable)   │  │                  │   │  │
//! │  │  └───────────────┘  └──────────────────┘   │  │
//! │  └────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pty;
pub mod session;

// Re-export key types for convenience
pub use client::{
    Entry, EntryKind, Listing, Modified, Outcome, Response, SmbClient, Transfer,
    classify_navigation, classify_structural, classify_transfer, parse_listing, wrap,
};
pub use config::{ClientOptions, NO_PASSWORD};
pub use error::SmbError;
pub use pty::PtyError;
pub use session::{PROMPT_PATTERN, Session, SessionState};
