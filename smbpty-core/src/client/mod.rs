//! smbclient operations
//!
//! [`SmbClient`] is the public surface. Every operation returns a
//! [`Response`] (or a listing) instead of an error; only connecting can fail
//! with an [`SmbError`].

mod command;
mod listing;
mod navigator;
mod remove;
mod response;

use std::io::Write;
use std::path::Path;

pub use command::wrap;
pub use listing::{Entry, EntryKind, Listing, Modified, UNPARSED_MARKER, parse_listing};
pub use response::{
    Outcome, Response, Transfer, classify_navigation, classify_structural, classify_transfer,
};

use crate::config::ClientOptions;
use crate::error::SmbError;
use crate::pty::{PtyBackend, RealPtyBackend};
use crate::session::Session;

/// Prefix for temporary files staged by [`SmbClient::put_content`]
const UPLOAD_PREFIX: &str = "smbpty-upload-";

/// A connected smbclient session
pub struct SmbClient {
    session: Session,
}

impl SmbClient {
    /// Spawn smbclient and wait for its first prompt
    pub fn connect(options: ClientOptions) -> Result<Self, SmbError> {
        Self::connect_with_backend(options, &RealPtyBackend::default())
    }

    /// Like [`SmbClient::connect`], spawning through `backend`
    pub fn connect_with_backend(
        options: ClientOptions,
        backend: &dyn PtyBackend,
    ) -> Result<Self, SmbError> {
        let mut session = Session::spawn(&options, backend)?;
        session.establish()?;
        Ok(Self { session })
    }

    /// Whether the session is still usable
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// The underlying session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send a raw command line and return the output through the next prompt
    pub fn ask(&mut self, command: &str) -> Result<String, SmbError> {
        self.session.ask(command)
    }

    /// List entries matching `qualifier` (`*` for everything)
    pub fn ls(&mut self, qualifier: &str) -> Result<Listing, Response> {
        self.list(qualifier).map_err(|e| Response::from_error(&e))
    }

    /// Change the remote working directory
    pub fn cd(&mut self, dir: &str) -> Response {
        self.change_dir(dir).unwrap_or_else(|e| Response::from_error(&e))
    }

    /// Download `remote` (a `/`-separated path) to `local`
    pub fn get(&mut self, remote: &str, local: impl AsRef<Path>) -> Response {
        let local = local.as_ref().to_string_lossy().into_owned();
        self.with_file_context(remote, |client, file| {
            let raw = client.session.ask(&wrap("get", [file, local.as_str()]))?;
            Ok(classify_transfer(&raw, Transfer::Download))
        })
        .unwrap_or_else(|e| Response::from_error(&e))
    }

    /// Upload `local` to `destination`
    pub fn put(&mut self, local: impl AsRef<Path>, destination: &str) -> Response {
        self.upload(local.as_ref(), destination)
            .unwrap_or_else(|e| Response::from_error(&e))
    }

    /// Upload `content` to `destination` through a temporary local file
    ///
    /// The file is removed once the transfer finished, whatever its outcome.
    pub fn put_content(&mut self, content: impl AsRef<[u8]>, destination: &str) -> Response {
        let staged = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .tempfile()
            .and_then(|mut file| {
                file.write_all(content.as_ref())?;
                file.flush()?;
                Ok(file)
            });

        match staged {
            Ok(file) => self.put(file.path(), destination),
            Err(e) => Response::from_error(&SmbError::Io(e)),
        }
    }

    /// Delete the remote file at `path`
    pub fn del(&mut self, path: &str) -> Response {
        self.delete(path).unwrap_or_else(|e| Response::from_error(&e))
    }

    /// Delete the remote directory at `path` and everything below it
    pub fn rmdir(&mut self, path: &str) -> Response {
        self.with_file_context(path, |client, dir| client.remove_tree(dir))
            .unwrap_or_else(|e| Response::from_error(&e))
    }

    /// Tear the session down; later operations fail with "not connected"
    pub fn close(&mut self) {
        self.session.teardown();
    }

    fn list(&mut self, qualifier: &str) -> Result<Listing, SmbError> {
        let raw = self.session.ask(&wrap("ls", [qualifier]))?;
        Ok(parse_listing(&raw))
    }

    fn change_dir(&mut self, dir: &str) -> Result<Response, SmbError> {
        let raw = self.session.ask(&wrap("cd", [dir]))?;
        let response = classify_navigation(&raw);
        tracing::debug!(dir = %dir, success = response.is_success(), "cd");
        Ok(response)
    }

    fn upload(&mut self, local: &Path, destination: &str) -> Result<Response, SmbError> {
        let local = local.to_string_lossy();
        let raw = self.session.ask(&wrap("put", [&*local, destination]))?;
        Ok(classify_transfer(&raw, Transfer::Upload))
    }

    fn delete(&mut self, path: &str) -> Result<Response, SmbError> {
        self.with_file_context(path, |client, file| {
            let raw = client.session.ask(&wrap("del", [file]))?;
            Ok(classify_structural(&raw))
        })
    }
}
