//! Terminal trait and the portable-pty implementation

use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use portable_pty::{Child, MasterPty};
use regex::bytes::Regex;

use super::PtyError;
use super::buffer::ExpectBuffer;

/// A line-oriented, expect-capable channel to an interactive program
///
/// Implementations are driven by exactly one owner; a second command must not
/// be written before the previous `expect` returned.
pub trait Terminal: Send {
    /// Write `line` followed by a newline
    fn send_line(&mut self, line: &str) -> Result<(), PtyError>;

    /// Read until `pattern` matches, returning everything up to and including
    /// the match. Output after the match stays buffered for the next call.
    fn expect(&mut self, pattern: &Regex, timeout: Duration) -> Result<String, PtyError>;

    /// Kill the subprocess if it is still running
    fn terminate(&mut self);
}

/// Terminal backed by a real pseudo-terminal
///
/// A reader thread drains the PTY master into a channel so `expect` can wait
/// on it with a deadline.
pub struct PtyTerminal {
    #[allow(dead_code)]
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    output: Receiver<Vec<u8>>,
    buffer: ExpectBuffer,
    eof: bool,
}

impl PtyTerminal {
    pub(crate) fn new(
        master: Box<dyn MasterPty + Send>,
        child: Box<dyn Child + Send + Sync>,
    ) -> Result<Self, PtyError> {
        let mut reader = master
            .try_clone_reader()
            .map_err(|e| PtyError::IoError(std::io::Error::other(e)))?;

        let writer = master
            .take_writer()
            .map_err(|e| PtyError::IoError(std::io::Error::other(e)))?;

        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("smbpty-reader".to_string())
            .spawn(move || {
                let mut buf = [0u8; 8192];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        // EIO once the child side hangs up
                        Err(_) => break,
                    }
                }
            })?;

        Ok(Self {
            master,
            child,
            writer,
            output: rx,
            buffer: ExpectBuffer::default(),
            eof: false,
        })
    }

    /// OS process id of the client, if known
    pub fn process_id(&self) -> Option<u32> {
        self.child.process_id()
    }
}

impl Terminal for PtyTerminal {
    fn send_line(&mut self, line: &str) -> Result<(), PtyError> {
        if self.eof {
            return Err(PtyError::Closed {
                captured: self.buffer.take_all(),
            });
        }
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn expect(&mut self, pattern: &Regex, timeout: Duration) -> Result<String, PtyError> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(found) = self.buffer.take_through(pattern) {
                return Ok(found);
            }
            if self.eof {
                return Err(PtyError::Closed {
                    captured: self.buffer.take_all(),
                });
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PtyError::Timeout {
                    captured: self.buffer.take_all(),
                });
            }

            match self.output.recv_timeout(remaining) {
                Ok(chunk) => self.buffer.append(&chunk),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.eof = true,
            }
        }
    }

    fn terminate(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            match self.child.kill() {
                Ok(()) => {
                    let _ = self.child.wait();
                }
                Err(e) => tracing::warn!(error = %e, "Failed to kill client process"),
            }
        }
    }
}

impl Drop for PtyTerminal {
    fn drop(&mut self) {
        self.terminate();
    }
}
