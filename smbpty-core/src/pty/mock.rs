//! Scripted terminal for testing - no real PTY or subprocess
//!
//! Replays canned client output per command line and records every line
//! written, so session logic can be exercised deterministically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::bytes::Regex;

use super::buffer::ExpectBuffer;
use super::terminal::Terminal;
use super::{PtyBackend, PtyError};

/// Prompt printed by the scripted client
pub const MOCK_PROMPT: &str = "smb: \\> ";

/// Shared record of lines written to a [`ScriptedTerminal`]
#[derive(Clone, Default)]
pub struct SentLog(Arc<Mutex<Vec<String>>>);

impl SentLog {
    /// All lines written so far, in order
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Number of times exactly `line` was written
    pub fn count(&self, line: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|l| *l == line).count()
    }

    fn push(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

struct Rule {
    command: String,
    reply: Option<String>,
    delayed: bool,
}

/// In-memory terminal that answers commands from a script
///
/// Each rule answers one occurrence of a command, first match wins. A command
/// with no rule left echoes itself and prints the prompt, which is what
/// smbclient does when a command succeeds silently. `quit` closes the terminal.
pub struct ScriptedTerminal {
    rules: VecDeque<Rule>,
    buffer: ExpectBuffer,
    sent: SentLog,
    closed: bool,
    /// Reply held back until the first wait for it has timed out
    late: Option<String>,
}

impl ScriptedTerminal {
    /// Terminal that greets with `greeting` right after spawn
    pub fn new(greeting: &str) -> Self {
        let mut buffer = ExpectBuffer::default();
        buffer.append(greeting.as_bytes());
        Self {
            rules: VecDeque::new(),
            buffer,
            sent: SentLog::default(),
            closed: false,
            late: None,
        }
    }

    /// Terminal that greets like a freshly connected smbclient
    pub fn connected() -> Self {
        Self::new(&format!("Try \"help\" to get a list of possible commands.\r\n{MOCK_PROMPT}"))
    }

    /// Answer the next `command` with the echoed command, `output`, then the prompt
    pub fn on(mut self, command: &str, output: &str) -> Self {
        let reply = if output.is_empty() {
            format!("{command}\r\n{MOCK_PROMPT}")
        } else {
            format!("{command}\r\n{output}\r\n{MOCK_PROMPT}")
        };
        self.rules.push_back(Rule {
            command: command.to_string(),
            reply: Some(reply),
            delayed: false,
        });
        self
    }

    /// Answer the next `command` with exactly `reply`
    pub fn on_raw(mut self, command: &str, reply: &str) -> Self {
        self.rules.push_back(Rule {
            command: command.to_string(),
            reply: Some(reply.to_string()),
            delayed: false,
        });
        self
    }

    /// Never answer the next `command`
    pub fn hang_on(mut self, command: &str) -> Self {
        self.rules.push_back(Rule {
            command: command.to_string(),
            reply: None,
            delayed: false,
        });
        self
    }

    /// Answer the next `command` like [`ScriptedTerminal::on`], but only after
    /// the first wait for the reply has timed out
    pub fn slow(self, command: &str, output: &str) -> Self {
        let mut terminal = self.on(command, output);
        if let Some(rule) = terminal.rules.back_mut() {
            rule.delayed = true;
        }
        terminal
    }

    /// Handle to the record of written lines
    pub fn sent_log(&self) -> SentLog {
        self.sent.clone()
    }

    fn reply_for(&mut self, line: &str) -> Option<Rule> {
        match self.rules.iter().position(|rule| rule.command == line) {
            Some(index) => self.rules.remove(index),
            None => Some(Rule {
                command: line.to_string(),
                reply: Some(format!("{line}\r\n{MOCK_PROMPT}")),
                delayed: false,
            }),
        }
    }
}

impl Terminal for ScriptedTerminal {
    fn send_line(&mut self, line: &str) -> Result<(), PtyError> {
        if self.closed {
            return Err(PtyError::Closed {
                captured: self.buffer.take_all(),
            });
        }
        self.sent.push(line);

        if line == "quit" {
            self.closed = true;
            return Ok(());
        }
        match self.reply_for(line) {
            Some(Rule {
                reply: Some(reply),
                delayed: true,
                ..
            }) => self.late = Some(reply),
            Some(Rule { reply: Some(reply), .. }) => self.buffer.append(reply.as_bytes()),
            _ => {}
        }
        Ok(())
    }

    fn expect(&mut self, pattern: &Regex, _timeout: Duration) -> Result<String, PtyError> {
        // A miss is final, except that it releases a held-back slow reply
        match self.buffer.take_through(pattern) {
            Some(found) => Ok(found),
            None if self.closed => Err(PtyError::Closed {
                captured: self.buffer.take_all(),
            }),
            None => {
                let captured = self.buffer.take_all();
                if let Some(late) = self.late.take() {
                    self.buffer.append(late.as_bytes());
                }
                Err(PtyError::Timeout { captured })
            }
        }
    }

    fn terminate(&mut self) {
        self.closed = true;
    }
}

/// Mock PTY backend handing out one scripted terminal
pub struct MockPtyBackend {
    terminal: Mutex<Option<ScriptedTerminal>>,
    spawned_args: Mutex<Vec<String>>,
}

impl MockPtyBackend {
    /// Create a backend that spawns `terminal` on first use
    pub fn new(terminal: ScriptedTerminal) -> Self {
        Self {
            terminal: Mutex::new(Some(terminal)),
            spawned_args: Mutex::new(Vec::new()),
        }
    }

    /// Arguments passed to the last spawn
    pub fn spawned_args(&self) -> Vec<String> {
        self.spawned_args.lock().unwrap().clone()
    }
}

impl PtyBackend for MockPtyBackend {
    fn spawn(&self, args: &[String]) -> Result<Box<dyn Terminal>, PtyError> {
        tracing::info!(args = ?args, "Creating scripted terminal (no real process)");

        *self.spawned_args.lock().unwrap() = args.to_vec();
        let terminal = self
            .terminal
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| PtyError::SpawnFailed("scripted terminal already spawned".to_string()))?;

        Ok(Box::new(terminal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Regex {
        Regex::new(r"(?m)^smb:.*\\>").unwrap()
    }

    #[test]
    fn greeting_is_available_before_any_command() {
        let mut terminal = ScriptedTerminal::connected();
        let greeting = terminal.expect(&prompt(), Duration::ZERO).unwrap();
        assert!(greeting.starts_with("Try \"help\""));
    }

    #[test]
    fn rules_answer_in_order_then_fall_back_to_echo() {
        let mut terminal = ScriptedTerminal::new("")
            .on("cd \"a\"", "cd \\a\\: NT_STATUS_OBJECT_NAME_NOT_FOUND");
        let log = terminal.sent_log();

        terminal.send_line("cd \"a\"").unwrap();
        let first = terminal.expect(&prompt(), Duration::ZERO).unwrap();
        assert!(first.contains("NT_STATUS_OBJECT_NAME_NOT_FOUND"));

        terminal.send_line("cd \"a\"").unwrap();
        let second = terminal.expect(&prompt(), Duration::ZERO).unwrap();
        // The space after the first prompt stays buffered
        assert_eq!(second, " cd \"a\"\r\nsmb: \\>");

        assert_eq!(log.count("cd \"a\""), 2);
    }

    #[test]
    fn hang_on_times_out() {
        let mut terminal = ScriptedTerminal::new("").hang_on("ls \"*\"");
        terminal.send_line("ls \"*\"").unwrap();
        let result = terminal.expect(&prompt(), Duration::ZERO);
        assert!(matches!(result, Err(PtyError::Timeout { .. })));
    }

    #[test]
    fn slow_reply_arrives_after_first_timeout() {
        let mut terminal =
            ScriptedTerminal::new("").slow("get \"big.iso\"", "getting file \\big.iso");
        terminal.send_line("get \"big.iso\"").unwrap();

        let first = terminal.expect(&prompt(), Duration::ZERO);
        assert!(matches!(first, Err(PtyError::Timeout { .. })));

        let late = terminal.expect(&prompt(), Duration::ZERO).unwrap();
        assert!(late.contains("getting file"));
    }

    #[test]
    fn quit_closes_terminal() {
        let mut terminal = ScriptedTerminal::new("");
        terminal.send_line("quit").unwrap();
        assert!(matches!(
            terminal.send_line("quit"),
            Err(PtyError::Closed { .. })
        ));
    }

    #[test]
    fn backend_spawns_once() {
        let backend = MockPtyBackend::new(ScriptedTerminal::connected());
        assert!(backend.spawn(&["//host/share".to_string()]).is_ok());
        assert_eq!(backend.spawned_args(), vec!["//host/share"]);
        assert!(matches!(
            backend.spawn(&[]),
            Err(PtyError::SpawnFailed(_))
        ));
    }
}
