//! Command outcomes and how raw smbclient output is classified

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SmbError;
use crate::session::is_prompt_line;

/// A line starting with an NT status code, e.g. `NT_STATUS_ACCESS_DENIED deleting \a`
static STATUS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NT_[A-Z0-9_]*\s").expect("Status line regex is valid"));

static GETTING_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^getting\sfile").expect("Transfer regex is valid"));

static PUTTING_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^putting\sfile").expect("Transfer regex is valid"));

const NAME_NOT_FOUND: &str = "NT_STATUS_OBJECT_NAME_NOT_FOUND";

/// Whether a command did what it was asked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

/// Outcome of a client operation plus a short diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    outcome: Outcome,
    message: String,
}

impl Response {
    /// Classify `raw` as `outcome`, extracting the first status-code line
    /// as the message (or keeping all of `raw` when there is none)
    pub fn new(raw: &str, outcome: Outcome) -> Self {
        Self {
            outcome,
            message: extract_message(raw),
        }
    }

    pub fn success(raw: &str) -> Self {
        Self::new(raw, Outcome::Success)
    }

    pub fn failure(raw: &str) -> Self {
        Self::new(raw, Outcome::Failure)
    }

    /// Failed response describing `error`
    pub fn from_error(error: &SmbError) -> Self {
        Self::failure(&error.to_string())
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

/// First line carrying an NT status code, or the whole text
fn extract_message(raw: &str) -> String {
    raw.split('\n')
        .find(|line| STATUS_LINE.is_match(line))
        .map(|line| line.trim_end().to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Direction of a file transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Download,
    Upload,
}

/// `get`/`put`: success iff smbclient reported the transfer starting
pub fn classify_transfer(raw: &str, direction: Transfer) -> Response {
    let started = match direction {
        Transfer::Download => GETTING_FILE.is_match(raw),
        Transfer::Upload => PUTTING_FILE.is_match(raw),
    };
    if started {
        Response::success(raw)
    } else {
        Response::failure(raw)
    }
}

/// `del`/`rmdir`: success iff the line after the echoed command is a prompt
///
/// smbclient prints nothing between the echo and the next prompt when these
/// commands succeed, and an error line otherwise. This is a heuristic tied to
/// its output layout, not a documented contract.
pub fn classify_structural(raw: &str) -> Response {
    match raw.split('\n').nth(1) {
        Some(line) if is_prompt_line(line) => Response::success(raw),
        _ => Response::failure(raw),
    }
}

/// `cd`: success unless the target was not found
pub fn classify_navigation(raw: &str) -> Response {
    let joined: String = raw.split("\r\n").collect();
    if joined.contains(NAME_NOT_FOUND) {
        Response::failure(raw)
    } else {
        Response::success(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_first_status_line() {
        let raw = " del \"x\"\r\nNT_STATUS_NO_SUCH_FILE deleting remote file \\x\r\n\
                   NT_STATUS_ACCESS_DENIED later\r\nsmb: \\>";
        let response = Response::failure(raw);
        assert_eq!(
            response.message(),
            "NT_STATUS_NO_SUCH_FILE deleting remote file \\x"
        );
    }

    #[test]
    fn message_falls_back_to_raw_text() {
        let raw = " cd \"docs\"\r\nsmb: \\docs\\>";
        assert_eq!(Response::success(raw).message(), raw);
    }

    #[test]
    fn status_code_must_start_the_line() {
        let raw = "cd \\missing\\: NT_STATUS_OBJECT_NAME_NOT_FOUND\r\nsmb: \\>";
        assert_eq!(Response::failure(raw).message(), raw);
    }

    #[test]
    fn from_error_is_a_failure_with_error_text() {
        let error = SmbError::CommandTimeout {
            command: "ls \"*\"".to_string(),
        };
        let response = Response::from_error(&error);
        assert!(response.is_failure());
        assert_eq!(response.message(), "Failed to do ls \"*\"");
    }

    #[test]
    fn download_needs_getting_file_line() {
        let ok = " get \"a.txt\" \"/tmp/a.txt\"\r\ngetting file \\a.txt of size 5 as /tmp/a.txt (4.9 KiloBytes/sec)\r\nsmb: \\>";
        assert!(classify_transfer(ok, Transfer::Download).is_success());

        let missing = " get \"b.txt\" \"/tmp/b.txt\"\r\nNT_STATUS_OBJECT_NAME_NOT_FOUND opening remote file \\b.txt\r\nsmb: \\>";
        let response = classify_transfer(missing, Transfer::Download);
        assert!(response.is_failure());
        assert_eq!(
            response.message(),
            "NT_STATUS_OBJECT_NAME_NOT_FOUND opening remote file \\b.txt"
        );
    }

    #[test]
    fn upload_needs_putting_file_line() {
        let ok = " put \"/tmp/a.txt\" \"a.txt\"\r\nputting file /tmp/a.txt as \\a.txt (1.0 kb/s)\r\nsmb: \\>";
        assert!(classify_transfer(ok, Transfer::Upload).is_success());
        assert!(classify_transfer(ok, Transfer::Download).is_failure());
    }

    #[test]
    fn structural_success_when_prompt_follows_echo() {
        assert!(classify_structural(" del \"a.txt\"\r\nsmb: \\>").is_success());
    }

    #[test]
    fn structural_failure_when_error_interposed() {
        let raw = " rmdir \"full\"\r\nNT_STATUS_DIRECTORY_NOT_EMPTY removing remote directory file \\full\r\nsmb: \\>";
        let response = classify_structural(raw);
        assert!(response.is_failure());
        assert!(response.message().starts_with("NT_STATUS_DIRECTORY_NOT_EMPTY"));
    }

    #[test]
    fn structural_failure_on_single_line() {
        assert!(classify_structural("smb: \\>").is_failure());
    }

    #[test]
    fn navigation_fails_only_on_name_not_found() {
        let missing = " cd \"nope\"\r\ncd \\nope\\: NT_STATUS_OBJECT_NAME_NOT_FOUND\r\nsmb: \\>";
        assert!(classify_navigation(missing).is_failure());

        let denied = " cd \"locked\"\r\ncd \\locked\\: NT_STATUS_ACCESS_DENIED\r\nsmb: \\>";
        assert!(classify_navigation(denied).is_success());

        assert!(classify_navigation(" cd \"docs\"\r\nsmb: \\docs\\>").is_success());
    }

    #[test]
    fn navigation_sees_marker_wrapped_across_lines() {
        let wrapped = " cd \"nope\"\r\ncd \\nope\\: NT_STATUS_OBJECT_NAME_\r\nNOT_FOUND\r\nsmb: \\>";
        assert!(classify_navigation(wrapped).is_failure());
    }

    #[test]
    fn response_serializes_outcome() {
        let json = serde_json::to_string(&Response::success("ok")).unwrap();
        assert!(json.contains("\"success\""));
    }
}
