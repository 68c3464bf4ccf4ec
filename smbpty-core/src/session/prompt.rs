//! smbclient prompt recognition

use std::sync::LazyLock;

use regex::Regex;

/// A line starting with `smb:` and ending in `\>`, e.g. `smb: \docs\>`
pub const PROMPT_PATTERN: &str = r"(?m)^smb:.*\\>";

pub(crate) static PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PROMPT_PATTERN).expect("Prompt pattern regex is valid"));

pub(crate) static PROMPT_BYTES: LazyLock<regex::bytes::Regex> = LazyLock::new(|| {
    regex::bytes::Regex::new(PROMPT_PATTERN).expect("Prompt pattern regex is valid")
});

/// Whether `line` is an smbclient prompt
pub fn is_prompt_line(line: &str) -> bool {
    PROMPT.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_prompt_matches() {
        assert!(is_prompt_line("smb: \\> "));
    }

    #[test]
    fn nested_prompt_matches() {
        assert!(is_prompt_line("smb: \\projects\\2024\\>\r"));
    }

    #[test]
    fn echoed_command_is_not_a_prompt() {
        assert!(!is_prompt_line(" del \"report.txt\"\r"));
        assert!(!is_prompt_line("NT_STATUS_NO_SUCH_FILE listing \\*"));
    }

    #[test]
    fn prompt_must_start_the_line() {
        assert!(!is_prompt_line("text smb: \\>"));
    }
}
