//! Directory listing parser
//!
//! Parses the table smbclient prints for `ls`:
//!
//! ```text
//!   .                                   D        0  Mon Jan  6 10:00:00 2020
//!   report final.txt                    A     1204  Tue Feb  4 09:12:45 2020
//!
//!         65535 blocks of size 1024. 1234 blocks available
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix marking a date that could not be parsed
pub const UNPARSED_MARKER: &str = "!!";

/// Leading space, name, optional D/A/H flag, size, date
static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\w.\-?!\s]+\s+[DAH]?\s+\d+\s+.+$").expect("Entry line regex is valid")
});

/// Column separator: the name may contain single spaces, columns never do
static COLUMN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("Column gap regex is valid"));

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Entries of one listing, keyed by name
pub type Listing = BTreeMap<String, Entry>;

/// Kind of a listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// Modification time of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modified {
    At(NaiveDateTime),
    /// Date text that did not parse, prefixed with [`UNPARSED_MARKER`]
    Unparsed(String),
}

impl Modified {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::At(at) => Some(*at),
            Self::Unparsed(_) => None,
        }
    }
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Modified,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Parse `ls` output; lines that are not entries are skipped and a later
/// entry with the same name replaces an earlier one
pub fn parse_listing(raw: &str) -> Listing {
    let mut listing = Listing::new();
    for entry in raw.lines().filter_map(parse_entry) {
        listing.insert(entry.name.clone(), entry);
    }
    listing
}

fn parse_entry(line: &str) -> Option<Entry> {
    if !ENTRY_LINE.is_match(line) {
        return None;
    }

    let mut columns = COLUMN_GAP.split(line.trim_start()).peekable();
    let name = columns.next()?.trim_end().to_string();

    let flag = match columns.peek() {
        Some(column) if is_flag(column) => columns.next(),
        _ => None,
    };
    let kind = match flag {
        Some(flag) if flag.starts_with('D') => EntryKind::Directory,
        _ => EntryKind::File,
    };

    let size = match columns.next()?.trim().parse() {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(line = %line, error = %e, "Skipping listing line with bad size");
            return None;
        }
    };

    let date = columns.collect::<Vec<_>>().join(" ");

    Some(Entry {
        name,
        kind,
        size,
        modified: parse_modified(&date),
    })
}

/// Attribute column such as `D`, `A` or `DH`
fn is_flag(column: &str) -> bool {
    !column.is_empty() && column.chars().all(|c| c.is_ascii_alphabetic())
}

/// Parse smbclient's `Mon Jan  6 10:00:00 2020` style date
///
/// The weekday is dropped before parsing; smbclient's value is not checked
/// against the date.
fn parse_modified(date: &str) -> Modified {
    let mut words: Vec<&str> = date.split_whitespace().collect();
    if words.first().is_some_and(|w| WEEKDAYS.contains(w)) {
        words.remove(0);
    }
    let normalized = words.join(" ");

    NaiveDateTime::parse_from_str(&normalized, "%b %d %H:%M:%S %Y")
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S"))
        .map(Modified::At)
        .unwrap_or_else(|_| Modified::Unparsed(format!("{UNPARSED_MARKER}{date}")))
}

/// Whether `name` is `.`, `..` or any other run of dots
pub(crate) fn is_dot_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '.')
}
