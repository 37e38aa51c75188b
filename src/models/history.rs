use serde::{Deserialize, Serialize};

/// One entry in a directive's progress history.
///
/// Entries are immutable once appended; the list they live in only grows.
/// `timestamp` is kept as the minute-resolution string written at append
/// time (`YYYY-MM-DD HH:MM`) so stored history round-trips byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Name of the actor who wrote the entry.
    pub user: String,
    pub text: String,
    /// Filenames attached with this update. Always `None` for comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

/// Whether an entry is a progress narrative or a reviewer annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Update,
    Comment,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Comment => "comment",
        }
    }
}
