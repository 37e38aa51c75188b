//! History ledger: the only code that appends to a directive's `updates`.
//!
//! Both operations return a new [`Directive`] with one more entry, or
//! `None` when the text is blank (nothing is ever appended for blank text).
//! Existing entries are never touched, reordered or removed.

use chrono::NaiveDateTime;

use crate::models::{Directive, EntryKind, HistoryEntry};

/// Minute-resolution timestamp format used for history entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Append a progress update carrying `files`, and add those filenames to
/// the directive-level `files` list (duplicates kept).
pub fn add_update(
    directive: &Directive,
    text: &str,
    user: &str,
    files: Vec<String>,
    at: NaiveDateTime,
) -> Option<Directive> {
    if text.trim().is_empty() {
        return None;
    }

    let mut next = directive.clone();
    next.files.extend(files.iter().cloned());
    next.updates.push(HistoryEntry {
        timestamp: format_timestamp(at),
        kind: EntryKind::Update,
        user: user.to_string(),
        text: text.to_string(),
        files: Some(files),
    });
    Some(next)
}

/// Append a reviewer comment. Comments never carry files.
pub fn add_comment(
    directive: &Directive,
    text: &str,
    user: &str,
    at: NaiveDateTime,
) -> Option<Directive> {
    if text.trim().is_empty() {
        return None;
    }

    let mut next = directive.clone();
    next.updates.push(HistoryEntry {
        timestamp: format_timestamp(at),
        kind: EntryKind::Comment,
        user: user.to_string(),
        text: text.to_string(),
        files: None,
    });
    Some(next)
}
