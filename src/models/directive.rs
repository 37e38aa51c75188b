use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::history::HistoryEntry;

/// An action item issued in a meeting and tracked until closure.
///
/// Directives are values: every workflow command or edit produces a new
/// `Directive`, and the store swaps it into the collection by `id`. The
/// serialized form (camelCase keys, date-only strings) is the persisted
/// format shared with existing stored data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub id: u64,
    /// The meeting body the directive was issued in.
    pub meeting: String,
    pub large_category: String,
    pub small_category: String,
    pub priority: Priority,
    /// Description of the required action.
    pub content: String,
    /// Owner of the action.
    pub assignee: String,
    /// Set once at creation; workflow transitions never touch it.
    pub registered_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: DirectiveStatus,
    /// Progress updates and reviewer comments, oldest first. Append-only.
    #[serde(default)]
    pub updates: Vec<HistoryEntry>,
    /// Every filename ever attached through a progress update, in attach order.
    #[serde(default)]
    pub files: Vec<String>,
}

/// The lifecycle status of a directive.
///
/// ```text
/// Open ──▶ In-Progress ──▶ Request for Closing ──▶ Closed ──▶ Re-Open
///                               ▲      │                         │
///                               │      ▼                         │
///                      Additional-Followup-Request               │
///                               │                                │
///                               └──────▶ (close request) ◀───────┘
/// ```
///
/// There is no terminal state: a closed directive can always be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveStatus {
    #[serde(rename = "Open")]
    Open,
    #[serde(rename = "In-Progress")]
    InProgress,
    #[serde(rename = "Request for Closing")]
    RequestForClosing,
    /// A reviewer sent the directive back with a new due date.
    #[serde(rename = "추가 F/up Request", alias = "Additional-Followup-Request")]
    FollowUpRequested,
    #[serde(rename = "Closed")]
    Closed,
    #[serde(rename = "Re-Open")]
    ReOpened,
}

impl DirectiveStatus {
    pub const ALL: [DirectiveStatus; 6] = [
        Self::Open,
        Self::InProgress,
        Self::RequestForClosing,
        Self::FollowUpRequested,
        Self::Closed,
        Self::ReOpened,
    ];

    /// The persisted label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In-Progress",
            Self::RequestForClosing => "Request for Closing",
            Self::FollowUpRequested => "추가 F/up Request",
            Self::Closed => "Closed",
            Self::ReOpened => "Re-Open",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(Self::Open),
            "In-Progress" => Some(Self::InProgress),
            "Request for Closing" => Some(Self::RequestForClosing),
            "추가 F/up Request" | "Additional-Followup-Request" => Some(Self::FollowUpRequested),
            "Closed" => Some(Self::Closed),
            "Re-Open" => Some(Self::ReOpened),
            _ => None,
        }
    }
}

impl std::fmt::Display for DirectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directive priority. Totally ordered: `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight, highest first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Self::Critical),
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for registering a new directive.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDirectiveInput {
    pub meeting: String,
    pub large_category: String,
    pub small_category: String,
    /// Defaults to `Medium`.
    pub priority: Option<Priority>,
    pub content: String,
    pub assignee: String,
    pub due_date: Option<NaiveDate>,
}

/// Input for editing a directive. Replaces every listed field wholesale;
/// status, history, files, id and registration date are untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDirectiveInput {
    pub meeting: String,
    pub large_category: String,
    pub small_category: String,
    pub priority: Priority,
    pub content: String,
    pub assignee: String,
    pub due_date: NaiveDate,
}

impl From<&Directive> for EditDirectiveInput {
    fn from(d: &Directive) -> Self {
        Self {
            meeting: d.meeting.clone(),
            large_category: d.large_category.clone(),
            small_category: d.small_category.clone(),
            priority: d.priority,
            content: d.content.clone(),
            assignee: d.assignee.clone(),
            due_date: d.due_date,
        }
    }
}
