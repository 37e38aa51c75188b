use serde::{Deserialize, Serialize};

/// The acting principal, as supplied by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub role: Role,
    /// Recorded as `user` on every history entry this actor writes.
    pub name: String,
}

impl Actor {
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
        }
    }
}

/// Role of the acting user.
///
/// - `Admin`: everything, including reviewer actions and create/edit
/// - `Assignee`: progress work only
/// - `Ceo`: reviewer actions only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Assignee,
    Ceo,
}

impl Role {
    /// Start, progress-update and close-request actions.
    pub fn performs_work(&self) -> bool {
        !matches!(self, Self::Ceo)
    }

    /// Approve-close, request-followup and reopen actions.
    pub fn reviews(&self) -> bool {
        matches!(self, Self::Admin | Self::Ceo)
    }

    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::Create | Capability::Edit => matches!(self, Self::Admin),
            Capability::ViewReports => self.reviews(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Assignee => "assignee",
            Self::Ceo => "ceo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "assignee" => Some(Self::Assignee),
            "ceo" => Some(Self::Ceo),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-only capabilities that do not depend on a directive's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Create,
    Edit,
    ViewReports,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create directives",
            Self::Edit => "edit directives",
            Self::ViewReports => "view reports",
        })
    }
}
