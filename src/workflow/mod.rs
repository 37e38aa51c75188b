//! Workflow engine: which actions a role may take on a directive, and what
//! each action does to it.
//!
//! [`allowed_actions`] is the single source of truth for the status/role
//! table. [`apply`] checks every command against it before producing the
//! next [`Directive`] value; a command outside the table is refused with
//! [`WorkflowError::IllegalTransition`] and nothing changes.
//!
//! | From | Action | Role | To |
//! |---|---|---|---|
//! | Open | start | worker | In-Progress |
//! | In-Progress, Follow-up, Re-Open | request closing | worker | Request for Closing |
//! | In-Progress, Follow-up, Request for Closing, Re-Open | record progress | worker | (same) |
//! | Request for Closing | approve | reviewer | Closed |
//! | Request for Closing, Follow-up | request follow-up | reviewer | Follow-up |
//! | Closed | reopen | reviewer | Re-Open |

mod due;

pub use due::*;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WorkflowError};
use crate::ledger;
use crate::models::{
    Actor, Capability, CreateDirectiveInput, Directive, DirectiveStatus, EditDirectiveInput,
    Priority, Role,
};

/// Prefix on the comment recorded when a directive is reopened.
pub const REOPEN_MARKER: &str = "[Re-Open 사유]";

/// A status-dependent action an actor can be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Start,
    RecordProgress,
    RequestClosing,
    Approve,
    RequestFollowUp,
    Reopen,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::RecordProgress => "record_progress",
            Self::RequestClosing => "request_closing",
            Self::Approve => "approve",
            Self::RequestFollowUp => "request_follow_up",
            Self::Reopen => "reopen",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow command with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Start,
    RecordProgress {
        text: String,
        #[serde(default)]
        files: Vec<String>,
    },
    /// Staged narrative is recorded as an update first when non-blank.
    RequestClosing {
        #[serde(default)]
        text: String,
        #[serde(default)]
        files: Vec<String>,
    },
    Approve {
        #[serde(default)]
        comment: String,
    },
    RequestFollowUp {
        #[serde(default)]
        period: FollowUpPeriod,
        #[serde(default)]
        comment: String,
    },
    Reopen {
        reason: String,
    },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Self::Start => Action::Start,
            Self::RecordProgress { .. } => Action::RecordProgress,
            Self::RequestClosing { .. } => Action::RequestClosing,
            Self::Approve { .. } => Action::Approve,
            Self::RequestFollowUp { .. } => Action::RequestFollowUp,
            Self::Reopen { .. } => Action::Reopen,
        }
    }
}

/// Actions offered to `role` on a directive in `status`, worker actions first.
pub fn allowed_actions(status: DirectiveStatus, role: Role) -> Vec<Action> {
    use DirectiveStatus::*;

    let mut actions = Vec::new();

    if role.performs_work() {
        match status {
            Open => actions.push(Action::Start),
            InProgress | FollowUpRequested | ReOpened => {
                actions.push(Action::RecordProgress);
                actions.push(Action::RequestClosing);
            }
            RequestForClosing => actions.push(Action::RecordProgress),
            Closed => {}
        }
    }

    if role.reviews() {
        match status {
            RequestForClosing => {
                actions.push(Action::Approve);
                actions.push(Action::RequestFollowUp);
            }
            FollowUpRequested => actions.push(Action::RequestFollowUp),
            Closed => actions.push(Action::Reopen),
            Open | InProgress | ReOpened => {}
        }
    }

    actions
}

/// Apply `command` to `directive` on behalf of `actor`, returning the next value.
pub fn apply(
    directive: &Directive,
    actor: &Actor,
    command: Command,
    now: NaiveDateTime,
) -> Result<Directive, WorkflowError> {
    let action = command.action();
    if !allowed_actions(directive.status, actor.role).contains(&action) {
        return Err(WorkflowError::IllegalTransition {
            action,
            status: directive.status,
            role: actor.role,
        });
    }

    let next = match command {
        Command::Start => with_status(directive.clone(), DirectiveStatus::InProgress),
        Command::RecordProgress { text, files } => {
            ledger::add_update(directive, &text, &actor.name, files, now)
                .ok_or(ValidationError::EmptyText)?
        }
        Command::RequestClosing { text, files } => {
            let staged = ledger::add_update(directive, &text, &actor.name, files, now)
                .unwrap_or_else(|| directive.clone());
            with_status(staged, DirectiveStatus::RequestForClosing)
        }
        Command::Approve { comment } => {
            let commented = ledger::add_comment(directive, &comment, &actor.name, now)
                .unwrap_or_else(|| directive.clone());
            with_status(commented, DirectiveStatus::Closed)
        }
        Command::RequestFollowUp { period, comment } => {
            let mut commented = ledger::add_comment(directive, &comment, &actor.name, now)
                .unwrap_or_else(|| directive.clone());
            commented.due_date = period.due_date_from(now.date());
            with_status(commented, DirectiveStatus::FollowUpRequested)
        }
        Command::Reopen { reason } => {
            if reason.trim().is_empty() {
                return Err(ValidationError::EmptyText.into());
            }
            let text = format!("{REOPEN_MARKER} {reason}");
            let commented = ledger::add_comment(directive, &text, &actor.name, now)
                .ok_or(ValidationError::EmptyText)?;
            with_status(commented, DirectiveStatus::ReOpened)
        }
    };

    Ok(next)
}

fn with_status(mut directive: Directive, status: DirectiveStatus) -> Directive {
    directive.status = status;
    directive
}

/// Next id for a collection: one past the current maximum, or 1 when empty.
pub fn next_id(directives: &[Directive]) -> Result<u64, ValidationError> {
    directives
        .iter()
        .map(|d| d.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(ValidationError::IdsExhausted)
}

/// Build a new `Open` directive registered on `today`.
pub fn create(
    existing: &[Directive],
    actor: &Actor,
    input: CreateDirectiveInput,
    today: NaiveDate,
) -> Result<Directive, WorkflowError> {
    require(actor, Capability::Create)?;

    let required = [
        &input.meeting,
        &input.large_category,
        &input.small_category,
        &input.content,
        &input.assignee,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ValidationError::AllFieldsRequired.into());
    }
    let due_date = input.due_date.ok_or(ValidationError::AllFieldsRequired)?;

    Ok(Directive {
        id: next_id(existing)?,
        meeting: input.meeting,
        large_category: input.large_category,
        small_category: input.small_category,
        priority: input.priority.unwrap_or(Priority::Medium),
        content: input.content,
        assignee: input.assignee,
        registered_date: today,
        due_date,
        status: DirectiveStatus::Open,
        updates: Vec::new(),
        files: Vec::new(),
    })
}

/// Replace the editable fields of `directive`.
pub fn edit(
    directive: &Directive,
    actor: &Actor,
    input: EditDirectiveInput,
) -> Result<Directive, WorkflowError> {
    require(actor, Capability::Edit)?;

    Ok(Directive {
        meeting: input.meeting,
        large_category: input.large_category,
        small_category: input.small_category,
        priority: input.priority,
        content: input.content,
        assignee: input.assignee,
        due_date: input.due_date,
        ..directive.clone()
    })
}

fn require(actor: &Actor, capability: Capability) -> Result<(), WorkflowError> {
    if actor.role.can(capability) {
        Ok(())
    } else {
        Err(WorkflowError::NotPermitted {
            capability,
            role: actor.role,
        })
    }
}
