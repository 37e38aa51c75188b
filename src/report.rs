//! Aggregation engine behind the reporting dashboard.
//!
//! Groups are emitted in order of first appearance in the input; callers
//! re-sort if they want something else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Directive, DirectiveStatus};

/// The field directives are grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    #[default]
    Meeting,
    LargeCategory,
}

impl Dimension {
    pub fn value_of<'a>(&self, directive: &'a Directive) -> &'a str {
        match self {
            Self::Meeting => &directive.meeting,
            Self::LargeCategory => &directive.large_category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::LargeCategory => "largeCategory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "meeting" => Some(Self::Meeting),
            "largeCategory" | "large-category" => Some(Self::LargeCategory),
            _ => None,
        }
    }
}

/// Per-status counts for one group (a dimension value or an assignee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub name: String,
    pub open: usize,
    pub in_progress: usize,
    pub request_for_closing: usize,
    pub follow_up_requested: usize,
    pub closed: usize,
    pub reopened: usize,
    pub total: usize,
    /// `closed / total`, or 0 for an empty group.
    pub closed_rate: f64,
}

impl StatusCounts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: 0,
            in_progress: 0,
            request_for_closing: 0,
            follow_up_requested: 0,
            closed: 0,
            reopened: 0,
            total: 0,
            closed_rate: 0.0,
        }
    }

    pub fn record(&mut self, status: DirectiveStatus) {
        *self.slot(status) += 1;
        self.total += 1;
        self.closed_rate = self.closed as f64 / self.total as f64;
    }

    pub fn count(&self, status: DirectiveStatus) -> usize {
        match status {
            DirectiveStatus::Open => self.open,
            DirectiveStatus::InProgress => self.in_progress,
            DirectiveStatus::RequestForClosing => self.request_for_closing,
            DirectiveStatus::FollowUpRequested => self.follow_up_requested,
            DirectiveStatus::Closed => self.closed,
            DirectiveStatus::ReOpened => self.reopened,
        }
    }

    fn slot(&mut self, status: DirectiveStatus) -> &mut usize {
        match status {
            DirectiveStatus::Open => &mut self.open,
            DirectiveStatus::InProgress => &mut self.in_progress,
            DirectiveStatus::RequestForClosing => &mut self.request_for_closing,
            DirectiveStatus::FollowUpRequested => &mut self.follow_up_requested,
            DirectiveStatus::Closed => &mut self.closed,
            DirectiveStatus::ReOpened => &mut self.reopened,
        }
    }
}

/// Status counts per value of `dimension`.
pub fn group_counts(directives: &[Directive], dimension: Dimension) -> Vec<StatusCounts> {
    tally(directives.iter(), |d| dimension.value_of(d))
}

/// Status counts per assignee, within the group `dimension == group_value`.
pub fn assignee_breakdown(
    directives: &[Directive],
    dimension: Dimension,
    group_value: &str,
) -> Vec<StatusCounts> {
    tally(
        directives
            .iter()
            .filter(|d| dimension.value_of(d) == group_value),
        |d| d.assignee.as_str(),
    )
}

fn tally<'a, I, K>(directives: I, key: K) -> Vec<StatusCounts>
where
    I: Iterator<Item = &'a Directive>,
    K: Fn(&'a Directive) -> &'a str,
{
    let mut groups: Vec<StatusCounts> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for directive in directives {
        let name = key(directive);
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(StatusCounts::new(name));
            groups.len() - 1
        });
        groups[slot].record(directive.status);
    }

    groups
}
