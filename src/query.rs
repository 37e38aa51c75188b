//! Query engine: filtered and sorted views over a directive collection.
//!
//! Everything here is a pure function of its inputs. Nothing reads the
//! store or the clock; callers pass `today` in.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Directive, DirectiveStatus, Priority};
use crate::workflow::{is_due_soon, is_overdue};

/// Named shortcut applied before the field filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickFilter {
    #[default]
    All,
    Open,
    InProgress,
    RequestForClosing,
    Overdue,
    DueSoon,
}

impl QuickFilter {
    pub fn matches(&self, directive: &Directive, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Open => directive.status == DirectiveStatus::Open,
            Self::InProgress => directive.status == DirectiveStatus::InProgress,
            Self::RequestForClosing => directive.status == DirectiveStatus::RequestForClosing,
            Self::Overdue => is_overdue(directive, today),
            Self::DueSoon => is_due_soon(directive, today),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "open" => Some(Self::Open),
            "inProgress" => Some(Self::InProgress),
            "requestForClosing" => Some(Self::RequestForClosing),
            "overdue" => Some(Self::Overdue),
            "dueSoon" => Some(Self::DueSoon),
            _ => None,
        }
    }
}

/// Per-field equality filters. `None` (or an empty string) matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilters {
    pub meeting: Option<String>,
    pub large_category: Option<String>,
    pub small_category: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<DirectiveStatus>,
    pub assignee: Option<String>,
}

impl FieldFilters {
    pub fn matches(&self, directive: &Directive) -> bool {
        text_matches(&self.meeting, &directive.meeting)
            && text_matches(&self.large_category, &directive.large_category)
            && text_matches(&self.small_category, &directive.small_category)
            && self.priority.map_or(true, |p| p == directive.priority)
            && self.status.map_or(true, |s| s == directive.status)
            && text_matches(&self.assignee, &directive.assignee)
    }
}

fn text_matches(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref() {
        None | Some("") => true,
        Some(wanted) => wanted == value,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Earliest due date first.
    #[default]
    DueDate,
    /// Highest priority first.
    Priority,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dueDate" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

pub fn filter(
    directives: &[Directive],
    quick: QuickFilter,
    fields: &FieldFilters,
    today: NaiveDate,
) -> Vec<Directive> {
    directives
        .iter()
        .filter(|d| quick.matches(d, today) && fields.matches(d))
        .cloned()
        .collect()
}

/// Sorted copy of `directives`. Ties are left in no particular order.
pub fn sort(directives: &[Directive], key: SortKey) -> Vec<Directive> {
    let mut sorted = directives.to_vec();
    match key {
        SortKey::DueDate => sorted.sort_unstable_by_key(|d| d.due_date),
        SortKey::Priority => sorted.sort_unstable_by_key(|d| Reverse(d.priority.rank())),
    }
    sorted
}

/// Counters behind the quick-filter buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub request_for_closing: usize,
    pub overdue: usize,
    pub due_soon: usize,
}

pub fn summary(directives: &[Directive], today: NaiveDate) -> Summary {
    let count = |quick: QuickFilter| directives.iter().filter(|d| quick.matches(d, today)).count();

    Summary {
        total: directives.len(),
        open: count(QuickFilter::Open),
        in_progress: count(QuickFilter::InProgress),
        request_for_closing: count(QuickFilter::RequestForClosing),
        overdue: count(QuickFilter::Overdue),
        due_soon: count(QuickFilter::DueSoon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Seed due dates: #1 2026-02-10 Open, #2 2026-02-20 In-Progress, #3 2026-02-25 RfC.
    const TODAY: (i32, u32, u32) = (2026, 2, 15);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    fn ids(list: &[Directive]) -> Vec<u64> {
        list.iter().map(|d| d.id).collect()
    }

    #[test]
    fn all_with_no_field_filters_keeps_everything() {
        let list = seed::bootstrap();
        let out = filter(&list, QuickFilter::All, &FieldFilters::default(), today());
        assert_eq!(ids(&out), vec![1, 2, 3]);
    }

    #[test]
    fn quick_filters_select_by_status_and_due_date() {
        let list = seed::bootstrap();
        let none = FieldFilters::default();
        assert_eq!(ids(&filter(&list, QuickFilter::Open, &none, today())), vec![1]);
        assert_eq!(ids(&filter(&list, QuickFilter::InProgress, &none, today())), vec![2]);
        assert_eq!(ids(&filter(&list, QuickFilter::RequestForClosing, &none, today())), vec![3]);
        assert_eq!(ids(&filter(&list, QuickFilter::Overdue, &none, today())), vec![1]);
        assert_eq!(ids(&filter(&list, QuickFilter::DueSoon, &none, today())), vec![2, 3]);
    }

    #[test]
    fn field_filters_are_anded_with_quick_filter() {
        let list = seed::bootstrap();
        let fields = FieldFilters {
            large_category: Some("AX".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&list, QuickFilter::DueSoon, &fields, today())), vec![3]);
        assert!(filter(&list, QuickFilter::Overdue, &fields, today()).is_empty());
    }

    #[test]
    fn empty_text_filter_matches_everything() {
        let list = seed::bootstrap();
        let fields = FieldFilters {
            meeting: Some(String::new()),
            priority: Some(Priority::Critical),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&list, QuickFilter::All, &fields, today())), vec![2]);
    }

    #[test]
    fn filter_does_not_touch_input() {
        let list = seed::bootstrap();
        let before = list.clone();
        let _ = filter(&list, QuickFilter::Open, &FieldFilters::default(), today());
        let _ = sort(&list, SortKey::Priority);
        assert_eq!(list, before);
    }

    #[test]
    fn sort_by_due_date_ascending() {
        let mut list = seed::bootstrap();
        list.reverse();
        assert_eq!(ids(&sort(&list, SortKey::DueDate)), vec![1, 2, 3]);
    }

    #[test]
    fn sort_by_priority_descending() {
        let mut list = seed::bootstrap();
        list[2].priority = Priority::Low;
        assert_eq!(ids(&sort(&list, SortKey::Priority)), vec![2, 1, 3]);
    }

    #[test]
    fn summary_counts_match_quick_filters() {
        let s = summary(&seed::bootstrap(), today());
        assert_eq!(
            s,
            Summary {
                total: 3,
                open: 1,
                in_progress: 1,
                request_for_closing: 1,
                overdue: 1,
                due_soon: 2,
            }
        );
    }

    #[test]
    fn quick_filter_names_parse() {
        assert_eq!(QuickFilter::from_str("dueSoon"), Some(QuickFilter::DueSoon));
        assert_eq!(QuickFilter::from_str("due_soon"), None);
        assert_eq!(SortKey::from_str("priority"), Some(SortKey::Priority));
    }
}
