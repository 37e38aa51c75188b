use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Directive, DirectiveStatus};

/// How far ahead (inclusive) a due date counts as "due soon".
pub const DUE_SOON_WINDOW_DAYS: i64 = 14;

/// Relative period a reviewer picks when requesting additional follow-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUpPeriod {
    #[default]
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "3weeks")]
    ThreeWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "2months")]
    TwoMonths,
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl FollowUpPeriod {
    pub fn days(&self) -> i64 {
        match self {
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::ThreeWeeks => 21,
            Self::OneMonth => 30,
            Self::TwoMonths => 60,
            Self::ThreeMonths => 90,
        }
    }

    /// The new due date: `today` plus the period. Ignores any previous due date.
    pub fn due_date_from(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.days())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWeek => "1week",
            Self::TwoWeeks => "2weeks",
            Self::ThreeWeeks => "3weeks",
            Self::OneMonth => "1month",
            Self::TwoMonths => "2months",
            Self::ThreeMonths => "3months",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1week" => Some(Self::OneWeek),
            "2weeks" => Some(Self::TwoWeeks),
            "3weeks" => Some(Self::ThreeWeeks),
            "1month" => Some(Self::OneMonth),
            "2months" => Some(Self::TwoMonths),
            "3months" => Some(Self::ThreeMonths),
            _ => None,
        }
    }
}

/// Not closed and past its due date.
pub fn is_overdue(directive: &Directive, today: NaiveDate) -> bool {
    directive.status != DirectiveStatus::Closed && directive.due_date < today
}

/// Not closed and due within the next [`DUE_SOON_WINDOW_DAYS`] days,
/// today included. Never true at the same time as [`is_overdue`].
pub fn is_due_soon(directive: &Directive, today: NaiveDate) -> bool {
    directive.status != DirectiveStatus::Closed
        && directive.due_date >= today
        && directive.due_date <= today + Duration::days(DUE_SOON_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due_on(due: NaiveDate, status: DirectiveStatus) -> Directive {
        let mut d = seed::bootstrap().remove(0);
        d.due_date = due;
        d.status = status;
        d
    }

    #[test]
    fn periods_map_to_fixed_day_counts() {
        let days: Vec<i64> = [
            FollowUpPeriod::OneWeek,
            FollowUpPeriod::TwoWeeks,
            FollowUpPeriod::ThreeWeeks,
            FollowUpPeriod::OneMonth,
            FollowUpPeriod::TwoMonths,
            FollowUpPeriod::ThreeMonths,
        ]
        .iter()
        .map(FollowUpPeriod::days)
        .collect();
        assert_eq!(days, vec![7, 14, 21, 30, 60, 90]);
    }

    #[test]
    fn due_date_counts_from_today() {
        assert_eq!(
            FollowUpPeriod::OneMonth.due_date_from(date(2026, 1, 31)),
            date(2026, 3, 2)
        );
        assert_eq!(
            FollowUpPeriod::TwoWeeks.due_date_from(date(2026, 12, 25)),
            date(2027, 1, 8)
        );
    }

    #[test]
    fn period_tags_parse() {
        assert_eq!(FollowUpPeriod::from_str("2weeks"), Some(FollowUpPeriod::TwoWeeks));
        assert_eq!(FollowUpPeriod::from_str("2 weeks"), None);
        let json = serde_json::to_string(&FollowUpPeriod::ThreeMonths).unwrap();
        assert_eq!(json, "\"3months\"");
    }

    #[test]
    fn overdue_requires_past_due_and_not_closed() {
        let today = date(2026, 3, 10);
        assert!(is_overdue(&due_on(date(2026, 3, 9), DirectiveStatus::Open), today));
        assert!(!is_overdue(&due_on(date(2026, 3, 10), DirectiveStatus::Open), today));
        assert!(!is_overdue(&due_on(date(2026, 3, 9), DirectiveStatus::Closed), today));
    }

    #[test]
    fn due_soon_window_is_inclusive() {
        let today = date(2026, 3, 10);
        assert!(is_due_soon(&due_on(today, DirectiveStatus::ReOpened), today));
        assert!(is_due_soon(&due_on(date(2026, 3, 24), DirectiveStatus::Open), today));
        assert!(!is_due_soon(&due_on(date(2026, 3, 25), DirectiveStatus::Open), today));
        assert!(!is_due_soon(&due_on(date(2026, 3, 12), DirectiveStatus::Closed), today));
    }

    #[test]
    fn overdue_and_due_soon_never_overlap() {
        let today = date(2026, 3, 10);
        for offset in -30..30 {
            for status in DirectiveStatus::ALL {
                let d = due_on(today + Duration::days(offset), status);
                assert!(!(is_overdue(&d, today) && is_due_soon(&d, today)));
            }
        }
    }
}
