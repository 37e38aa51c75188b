//! Plain-text rendering for the CLI.

use chrono::NaiveDate;

use crate::models::{Directive, DirectiveStatus};
use crate::query::Summary;
use crate::report::StatusCounts;
use crate::workflow::{is_due_soon, is_overdue, Action};

const OVERDUE: char = '!';
const DUE_SOON: char = '~';

/// Get the status symbol for a directive status.
fn status_symbol(status: DirectiveStatus) -> char {
    match status {
        DirectiveStatus::Open => '◇',
        DirectiveStatus::InProgress => '○',
        DirectiveStatus::RequestForClosing => '◐',
        DirectiveStatus::FollowUpRequested => '↻',
        DirectiveStatus::Closed => '●',
        DirectiveStatus::ReOpened => '↺',
    }
}

/// One line per directive, with a due-date flag (`!` overdue, `~` due soon).
///
/// ```text
/// ◇ #1 2026-02-10! [High] Open | 김철수 | 신제품 라인업 검토 및 투자안 수립
/// ```
pub fn render_list(directives: &[Directive], today: NaiveDate) -> String {
    let mut output = String::new();
    for d in directives {
        let flag = if is_overdue(d, today) {
            Some(OVERDUE)
        } else if is_due_soon(d, today) {
            Some(DUE_SOON)
        } else {
            None
        };

        output.push(status_symbol(d.status));
        output.push_str(&format!(" #{} {}", d.id, d.due_date));
        if let Some(flag) = flag {
            output.push(flag);
        }
        output.push_str(&format!(
            " [{}] {} | {} | {}\n",
            d.priority, d.status, d.assignee, d.content
        ));
    }
    output
}

/// Full detail view: fields, history (oldest first), and the actions on offer.
pub fn render_detail(directive: &Directive, actions: &[Action]) -> String {
    let d = directive;
    let mut output = format!("#{} {}\n", d.id, d.content);
    output.push_str(&format!("  Meeting:    {}\n", d.meeting));
    output.push_str(&format!(
        "  Category:   {} / {}\n",
        d.large_category, d.small_category
    ));
    output.push_str(&format!("  Priority:   {}\n", d.priority));
    output.push_str(&format!("  Assignee:   {}\n", d.assignee));
    output.push_str(&format!("  Registered: {}\n", d.registered_date));
    output.push_str(&format!("  Due:        {}\n", d.due_date));
    output.push_str(&format!("  Status:     {}\n", d.status));
    if !d.files.is_empty() {
        output.push_str(&format!("  Files:      {}\n", d.files.join(", ")));
    }

    if !d.updates.is_empty() {
        output.push_str("History\n");
        for (i, entry) in d.updates.iter().enumerate() {
            let is_last = i == d.updates.len() - 1;
            let branch = if is_last { "└── " } else { "├── " };
            output.push_str(&format!(
                "{}[{}] {} {}: {}\n",
                branch,
                entry.kind.as_str(),
                entry.timestamp,
                entry.user,
                entry.text
            ));
            if let Some(files) = entry.files.as_ref().filter(|f| !f.is_empty()) {
                let continuation = if is_last { "    " } else { "│   " };
                output.push_str(&format!("{}attached: {}\n", continuation, files.join(", ")));
            }
        }
    }

    if !actions.is_empty() {
        let names: Vec<&str> = actions.iter().map(Action::as_str).collect();
        output.push_str(&format!("Actions: {}\n", names.join(", ")));
    }
    output
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Total {} | Open {} | In-Progress {} | Request for Closing {} | Overdue {} | Due soon {}\n",
        summary.total,
        summary.open,
        summary.in_progress,
        summary.request_for_closing,
        summary.overdue,
        summary.due_soon
    )
}

/// Closure rate as a percentage to one decimal place, with the raw counts.
pub fn closed_rate_label(row: &StatusCounts) -> String {
    format!(
        "{:.1}% ({}/{})",
        row.closed_rate * 100.0,
        row.closed,
        row.total
    )
}

pub fn render_report(rows: &[StatusCounts]) -> String {
    let mut output = String::new();
    for row in rows {
        let counts: Vec<String> = DirectiveStatus::ALL
            .iter()
            .map(|s| format!("{} {}", s, row.count(*s)))
            .collect();
        output.push_str(&format!(
            "{}: {}\n    {}\n",
            row.name,
            closed_rate_label(row),
            counts.join(" | ")
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger;
    use crate::store::seed;
    use chrono::NaiveDateTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    #[test]
    fn test_list_flags_due_dates() {
        let output = render_list(&seed::bootstrap(), today());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "◇ #1 2026-02-10! [High] Open | 김철수 | 신제품 라인업 검토 및 투자안 수립"
        );
        assert!(lines[1].starts_with("○ #2 2026-02-20~ [Critical] In-Progress"));
        assert!(lines[2].starts_with("◐ #3 2026-02-25~ [Medium] Request for Closing"));
    }

    #[test]
    fn test_list_leaves_distant_due_dates_unflagged() {
        let mut d = seed::bootstrap().remove(0);
        d.due_date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert!(render_list(&[d], today()).starts_with("◇ #1 2026-06-01 [High]"));
    }

    #[test]
    fn test_detail_renders_history_as_tree() {
        let d = seed::bootstrap().remove(2);
        let output = render_detail(&d, &[Action::RecordProgress]);
        assert!(output.starts_with("#3 브랜드 리뉴얼 전략 수립\n"));
        assert!(output.contains(
            "History\n├── [update] 2026-02-14 14:20 박민수: 시장 조사 완료\n└── [update] 2026-02-13 16:45 박민수: 초안 작성 완료, 검토 요청\n"
        ));
        assert!(output.ends_with("Actions: record_progress\n"));
    }

    #[test]
    fn test_detail_lists_attachments() {
        let at: NaiveDateTime = today().and_hms_opt(8, 0, 0).unwrap();
        let d = ledger::add_update(
            &seed::bootstrap().remove(0),
            "draft",
            "Kim",
            vec!["plan.xlsx".to_string()],
            at,
        )
        .unwrap();
        let output = render_detail(&d, &[]);
        assert!(output.contains("  Files:      plan.xlsx\n"));
        assert!(output.contains("└── [update] 2026-02-15 08:00 Kim: draft\n    attached: plan.xlsx\n"));
        assert!(!output.contains("Actions:"));
    }

    #[test]
    fn test_closed_rate_label_has_one_decimal() {
        let mut row = StatusCounts::new("Board");
        row.record(DirectiveStatus::Closed);
        row.record(DirectiveStatus::Closed);
        row.record(DirectiveStatus::Open);
        assert_eq!(closed_rate_label(&row), "66.7% (2/3)");
        assert_eq!(closed_rate_label(&StatusCounts::new("empty")), "0.0% (0/0)");
    }

    #[test]
    fn test_summary_line() {
        let summary = crate::query::summary(&seed::bootstrap(), today());
        assert_eq!(
            render_summary(&summary),
            "Total 3 | Open 1 | In-Progress 1 | Request for Closing 1 | Overdue 1 | Due soon 2\n"
        );
    }
}
