//! Bootstrap dataset written on first run.
//!
//! The values are fixed: existing installations and test fixtures depend on
//! them, down to the (non-chronological) order of directive 3's updates.

use chrono::NaiveDate;

use crate::models::{Directive, DirectiveStatus, EntryKind, HistoryEntry, Priority};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("bootstrap dates are valid calendar dates")
}

fn update(timestamp: &str, user: &str, text: &str) -> HistoryEntry {
    HistoryEntry {
        timestamp: timestamp.to_string(),
        kind: EntryKind::Update,
        user: user.to_string(),
        text: text.to_string(),
        files: None,
    }
}

pub fn bootstrap() -> Vec<Directive> {
    vec![
        Directive {
            id: 1,
            meeting: "경영회의".to_string(),
            large_category: "Investment".to_string(),
            small_category: "상품기획".to_string(),
            priority: Priority::High,
            content: "신제품 라인업 검토 및 투자안 수립".to_string(),
            assignee: "김철수".to_string(),
            registered_date: ymd(2026, 2, 1),
            due_date: ymd(2026, 2, 10),
            status: DirectiveStatus::Open,
            updates: vec![],
            files: vec![],
        },
        Directive {
            id: 2,
            meeting: "R&D 회의".to_string(),
            large_category: "Winning R&D".to_string(),
            small_category: "개발(SW)".to_string(),
            priority: Priority::Critical,
            content: "AI 알고리즘 성능 개선 방안 보고".to_string(),
            assignee: "이영희".to_string(),
            registered_date: ymd(2026, 2, 5),
            due_date: ymd(2026, 2, 20),
            status: DirectiveStatus::InProgress,
            updates: vec![update(
                "2026-02-14 09:30",
                "이영희",
                "초기 분석 완료, 프로토타입 개발 중",
            )],
            files: vec![],
        },
        Directive {
            id: 3,
            meeting: "전략회의".to_string(),
            large_category: "AX".to_string(),
            small_category: "마케팅".to_string(),
            priority: Priority::Medium,
            content: "브랜드 리뉴얼 전략 수립".to_string(),
            assignee: "박민수".to_string(),
            registered_date: ymd(2026, 2, 8),
            due_date: ymd(2026, 2, 25),
            status: DirectiveStatus::RequestForClosing,
            updates: vec![
                update("2026-02-14 14:20", "박민수", "시장 조사 완료"),
                update("2026-02-13 16:45", "박민수", "초안 작성 완료, 검토 요청"),
            ],
            files: vec![],
        },
    ]
}
