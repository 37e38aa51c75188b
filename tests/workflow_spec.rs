use chrono::{NaiveDate, NaiveDateTime};
use directive_tracker::error::{ValidationError, WorkflowError};
use directive_tracker::models::*;
use directive_tracker::store::seed;
use directive_tracker::workflow::{self, Action, Command, FollowUpPeriod, REOPEN_MARKER};
use speculate2::speculate;

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M")
        .expect("valid timestamp")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn directive(id: u64) -> Directive {
    seed::bootstrap()
        .into_iter()
        .find(|d| d.id == id)
        .expect("seed directive")
}

fn valid_input() -> CreateDirectiveInput {
    CreateDirectiveInput {
        meeting: "경영회의".to_string(),
        large_category: "Global".to_string(),
        small_category: "영업".to_string(),
        priority: Some(Priority::High),
        content: "Open the Vietnam office".to_string(),
        assignee: "Kim".to_string(),
        due_date: Some(date("2026-03-01")),
    }
}

speculate! {
    before {
        let admin = Actor::new(Role::Admin, "Admin User");
        let assignee = Actor::new(Role::Assignee, "이영희");
        let ceo = Actor::new(Role::Ceo, "CEO");
        let now = at("2026-02-15", "10:00");
    }

    describe "start" {
        it "moves an open directive to in-progress without touching history" {
            let next = workflow::apply(&directive(1), &assignee, Command::Start, now)
                .expect("start allowed");

            assert_eq!(next.status, DirectiveStatus::InProgress);
            assert!(next.updates.is_empty());
            assert_eq!(next.due_date, directive(1).due_date);
        }

        it "is refused for the ceo" {
            let result = workflow::apply(&directive(1), &ceo, Command::Start, now);

            assert_eq!(
                result,
                Err(WorkflowError::IllegalTransition {
                    action: Action::Start,
                    status: DirectiveStatus::Open,
                    role: Role::Ceo,
                })
            );
        }
    }

    describe "record progress" {
        it "appends an update entry with attachments" {
            let files = vec!["report.pdf".to_string()];
            let next = workflow::apply(
                &directive(2),
                &assignee,
                Command::RecordProgress {
                    text: "프로토타입 테스트 완료".to_string(),
                    files: files.clone(),
                },
                now,
            )
            .expect("progress allowed");

            assert_eq!(next.status, DirectiveStatus::InProgress);
            assert_eq!(next.updates.len(), 2);
            let last = next.updates.last().expect("entry appended");
            assert_eq!(last.kind, EntryKind::Update);
            assert_eq!(last.user, "이영희");
            assert_eq!(last.timestamp, "2026-02-15 10:00");
            assert_eq!(last.files, Some(files.clone()));
            assert_eq!(next.files, files);
        }

        it "rejects blank text and leaves the directive alone" {
            let result = workflow::apply(
                &directive(2),
                &assignee,
                Command::RecordProgress {
                    text: "   ".to_string(),
                    files: vec![],
                },
                now,
            );

            assert_eq!(result, Err(WorkflowError::Validation(ValidationError::EmptyText)));
        }

        it "is still offered while closure is pending" {
            let next = workflow::apply(
                &directive(3),
                &assignee,
                Command::RecordProgress {
                    text: "추가 자료 첨부".to_string(),
                    files: vec![],
                },
                now,
            )
            .expect("progress allowed");

            assert_eq!(next.status, DirectiveStatus::RequestForClosing);
            assert_eq!(next.updates.len(), 3);
        }
    }

    describe "request closing" {
        it "records the narrative then changes status" {
            let next = workflow::apply(
                &directive(2),
                &assignee,
                Command::RequestClosing {
                    text: "개선안 보고 완료".to_string(),
                    files: vec![],
                },
                now,
            )
            .expect("request allowed");

            assert_eq!(next.status, DirectiveStatus::RequestForClosing);
            assert_eq!(next.updates.last().map(|u| u.text.as_str()), Some("개선안 보고 완료"));
        }

        it "proceeds without an entry when the narrative is blank" {
            let next = workflow::apply(
                &directive(2),
                &assignee,
                Command::RequestClosing {
                    text: String::new(),
                    files: vec![],
                },
                now,
            )
            .expect("request allowed");

            assert_eq!(next.status, DirectiveStatus::RequestForClosing);
            assert_eq!(next.updates.len(), 1);
        }

        it "attaches staged files to the narrative entry" {
            let files = vec!["final.pdf".to_string(), "appendix.xlsx".to_string()];
            let next = workflow::apply(
                &directive(2),
                &assignee,
                Command::RequestClosing {
                    text: "done".to_string(),
                    files: files.clone(),
                },
                now,
            )
            .expect("request allowed");

            assert_eq!(next.status, DirectiveStatus::RequestForClosing);
            assert_eq!(next.files, files);
            let last = next.updates.last().expect("entry appended");
            assert_eq!(last.kind, EntryKind::Update);
            assert_eq!(last.text, "done");
            assert_eq!(last.files, Some(files.clone()));
        }

        it "discards staged files when the narrative is blank" {
            let next = workflow::apply(
                &directive(2),
                &assignee,
                Command::RequestClosing {
                    text: " ".to_string(),
                    files: vec!["x.pdf".to_string()],
                },
                now,
            )
            .expect("request allowed");

            assert_eq!(next.status, DirectiveStatus::RequestForClosing);
            assert!(next.files.is_empty());
            assert_eq!(next.updates, directive(2).updates);
        }
    }

    describe "approve" {
        it "closes with a comment entry" {
            let next = workflow::apply(
                &directive(3),
                &ceo,
                Command::Approve {
                    comment: "수고하셨습니다".to_string(),
                },
                now,
            )
            .expect("approve allowed");

            assert_eq!(next.status, DirectiveStatus::Closed);
            let last = next.updates.last().expect("comment appended");
            assert_eq!(last.kind, EntryKind::Comment);
            assert_eq!(last.user, "CEO");
            assert_eq!(last.text, "수고하셨습니다");
            assert_eq!(last.files, None);
        }

        it "records an admin's comment verbatim" {
            let before = directive(3).updates.len();
            let next = workflow::apply(
                &directive(3),
                &admin,
                Command::Approve {
                    comment: "ok".to_string(),
                },
                now,
            )
            .expect("approve allowed");

            assert_eq!(next.status, DirectiveStatus::Closed);
            assert_eq!(next.updates.len(), before + 1);
            let last = next.updates.last().expect("comment appended");
            assert_eq!(last.kind, EntryKind::Comment);
            assert_eq!(last.text, "ok");
            assert_eq!(last.user, "Admin User");
            assert_eq!(last.timestamp, "2026-02-15 10:00");
        }

        it "closes without an entry when the comment is blank" {
            let next = workflow::apply(
                &directive(3),
                &ceo,
                Command::Approve {
                    comment: String::new(),
                },
                now,
            )
            .expect("approve allowed");

            assert_eq!(next.status, DirectiveStatus::Closed);
            assert_eq!(next.updates.len(), 2);
        }

        it "is refused for an assignee" {
            let result = workflow::apply(
                &directive(3),
                &assignee,
                Command::Approve {
                    comment: String::new(),
                },
                now,
            );

            assert!(matches!(result, Err(WorkflowError::IllegalTransition { .. })));
        }
    }

    describe "request follow-up" {
        it "resets the due date relative to today" {
            let next = workflow::apply(
                &directive(3),
                &ceo,
                Command::RequestFollowUp {
                    period: FollowUpPeriod::TwoWeeks,
                    comment: "보완 필요".to_string(),
                },
                now,
            )
            .expect("follow-up allowed");

            assert_eq!(next.status, DirectiveStatus::FollowUpRequested);
            assert_eq!(next.due_date, date("2026-03-01"));
            let last = next.updates.last().expect("comment appended");
            assert_eq!(last.kind, EntryKind::Comment);
            assert_eq!(last.text, "보완 필요");
            assert_eq!(last.user, "CEO");
        }

        it "uses thirty days for one month" {
            let next = workflow::apply(
                &directive(3),
                &admin,
                Command::RequestFollowUp {
                    period: FollowUpPeriod::OneMonth,
                    comment: String::new(),
                },
                now,
            )
            .expect("follow-up allowed");

            assert_eq!(next.due_date, date("2026-03-17"));
        }

        it "lets the assignee resume and request closing again" {
            let followed = workflow::apply(
                &directive(3),
                &ceo,
                Command::RequestFollowUp {
                    period: FollowUpPeriod::OneWeek,
                    comment: String::new(),
                },
                now,
            )
            .expect("follow-up allowed");

            let again = workflow::apply(
                &followed,
                &assignee,
                Command::RequestClosing {
                    text: "보완 완료".to_string(),
                    files: vec![],
                },
                at("2026-02-20", "09:00"),
            )
            .expect("request allowed");

            assert_eq!(again.status, DirectiveStatus::RequestForClosing);
        }
    }

    describe "reopen" {
        before {
            let closed = workflow::apply(
                &directive(3),
                &ceo,
                Command::Approve {
                    comment: String::new(),
                },
                now,
            )
            .expect("approve allowed");
        }

        it "prefixes the reason with the reopen marker" {
            let next = workflow::apply(
                &closed,
                &admin,
                Command::Reopen {
                    reason: "추가 검토 필요".to_string(),
                },
                at("2026-02-16", "11:30"),
            )
            .expect("reopen allowed");

            assert_eq!(next.status, DirectiveStatus::ReOpened);
            let last = next.updates.last().expect("comment appended");
            assert_eq!(last.text, format!("{} 추가 검토 필요", REOPEN_MARKER));
            assert_eq!(last.kind, EntryKind::Comment);
        }

        it "requires a reason" {
            let result = workflow::apply(
                &closed,
                &admin,
                Command::Reopen {
                    reason: " ".to_string(),
                },
                now,
            );

            assert_eq!(result, Err(WorkflowError::Validation(ValidationError::EmptyText)));
        }

        it "offers the assignee the in-progress actions again" {
            assert_eq!(
                workflow::allowed_actions(DirectiveStatus::ReOpened, Role::Assignee),
                vec![Action::RecordProgress, Action::RequestClosing]
            );
        }
    }

    describe "allowed actions" {
        it "never offers anything to an assignee on a closed directive" {
            assert!(workflow::allowed_actions(DirectiveStatus::Closed, Role::Assignee).is_empty());
        }

        it "only offers commands that apply succeeds on or validates" {
            let commands = [
                Command::Start,
                Command::RecordProgress { text: "x".to_string(), files: vec![] },
                Command::RequestClosing { text: "x".to_string(), files: vec![] },
                Command::Approve { comment: "x".to_string() },
                Command::RequestFollowUp { period: FollowUpPeriod::OneWeek, comment: "x".to_string() },
                Command::Reopen { reason: "x".to_string() },
            ];

            for status in DirectiveStatus::ALL {
                for role in [Role::Admin, Role::Assignee, Role::Ceo] {
                    let actor = Actor::new(role, "someone");
                    let mut subject = directive(2);
                    subject.status = status;
                    let offered = workflow::allowed_actions(status, role);

                    for command in commands.iter().cloned() {
                        let action = command.action();
                        let result = workflow::apply(&subject, &actor, command, now);
                        if offered.contains(&action) {
                            assert!(result.is_ok(), "{} should be allowed for {} in {}", action, role, status);
                        } else {
                            assert!(
                                matches!(result, Err(WorkflowError::IllegalTransition { .. })),
                                "{} should be refused for {} in {}", action, role, status
                            );
                        }
                    }
                }
            }
        }

        it "never shrinks the history" {
            let mut current = directive(2);
            let steps = [
                (assignee.clone(), Command::RecordProgress { text: "a".to_string(), files: vec![] }),
                (assignee.clone(), Command::RequestClosing { text: String::new(), files: vec![] }),
                (ceo.clone(), Command::RequestFollowUp { period: FollowUpPeriod::ThreeWeeks, comment: "b".to_string() }),
                (assignee.clone(), Command::RequestClosing { text: "c".to_string(), files: vec![] }),
                (ceo.clone(), Command::Approve { comment: String::new() }),
                (admin.clone(), Command::Reopen { reason: "d".to_string() }),
            ];

            for (actor, command) in steps {
                let before = current.updates.len();
                current = workflow::apply(&current, &actor, command, now).expect("step allowed");
                assert!(current.updates.len() >= before);
            }

            assert_eq!(current.status, DirectiveStatus::ReOpened);
            assert_eq!(current.updates.len(), 5);
        }
    }

    describe "create" {
        it "assigns the next id and opens the directive" {
            let created = workflow::create(&seed::bootstrap(), &admin, valid_input(), date("2026-02-15"))
                .expect("create allowed");

            assert_eq!(created.id, 4);
            assert_eq!(created.status, DirectiveStatus::Open);
            assert_eq!(created.registered_date, date("2026-02-15"));
            assert!(created.updates.is_empty());
        }

        it "defaults the priority to medium" {
            let input = CreateDirectiveInput { priority: None, ..valid_input() };
            let created = workflow::create(&[], &admin, input, date("2026-02-15"))
                .expect("create allowed");

            assert_eq!(created.id, 1);
            assert_eq!(created.priority, Priority::Medium);
        }

        it "requires every field" {
            let input = CreateDirectiveInput { assignee: "  ".to_string(), ..valid_input() };
            let result = workflow::create(&[], &admin, input, date("2026-02-15"));
            assert_eq!(result, Err(WorkflowError::Validation(ValidationError::AllFieldsRequired)));

            let input = CreateDirectiveInput { due_date: None, ..valid_input() };
            let result = workflow::create(&[], &admin, input, date("2026-02-15"));
            assert_eq!(result, Err(WorkflowError::Validation(ValidationError::AllFieldsRequired)));
        }

        it "is admin only" {
            let result = workflow::create(&[], &ceo, valid_input(), date("2026-02-15"));
            assert_eq!(
                result,
                Err(WorkflowError::NotPermitted { capability: Capability::Create, role: Role::Ceo })
            );
        }
    }

    describe "edit" {
        it "replaces editable fields and keeps the rest" {
            let original = directive(2);
            let mut input = EditDirectiveInput::from(&original);
            input.assignee = "최지훈".to_string();
            input.priority = Priority::Low;

            let edited = workflow::edit(&original, &admin, input).expect("edit allowed");

            assert_eq!(edited.assignee, "최지훈");
            assert_eq!(edited.priority, Priority::Low);
            assert_eq!(edited.status, original.status);
            assert_eq!(edited.updates, original.updates);
            assert_eq!(edited.registered_date, original.registered_date);
        }

        it "is refused for an assignee" {
            let original = directive(2);
            let result = workflow::edit(&original, &assignee, EditDirectiveInput::from(&original));
            assert!(matches!(result, Err(WorkflowError::NotPermitted { .. })));
        }
    }
}
