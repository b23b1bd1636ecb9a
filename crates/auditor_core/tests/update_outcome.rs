use std::sync::Once;

use auditor_core::{
    update, AppState, AuditSnapshot, CategoryScore, Effect, Msg, ReportView, SessionState,
    Verdict,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(audit_logging::initialize_for_tests);
}

fn running_state() -> AppState {
    let (state, _effects) = update(
        AppState::new(),
        Msg::AuditSubmitted {
            url: "example.com".to_string(),
            competitor_url: None,
            lang: "en".to_string(),
        },
    );
    state
}

fn sample_report() -> ReportView {
    ReportView {
        url: "https://example.com/".to_string(),
        global_score: Some(82),
        categories: vec![
            CategoryScore {
                label: "Performance".to_string(),
                score: 91,
            },
            CategoryScore {
                label: "Security".to_string(),
                score: 74,
            },
        ],
        technologies: Some(6),
        broken_links: Some(2),
        green_grade: Some("B".to_string()),
        scan_duration_seconds: Some(12.4),
        competitor_score: None,
        winner: None,
        analyzer_errors: Vec::new(),
    }
}

#[test]
fn completion_stores_report_and_appends_history() {
    init_logging();
    let state = running_state();

    let (mut next, effects) = update(
        state,
        Msg::AuditCompleted {
            report: sample_report(),
        },
    );
    let view = next.view();

    assert_eq!(view.session, SessionState::Completed);
    assert_eq!(view.report.unwrap().global_score, Some(82));
    assert!(next.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::AppendHistory {
            url: "https://example.com/".to_string(),
            global_score: Some(82),
        }]
    );
}

#[test]
fn completion_outside_running_session_is_dropped() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = update(
        state,
        Msg::AuditCompleted {
            report: sample_report(),
        },
    );

    assert_eq!(next.view().session, SessionState::Idle);
    assert!(next.view().report.is_none());
    assert!(effects.is_empty());
}

#[test]
fn failure_stores_message() {
    init_logging();
    let state = running_state();

    let (next, effects) = update(
        state,
        Msg::AuditFailed {
            message: "stream ended without result".to_string(),
        },
    );
    let view = next.view();

    assert_eq!(view.session, SessionState::Failed);
    assert_eq!(
        view.failure.as_deref(),
        Some("stream ended without result")
    );
    assert!(effects.is_empty());
}

#[test]
fn versus_report_carries_winner() {
    init_logging();
    let state = running_state();

    let mut report = sample_report();
    report.competitor_score = Some(67);
    report.winner = Some(Verdict::Target);

    let (next, _effects) = update(state, Msg::AuditCompleted { report });
    let view_report = next.view().report.unwrap();

    assert_eq!(view_report.competitor_score, Some(67));
    assert_eq!(view_report.winner, Some(Verdict::Target));
}

#[test]
fn restore_history_populates_view() {
    init_logging();
    let state = AppState::new();

    let snapshots = vec![
        AuditSnapshot {
            url: "https://a.example.com/".to_string(),
            global_score: Some(90),
            analyzed_at: "2026-08-01T10:00:00Z".to_string(),
        },
        AuditSnapshot {
            url: "https://b.example.com/".to_string(),
            global_score: None,
            analyzed_at: "2026-08-02T10:00:00Z".to_string(),
        },
    ];
    let (mut next, effects) = update(state, Msg::RestoreHistory(snapshots.clone()));

    assert_eq!(next.view().history, snapshots);
    assert!(next.consume_dirty());
    assert!(effects.is_empty());
}
