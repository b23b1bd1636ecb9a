use std::sync::Once;

use auditor_core::{update, AppState, Effect, Msg, TaskState};

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

fn stream_log(state: AppState, step: &str, message: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StreamLogReceived {
            step: step.to_string(),
            message: message.to_string(),
        },
    )
}

#[test]
fn progress_lines_are_kept_in_arrival_order() {
    init_logging();
    let state = running_state();

    let (state, _) = stream_log(state, "fetch", "downloading page");
    let (state, _) = stream_log(state, "seo", "checking meta tags");
    let (mut state, _) = stream_log(state, "security", "checking headers");

    let view = state.view();
    let messages: Vec<&str> = view
        .progress
        .iter()
        .map(|line| line.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec!["downloading page", "checking meta tags", "checking headers"]
    );
    assert!(state.consume_dirty());
}

#[test]
fn current_step_is_last_write_wins() {
    init_logging();
    let state = running_state();

    let (state, _) = stream_log(state, "fetch", "downloading page");
    let (state, _) = stream_log(state, "seo", "checking meta tags");

    assert_eq!(state.view().current_step.as_deref(), Some("seo"));
}

#[test]
fn progress_outside_running_session_is_dropped() {
    init_logging();
    let mut state = AppState::new();
    assert!(!state.consume_dirty());

    let (mut next, effects) = stream_log(state, "seo", "late event");

    assert!(next.view().progress.is_empty());
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn task_status_updates_are_recorded_with_attempt() {
    init_logging();
    let state = running_state();

    let (state, _) = update(
        state,
        Msg::TaskStatusChanged {
            status: TaskState::Pending,
            attempt: 1,
        },
    );
    let (state, _) = update(
        state,
        Msg::TaskStatusChanged {
            status: TaskState::Running,
            attempt: 4,
        },
    );

    let task = state.view().task.unwrap();
    assert_eq!(task.status, TaskState::Running);
    assert_eq!(task.attempt, 4);
}

#[test]
fn task_status_outside_running_session_is_dropped() {
    init_logging();
    let state = AppState::new();

    let (state, _) = update(
        state,
        Msg::TaskStatusChanged {
            status: TaskState::Running,
            attempt: 1,
        },
    );

    assert!(state.view().task.is_none());
}
