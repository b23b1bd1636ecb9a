use std::sync::Once;

use auditor_core::{update, AppState, Effect, Msg, SessionState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(audit_logging::initialize_for_tests);
}

fn submit(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::AuditSubmitted {
            url: url.to_string(),
            competitor_url: None,
            lang: "en".to_string(),
        },
    )
}

#[test]
fn submission_normalizes_url_and_starts_audit() {
    init_logging();
    let state = AppState::new();

    let (mut next, effects) = submit(state, "  example.com  ");
    let view = next.view();

    assert_eq!(view.session, SessionState::Running);
    assert_eq!(view.target_url.as_deref(), Some("https://example.com/"));
    assert!(next.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::StartAudit {
            url: "https://example.com/".to_string(),
            lang: "en".to_string(),
            competitor_url: None,
        }]
    );
}

#[test]
fn explicit_scheme_is_preserved() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = submit(state, "http://insecure.example.com/path");

    assert_eq!(
        next.view().target_url.as_deref(),
        Some("http://insecure.example.com/path")
    );
    assert_eq!(effects.len(), 1);
}

#[test]
fn submission_while_running_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (mut state, _effects) = submit(state, "example.com");
    assert!(state.consume_dirty());

    let (mut next, effects) = submit(state, "other.example.com");

    assert_eq!(next.view().session, SessionState::Running);
    assert_eq!(
        next.view().target_url.as_deref(),
        Some("https://example.com/")
    );
    assert!(effects.is_empty());
    // Nothing changed, so nothing to render.
    assert!(!next.consume_dirty());
}

#[test]
fn invalid_url_fails_without_effects() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = submit(state, "http://");
    let view = next.view();

    assert_eq!(view.session, SessionState::Failed);
    assert!(view.failure.unwrap().contains("invalid url"));
    assert!(effects.is_empty());
}

#[test]
fn invalid_competitor_url_fails_without_effects() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = update(
        state,
        Msg::AuditSubmitted {
            url: "example.com".to_string(),
            competitor_url: Some("http://".to_string()),
            lang: "en".to_string(),
        },
    );

    assert_eq!(next.view().session, SessionState::Failed);
    assert!(effects.is_empty());
}

#[test]
fn competitor_url_is_normalized_into_effect() {
    init_logging();
    let state = AppState::new();

    let (_next, effects) = update(
        state,
        Msg::AuditSubmitted {
            url: "example.com".to_string(),
            competitor_url: Some("rival.example.com".to_string()),
            lang: "fr".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartAudit {
            url: "https://example.com/".to_string(),
            lang: "fr".to_string(),
            competitor_url: Some("https://rival.example.com/".to_string()),
        }]
    );
}

#[test]
fn resubmission_after_failure_clears_previous_progress() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit(state, "example.com");
    let (state, _effects) = update(
        state,
        Msg::StreamLogReceived {
            step: "seo".to_string(),
            message: "checking meta tags".to_string(),
        },
    );
    let (state, _effects) = update(
        state,
        Msg::AuditFailed {
            message: "network error".to_string(),
        },
    );
    assert_eq!(state.view().progress.len(), 1);
    assert!(state.view().failure.is_some());

    let (next, effects) = submit(state, "example.com");
    let view = next.view();

    assert_eq!(view.session, SessionState::Running);
    assert!(view.progress.is_empty());
    assert!(view.current_step.is_none());
    assert!(view.failure.is_none());
    assert_eq!(effects.len(), 1);
}
