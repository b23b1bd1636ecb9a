use crate::{normalize_target_url, AppState, AuditTarget, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AuditSubmitted {
            url,
            competitor_url,
            lang,
        } => {
            // One logical operation per user action: a submission while an
            // audit is running is ignored.
            if state.session() == SessionState::Running {
                return (state, Vec::new());
            }

            let normalized = match normalize_target_url(&url) {
                Ok(normalized) => normalized,
                Err(err) => {
                    state.fail(format!("invalid url {url:?}: {err}"));
                    return (state, Vec::new());
                }
            };
            let competitor = match competitor_url.as_deref() {
                None => None,
                Some(raw) => match normalize_target_url(raw) {
                    Ok(normalized) => Some(normalized),
                    Err(err) => {
                        state.fail(format!("invalid competitor url {raw:?}: {err}"));
                        return (state, Vec::new());
                    }
                },
            };

            let target = AuditTarget {
                url: normalized,
                lang,
                competitor_url: competitor,
            };
            state.begin_audit(target.clone());
            vec![Effect::StartAudit {
                url: target.url,
                lang: target.lang,
                competitor_url: target.competitor_url,
            }]
        }
        Msg::StreamLogReceived { step, message } => {
            // Late events from an aborted attempt carry no meaning.
            if state.session() == SessionState::Running {
                state.apply_stream_log(step, message);
            }
            Vec::new()
        }
        Msg::TaskStatusChanged { status, attempt } => {
            if state.session() == SessionState::Running {
                state.apply_task_status(status, attempt);
            }
            Vec::new()
        }
        Msg::AuditCompleted { report } => {
            if state.session() != SessionState::Running {
                return (state, Vec::new());
            }
            let effect = Effect::AppendHistory {
                url: report.url.clone(),
                global_score: report.global_score,
            };
            state.complete(report);
            vec![effect]
        }
        Msg::AuditFailed { message } => {
            if state.session() == SessionState::Running {
                state.fail(message);
            }
            Vec::new()
        }
        Msg::RestoreHistory(snapshots) => {
            state.restore_history(snapshots);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
