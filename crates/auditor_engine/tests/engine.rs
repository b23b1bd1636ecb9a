use std::time::{Duration, Instant};

use auditor_engine::{
    AuditTarget, ClientSettings, EngineConfig, EngineEvent, EngineHandle, Transport,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> EngineConfig {
    EngineConfig {
        client: ClientSettings {
            base_url: server.uri(),
            ..ClientSettings::default()
        },
        ..EngineConfig::default()
    }
}

fn target() -> AuditTarget {
    AuditTarget {
        url: "https://example.com/".to_string(),
        lang: "en".to_string(),
        competitor_url: None,
    }
}

async fn drain_until_completed(engine: &EngineHandle) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    loop {
        while let Some(event) = engine.try_recv() {
            let done = matches!(event, EngineEvent::AuditCompleted { .. });
            events.push(event);
            if done {
                return events;
            }
        }
        assert!(Instant::now() < deadline, "engine never completed the audit");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn stream_audit_flows_through_the_handle() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"type\":\"log\",\"step\":\"fetch\",\"message\":\"downloading page\"}\n",
        "{\"type\":\"complete\",\"data\":{\"url\":\"https://example.com/\",\"global_score\":82}}\n",
    );
    Mock::given(method("GET"))
        .and(path("/api/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(config(&server)).expect("engine");
    engine.start_audit(1, target(), Transport::Stream);

    let events = drain_until_completed(&engine).await;
    assert!(matches!(
        &events[0],
        EngineEvent::StreamLog { job_id: 1, step, .. } if step == "fetch"
    ));
    match events.last().unwrap() {
        EngineEvent::AuditCompleted { job_id: 1, result } => {
            let outcome = result.as_ref().expect("audit ok");
            assert_eq!(outcome.summary.global_score, Some(82));
            assert_eq!(outcome.data["global_score"], 82);
        }
        other => panic!("unexpected terminal event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_audit_reports_the_error_through_the_handle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(config(&server)).expect("engine");
    engine.start_audit(2, target(), Transport::Stream);

    let events = drain_until_completed(&engine).await;
    match events.last().unwrap() {
        EngineEvent::AuditCompleted { job_id: 2, result } => {
            assert!(result.is_err());
        }
        other => panic!("unexpected terminal event: {other:?}"),
    }
}
