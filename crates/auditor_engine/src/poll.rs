use std::time::Duration;

use audit_logging::{audit_debug, audit_warn};
use reqwest::StatusCode;

use crate::progress::{Analyzer, ProgressSink};
use crate::protocol::{AnalyzeRequest, StartedTask, TaskSnapshot, TaskStatus};
use crate::types::map_reqwest_error;
use crate::{ApiClient, AuditError, AuditTarget, EngineEvent, FailureKind, JobId};

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Fixed delay between status checks. No backoff, no jitter.
    pub interval: Duration,
    /// Hard ceiling on status checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: 60,
        }
    }
}

/// Starts a background analysis task and polls it to a terminal state.
///
/// A 404 from the start endpoint means the backend predates the task
/// indirection; the legacy synchronous endpoint is used instead and the
/// caller never observes the difference.
#[derive(Debug, Clone)]
pub struct PollAnalyzer {
    client: ApiClient,
    settings: PollSettings,
}

impl PollAnalyzer {
    pub fn new(client: ApiClient, settings: PollSettings) -> Self {
        Self { client, settings }
    }

    async fn legacy_analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<serde_json::Value, AuditError> {
        let response = self
            .client
            .post_json("api/analyze", request)?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(ApiClient::failure_from_response(response).await);
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| AuditError::new(FailureKind::Protocol, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Analyzer for PollAnalyzer {
    async fn analyze(
        &self,
        job_id: JobId,
        target: &AuditTarget,
        sink: &dyn ProgressSink,
    ) -> Result<serde_json::Value, AuditError> {
        let request = AnalyzeRequest {
            url: target.url.clone(),
            lang: target.lang.clone(),
            competitor_url: target.competitor_url.clone(),
        };

        let response = self
            .client
            .post_json("api/analyze/async", &request)?
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            audit_debug!("async endpoint missing, using legacy synchronous analyze");
            return self.legacy_analyze(&request).await;
        }
        if !response.status().is_success() {
            return Err(ApiClient::failure_from_response(response).await);
        }

        let started: StartedTask = response
            .json()
            .await
            .map_err(|err| AuditError::new(FailureKind::Protocol, err.to_string()))?;
        let path = format!("api/tasks/{}", started.task_id);

        for attempt in 1..=self.settings.max_attempts {
            tokio::time::sleep(self.settings.interval).await;

            let response = self
                .client
                .get(&path)?
                .send()
                .await
                .map_err(map_reqwest_error)?;

            // A transient non-OK answer is retryable but still consumes
            // one of the fixed attempts.
            if !response.status().is_success() {
                audit_debug!(
                    "transient status {} polling task {} (attempt {attempt})",
                    response.status(),
                    started.task_id
                );
                continue;
            }

            let snapshot: TaskSnapshot = match response.json().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    audit_warn!("skipping unparsable task snapshot: {err}");
                    continue;
                }
            };

            sink.emit(EngineEvent::TaskStatus {
                job_id,
                status: snapshot.status,
                attempt,
            });

            match snapshot.status {
                TaskStatus::Completed => {
                    return snapshot.result.ok_or_else(|| {
                        AuditError::new(
                            FailureKind::Protocol,
                            "task completed without a result payload",
                        )
                    });
                }
                TaskStatus::Failed => {
                    let message = snapshot
                        .error
                        .unwrap_or_else(|| "analysis failed".to_string());
                    return Err(AuditError::new(FailureKind::Server, message));
                }
                TaskStatus::Pending | TaskStatus::Running => {}
            }
        }

        let attempts = self.settings.max_attempts;
        Err(AuditError::new(
            FailureKind::PollTimeout { attempts },
            format!("analysis did not finish within {attempts} status checks"),
        ))
    }
}
