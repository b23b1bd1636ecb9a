//! Wire types for the audit backend API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One message on the streaming transport, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMessage {
    /// Progress line; `step` names the analyzer currently running.
    Log { step: String, message: String },
    /// Terminal result. The payload shape is owned by the backend.
    Complete { data: serde_json::Value },
    /// Terminal failure reported by the backend.
    Error { message: String },
}

/// Status of a background scan task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Response to starting an asynchronous analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct StartedTask {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Snapshot returned by the task-status endpoint. The client holds no
/// authoritative copy; it polls and discards.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for both the async and the legacy synchronous endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_url: Option<String>,
}

/// FastAPI-style error body carried on non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// How often a monitor re-scans its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(format!("unknown frequency {other:?} (daily|weekly)")),
        }
    }
}

/// A scheduled re-scan record, as served by the monitors endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Monitor {
    pub id: i64,
    pub url: String,
    pub frequency: Frequency,
    pub is_active: bool,
    #[serde(default)]
    pub last_score: Option<i64>,
    pub threshold: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_checked_at: Option<String>,
}

/// Payload for creating a monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorCreate {
    pub url: String,
    pub frequency: Frequency,
    pub threshold: u8,
}

/// Partial update for a monitor; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_message_variants_parse_by_tag() {
        let log: StreamMessage =
            serde_json::from_str(r#"{"type":"log","step":"seo","message":"checking meta tags"}"#)
                .unwrap();
        assert_eq!(
            log,
            StreamMessage::Log {
                step: "seo".to_string(),
                message: "checking meta tags".to_string(),
            }
        );

        let complete: StreamMessage =
            serde_json::from_str(r#"{"type":"complete","data":{"global_score":82}}"#).unwrap();
        assert!(matches!(complete, StreamMessage::Complete { .. }));

        let error: StreamMessage =
            serde_json::from_str(r#"{"type":"error","message":"scan failed"}"#).unwrap();
        assert!(matches!(error, StreamMessage::Error { .. }));
    }

    #[test]
    fn task_snapshot_tolerates_missing_optionals() {
        let snapshot: TaskSnapshot =
            serde_json::from_str(r#"{"status":"running"}"#).unwrap();
        assert_eq!(snapshot.status, TaskStatus::Running);
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn analyze_request_omits_absent_competitor() {
        let body = serde_json::to_string(&AnalyzeRequest {
            url: "https://example.com/".to_string(),
            lang: "en".to_string(),
            competitor_url: None,
        })
        .unwrap();
        assert!(!body.contains("competitor_url"));
    }
}
