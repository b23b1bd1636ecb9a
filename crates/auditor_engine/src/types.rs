use std::fmt;

use crate::protocol::TaskStatus;
use crate::report::ReportSummary;

pub type JobId = u64;

/// How the result is obtained from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Incremental newline-delimited JSON over a single GET.
    Stream,
    /// Background task started via POST, polled until terminal.
    Poll,
}

/// What to audit, as passed down from the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    pub url: String,
    pub lang: String,
    pub competitor_url: Option<String>,
}

/// Events emitted by the engine while an audit is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Progress line from the stream transport.
    StreamLog {
        job_id: JobId,
        step: String,
        message: String,
    },
    /// Task status observed by the poll transport.
    TaskStatus {
        job_id: JobId,
        status: TaskStatus,
        attempt: u32,
    },
    /// Terminal outcome for a job.
    AuditCompleted {
        job_id: JobId,
        result: Result<AuditOutcome, AuditError>,
    },
}

/// A finished audit: the backend-owned payload plus a tolerant summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    pub url: String,
    /// Raw result payload, passed through untouched.
    pub data: serde_json::Value,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AuditError {
    pub kind: FailureKind,
    pub message: String,
}

impl AuditError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected before any request was made.
    InvalidUrl,
    /// Transport-level failure.
    Network,
    /// Request-level timeout.
    Timeout,
    /// Non-success response outside the tolerated poll case.
    HttpStatus(u16),
    /// Malformed terminal state (e.g. stream ended without a result).
    Protocol,
    /// Explicit failure reported by the backend.
    Server,
    /// Poll attempt limit exhausted without a terminal status.
    PollTimeout { attempts: u32 },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Protocol => write!(f, "protocol error"),
            FailureKind::Server => write!(f, "server error"),
            FailureKind::PollTimeout { attempts } => {
                write!(f, "timed out after {attempts} poll attempts")
            }
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> AuditError {
    if err.is_timeout() {
        return AuditError::new(FailureKind::Timeout, err.to_string());
    }
    AuditError::new(FailureKind::Network, err.to_string())
}
