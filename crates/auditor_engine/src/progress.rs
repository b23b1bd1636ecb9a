use std::sync::mpsc;

use crate::{AuditError, AuditTarget, EngineEvent, JobId};

/// Side channel for progress events observed while an audit runs.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink that forwards events over a std channel.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// One way of obtaining an audit result from the backend.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    /// Run one audit to completion, emitting progress through `sink`.
    /// Returns the backend-owned result payload.
    async fn analyze(
        &self,
        job_id: JobId,
        target: &AuditTarget,
        sink: &dyn ProgressSink,
    ) -> Result<serde_json::Value, AuditError>;
}
