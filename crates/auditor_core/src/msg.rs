#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a URL for auditing.
    AuditSubmitted {
        url: String,
        competitor_url: Option<String>,
        lang: String,
    },
    /// Backend emitted a progress line on the stream transport.
    StreamLogReceived { step: String, message: String },
    /// Backend task status observed on the poll transport.
    TaskStatusChanged {
        status: crate::TaskState,
        attempt: u32,
    },
    /// The audit finished with a renderable report.
    AuditCompleted { report: crate::ReportView },
    /// The audit failed with a human-readable message.
    AuditFailed { message: String },
    /// Restore previously completed audits from persisted history.
    RestoreHistory(Vec<crate::AuditSnapshot>),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
