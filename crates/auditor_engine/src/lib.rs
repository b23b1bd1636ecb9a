//! Auditor engine: HTTP protocol clients and effect execution.
mod client;
mod engine;
mod ndjson;
mod persist;
mod poll;
mod progress;
mod protocol;
mod report;
mod stream;
mod types;

pub use client::{ApiClient, ClientSettings};
pub use engine::{EngineConfig, EngineHandle};
pub use persist::{ensure_output_dir, report_filename, AtomicFileWriter, PersistError};
pub use poll::{PollAnalyzer, PollSettings};
pub use progress::{Analyzer, ChannelProgressSink, ProgressSink};
pub use protocol::{
    AnalyzeRequest, Frequency, Monitor, MonitorCreate, MonitorPatch, StartedTask, StreamMessage,
    TaskSnapshot, TaskStatus,
};
pub use report::{summarize, ReportSummary, Winner};
pub use stream::StreamAnalyzer;
pub use types::{
    AuditError, AuditOutcome, AuditTarget, EngineEvent, FailureKind, JobId, Transport,
};
