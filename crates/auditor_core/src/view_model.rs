use crate::{AuditSnapshot, ProgressLine, ReportView, SessionState, TaskProgress};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub target_url: Option<String>,
    pub progress: Vec<ProgressLine>,
    pub current_step: Option<String>,
    pub task: Option<TaskProgress>,
    pub report: Option<ReportView>,
    pub failure: Option<String>,
    pub history: Vec<AuditSnapshot>,
    pub dirty: bool,
}
