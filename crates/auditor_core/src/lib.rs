//! Auditor core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    normalize_target_url, AppState, AuditSnapshot, AuditTarget, CategoryScore, ProgressLine,
    ReportView, SessionState, TaskProgress, TaskState, Verdict,
};
pub use update::update;
pub use view_model::AppViewModel;
