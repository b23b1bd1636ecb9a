use url::Url;

/// Lifecycle of the single audit session driven by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// Status of the backend task, as reported by the poll transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// What the user asked to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    pub url: String,
    pub lang: String,
    pub competitor_url: Option<String>,
}

/// One progress line received from the backend, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLine {
    pub step: String,
    pub message: String,
}

/// Latest task status observed while polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProgress {
    pub status: TaskState,
    pub attempt: u32,
}

/// Outcome of a competitor comparison, when the backend ran one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Target,
    Competitor,
    Draw,
}

/// A labelled 0-100 score for one audit category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub label: String,
    pub score: u8,
}

/// Renderable view of a finished audit.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub url: String,
    pub global_score: Option<u8>,
    pub categories: Vec<CategoryScore>,
    pub technologies: Option<usize>,
    pub broken_links: Option<usize>,
    pub green_grade: Option<String>,
    pub scan_duration_seconds: Option<f64>,
    pub competitor_score: Option<u8>,
    pub winner: Option<Verdict>,
    pub analyzer_errors: Vec<String>,
}

/// A previously completed audit restored from persisted history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSnapshot {
    pub url: String,
    pub global_score: Option<u8>,
    pub analyzed_at: String,
}

/// Normalize a user-entered URL the way the backend validator does:
/// trim whitespace, assume https when no scheme is given, then parse.
pub fn normalize_target_url(raw: &str) -> Result<String, url::ParseError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = Url::parse(&candidate)?;
    if !parsed.has_host() {
        return Err(url::ParseError::EmptyHost);
    }
    Ok(parsed.to_string())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: SessionState,
    target: Option<AuditTarget>,
    progress: Vec<ProgressLine>,
    current_step: Option<String>,
    task: Option<TaskProgress>,
    report: Option<ReportView>,
    failure: Option<String>,
    history: Vec<AuditSnapshot>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn view(&self) -> crate::AppViewModel {
        crate::AppViewModel {
            session: self.session,
            target_url: self.target.as_ref().map(|t| t.url.clone()),
            progress: self.progress.clone(),
            current_step: self.current_step.clone(),
            task: self.task,
            report: self.report.clone(),
            failure: self.failure.clone(),
            history: self.history.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Start a fresh attempt: previous progress, outcome, and failure are
    /// discarded (they stay visible only until this point).
    pub(crate) fn begin_audit(&mut self, target: AuditTarget) {
        self.session = SessionState::Running;
        self.target = Some(target);
        self.progress.clear();
        self.current_step = None;
        self.task = None;
        self.report = None;
        self.failure = None;
        self.dirty = true;
    }

    pub(crate) fn apply_stream_log(&mut self, step: String, message: String) {
        self.current_step = Some(step.clone());
        self.progress.push(ProgressLine { step, message });
        self.dirty = true;
    }

    pub(crate) fn apply_task_status(&mut self, status: TaskState, attempt: u32) {
        self.task = Some(TaskProgress { status, attempt });
        self.dirty = true;
    }

    pub(crate) fn complete(&mut self, report: ReportView) {
        self.session = SessionState::Completed;
        self.report = Some(report);
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.session = SessionState::Failed;
        self.failure = Some(message);
        self.dirty = true;
    }

    pub(crate) fn restore_history(&mut self, snapshots: Vec<AuditSnapshot>) {
        self.history = snapshots;
        self.dirty = true;
    }
}
