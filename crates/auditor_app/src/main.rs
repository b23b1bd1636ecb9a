mod cli;
mod effects;
mod history;
mod render;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use audit_logging::audit_error;
use clap::Parser;
use log::LevelFilter;

use auditor_core::{
    update, AppState, CategoryScore, Msg, ReportView, SessionState, TaskState, Verdict,
};
use auditor_engine::{
    ApiClient, AtomicFileWriter, AuditOutcome, ClientSettings, EngineConfig, EngineEvent,
    EngineHandle, MonitorCreate, MonitorPatch, PollSettings, TaskStatus, Winner,
};

use effects::EffectRunner;
use render::Renderer;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    audit_logging::initialize(cli.log.into(), LevelFilter::Info);

    let settings = ClientSettings {
        base_url: cli.api_base.clone(),
        bearer_token: cli.token.clone(),
        ..ClientSettings::default()
    };

    match cli.command {
        cli::Command::Audit(args) => run_audit(settings, args),
        cli::Command::Health => run_health(settings),
        cli::Command::Monitor { command } => run_monitor(settings, command),
    }
}

fn run_audit(settings: ClientSettings, args: cli::AuditArgs) -> Result<()> {
    let engine = EngineHandle::new(EngineConfig {
        client: settings,
        poll: PollSettings::default(),
    })?;
    let history_dir = PathBuf::from(".");
    let mut runner = EffectRunner::new(engine, args.transport.into(), history_dir.clone());
    let mut renderer = Renderer::new();

    let mut state = AppState::new();
    let restored = history::load(&history_dir);
    if !restored.is_empty() {
        state = dispatch(state, Msg::RestoreHistory(restored), &mut runner);
        renderer.render_history(&state.view().history);
        state.consume_dirty();
    }

    println!("Auditing {} ...", args.url.trim());
    state = dispatch(
        state,
        Msg::AuditSubmitted {
            url: args.url.clone(),
            competitor_url: args.competitor.clone(),
            lang: args.lang.clone(),
        },
        &mut runner,
    );
    state.consume_dirty();

    loop {
        while let Some(event) = runner.try_recv() {
            let msg = handle_event(event, args.save.as_deref());
            state = dispatch(state, msg, &mut runner);
        }
        if state.consume_dirty() {
            renderer.render_progress(&state.view());
        }
        match state.session() {
            SessionState::Completed => {
                let view = state.view();
                if let Some(report) = view.report {
                    renderer.render_report(&report);
                }
                return Ok(());
            }
            SessionState::Failed => {
                let view = state.view();
                let message = view
                    .failure
                    .unwrap_or_else(|| "audit failed".to_string());
                bail!(message);
            }
            SessionState::Idle | SessionState::Running => thread::sleep(EVENT_POLL_INTERVAL),
        }
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &mut EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

fn handle_event(event: EngineEvent, save_dir: Option<&Path>) -> Msg {
    match event {
        EngineEvent::StreamLog { step, message, .. } => Msg::StreamLogReceived { step, message },
        EngineEvent::TaskStatus {
            status, attempt, ..
        } => Msg::TaskStatusChanged {
            status: task_state(status),
            attempt,
        },
        EngineEvent::AuditCompleted { result, .. } => match result {
            Ok(outcome) => {
                if let Some(dir) = save_dir {
                    save_report(dir, &outcome);
                }
                Msg::AuditCompleted {
                    report: report_view(&outcome),
                }
            }
            Err(err) => Msg::AuditFailed {
                message: err.to_string(),
            },
        },
    }
}

fn save_report(dir: &Path, outcome: &AuditOutcome) {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    match writer.write_report(&outcome.url, &outcome.data) {
        Ok(path) => println!("  report saved to {}", path.display()),
        Err(err) => audit_error!("failed to save report: {err}"),
    }
}

fn task_state(status: TaskStatus) -> TaskState {
    match status {
        TaskStatus::Pending => TaskState::Pending,
        TaskStatus::Running => TaskState::Running,
        TaskStatus::Completed => TaskState::Completed,
        TaskStatus::Failed => TaskState::Failed,
    }
}

fn report_view(outcome: &AuditOutcome) -> ReportView {
    let summary = &outcome.summary;
    let labelled = [
        ("Performance", summary.performance),
        ("SEO", summary.seo),
        ("Accessibility", summary.accessibility),
        ("Best practices", summary.best_practices),
        ("Security", summary.security),
        ("GDPR", summary.gdpr),
        ("Social", summary.social),
        ("Green IT", summary.green),
        ("DNS", summary.dns),
    ];
    let categories = labelled
        .into_iter()
        .filter_map(|(label, score)| {
            score.map(|score| CategoryScore {
                label: label.to_string(),
                score,
            })
        })
        .collect();

    ReportView {
        url: summary.url.clone().unwrap_or_else(|| outcome.url.clone()),
        global_score: summary.global_score,
        categories,
        technologies: summary.technologies,
        broken_links: summary.broken_links,
        green_grade: summary.green_grade.clone(),
        scan_duration_seconds: summary.scan_duration_seconds,
        competitor_score: summary.competitor_score,
        winner: summary.winner.map(|winner| match winner {
            Winner::Target => Verdict::Target,
            Winner::Competitor => Verdict::Competitor,
            Winner::Draw => Verdict::Draw,
        }),
        analyzer_errors: summary.analyzer_errors.clone(),
    }
}

fn run_health(settings: ClientSettings) -> Result<()> {
    let base = settings.base_url.clone();
    let client = ApiClient::new(&settings)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime
        .block_on(client.health())
        .with_context(|| format!("backend at {base} is not healthy"))?;
    println!("backend at {base} is healthy");
    Ok(())
}

fn run_monitor(settings: ClientSettings, command: cli::MonitorCommand) -> Result<()> {
    let client = ApiClient::new(&settings)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;

    match command {
        cli::MonitorCommand::List => {
            let monitors = runtime.block_on(client.list_monitors())?;
            if monitors.is_empty() {
                println!("no monitors registered");
                return Ok(());
            }
            for monitor in monitors {
                let active = if monitor.is_active { "active" } else { "paused" };
                let frequency = monitor.frequency.to_string();
                let score = monitor
                    .last_score
                    .map(|score| format!("{score}/100"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>4}  {:<7} {:<7} last {:<8} alert<{:<3}  {}",
                    monitor.id, frequency, active, score, monitor.threshold, monitor.url
                );
            }
        }
        cli::MonitorCommand::Add {
            url,
            frequency,
            threshold,
        } => {
            let url = auditor_core::normalize_target_url(&url)
                .map_err(|err| anyhow!("invalid url {url:?}: {err}"))?;
            let monitor = runtime.block_on(client.create_monitor(&MonitorCreate {
                url,
                frequency,
                threshold,
            }))?;
            println!("monitor {} created for {}", monitor.id, monitor.url);
        }
        cli::MonitorCommand::Rm { id } => {
            runtime.block_on(client.delete_monitor(id))?;
            println!("monitor {id} deleted");
        }
        cli::MonitorCommand::Toggle { id } => {
            let monitors = runtime.block_on(client.list_monitors())?;
            let monitor = monitors
                .into_iter()
                .find(|monitor| monitor.id == id)
                .with_context(|| format!("no monitor with id {id}"))?;
            let patch = MonitorPatch {
                is_active: Some(!monitor.is_active),
                ..MonitorPatch::default()
            };
            let updated = runtime.block_on(client.update_monitor(id, &patch))?;
            println!(
                "monitor {} is now {}",
                updated.id,
                if updated.is_active { "active" } else { "paused" }
            );
        }
    }
    Ok(())
}
