use auditor_core::{AppViewModel, AuditSnapshot, ReportView, TaskState, Verdict};

const BAR_WIDTH: usize = 10;

/// Prints progress incrementally: only lines not yet shown are emitted, so
/// the main loop can re-render the view on every dirty tick.
pub struct Renderer {
    printed: usize,
    last_task: Option<(TaskState, u32)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            printed: 0,
            last_task: None,
        }
    }

    pub fn render_history(&self, history: &[AuditSnapshot]) {
        if history.is_empty() {
            return;
        }
        println!("Recent audits:");
        for snapshot in history.iter().rev().take(5) {
            match snapshot.global_score {
                Some(score) => println!("  {:>3}/100  {}  ({})", score, snapshot.url, snapshot.analyzed_at),
                None => println!("    -/100  {}  ({})", snapshot.url, snapshot.analyzed_at),
            }
        }
        println!();
    }

    pub fn render_progress(&mut self, view: &AppViewModel) {
        for line in &view.progress[self.printed..] {
            println!("  [{:<10}] {}", line.step, line.message);
        }
        self.printed = view.progress.len();

        if let Some(task) = view.task {
            let current = (task.status, task.attempt);
            if self.last_task != Some(current) {
                println!(
                    "  task {} (check {})",
                    task_label(task.status),
                    task.attempt
                );
                self.last_task = Some(current);
            }
        }
    }

    pub fn render_report(&self, report: &ReportView) {
        println!();
        println!("Audit report for {}", report.url);
        if let Some(score) = report.global_score {
            println!("  {:<14} {:>3}/100  {}", "Global", score, score_bar(score));
        }
        for category in &report.categories {
            println!(
                "  {:<14} {:>3}/100  {}",
                category.label,
                category.score,
                score_bar(category.score)
            );
        }

        if let Some(count) = report.technologies {
            println!("  {:<14} {}", "Technologies", count);
        }
        match (report.broken_links, report.green_grade.as_deref()) {
            (Some(broken), Some(grade)) => {
                println!("  {:<14} {}", "Broken links", broken);
                println!("  {:<14} {}", "Green grade", grade);
            }
            (Some(broken), None) => println!("  {:<14} {}", "Broken links", broken),
            (None, Some(grade)) => println!("  {:<14} {}", "Green grade", grade),
            (None, None) => {}
        }
        if let Some(duration) = report.scan_duration_seconds {
            println!("  {:<14} {duration:.1}s", "Scan took");
        }

        if let Some(competitor) = report.competitor_score {
            let verdict = match report.winner {
                Some(Verdict::Target) => "you win",
                Some(Verdict::Competitor) => "competitor wins",
                Some(Verdict::Draw) => "draw",
                None => "no verdict",
            };
            println!("  {:<14} {:>3}/100  ({verdict})", "Competitor", competitor);
        }

        for error in &report.analyzer_errors {
            println!("  warning: {error}");
        }
    }
}

fn task_label(status: TaskState) -> &'static str {
    match status {
        TaskState::Pending => "pending",
        TaskState::Running => "running",
        TaskState::Completed => "completed",
        TaskState::Failed => "failed",
    }
}

fn score_bar(score: u8) -> String {
    let filled = (usize::from(score.min(100)) * BAR_WIDTH) / 100;
    let mut bar = String::with_capacity(BAR_WIDTH);
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '.' });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bar_scales_with_the_score() {
        assert_eq!(score_bar(0), "..........");
        assert_eq!(score_bar(50), "#####.....");
        assert_eq!(score_bar(100), "##########");
    }

    #[test]
    fn score_bar_clamps_out_of_range_values() {
        assert_eq!(score_bar(250), "##########");
    }

    #[test]
    fn renderer_only_prints_new_progress_lines() {
        use auditor_core::{update, AppState, Msg};

        let (state, _) = update(
            AppState::new(),
            Msg::AuditSubmitted {
                url: "example.com".to_string(),
                competitor_url: None,
                lang: "en".to_string(),
            },
        );
        let (state, _) = update(
            state,
            Msg::StreamLogReceived {
                step: "fetch".to_string(),
                message: "downloading".to_string(),
            },
        );

        let mut renderer = Renderer::new();
        renderer.render_progress(&state.view());
        assert_eq!(renderer.printed, 1);

        // A second render with the same view emits nothing new.
        renderer.render_progress(&state.view());
        assert_eq!(renderer.printed, 1);
    }
}
