use std::path::PathBuf;

use audit_logging::audit_info;
use auditor_core::{AuditSnapshot, Effect};
use auditor_engine::{AuditTarget, EngineEvent, EngineHandle, JobId, Transport};
use chrono::Utc;

use crate::history;

/// Executes effects returned by the core update function and exposes the
/// engine's event stream to the main loop.
pub struct EffectRunner {
    engine: EngineHandle,
    transport: Transport,
    history_dir: PathBuf,
    next_job: JobId,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, transport: Transport, history_dir: PathBuf) -> Self {
        Self {
            engine,
            transport,
            history_dir,
            next_job: 1,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartAudit {
                    url,
                    lang,
                    competitor_url,
                } => {
                    let job_id = self.next_job;
                    self.next_job += 1;
                    audit_info!("StartAudit job_id={} url={}", job_id, url);
                    self.engine.start_audit(
                        job_id,
                        AuditTarget {
                            url,
                            lang,
                            competitor_url,
                        },
                        self.transport,
                    );
                }
                Effect::AppendHistory { url, global_score } => {
                    history::append(
                        &self.history_dir,
                        AuditSnapshot {
                            url,
                            global_score,
                            analyzed_at: Utc::now().to_rfc3339(),
                        },
                    );
                }
            }
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.engine.try_recv()
    }
}
