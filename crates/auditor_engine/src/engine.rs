use std::sync::mpsc;
use std::thread;

use audit_logging::audit_error;

use crate::progress::{Analyzer, ChannelProgressSink};
use crate::report::summarize;
use crate::{
    ApiClient, AuditOutcome, AuditTarget, ClientSettings, EngineEvent, JobId, PollAnalyzer,
    PollSettings, StreamAnalyzer, Transport,
};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub client: ClientSettings,
    pub poll: PollSettings,
}

enum EngineCommand {
    StartAudit {
        job_id: JobId,
        target: AuditTarget,
        transport: Transport,
    },
}

/// Bridge between the synchronous UI loop and the async protocol clients.
///
/// Commands go in over a std channel; a dedicated thread owns the Tokio
/// runtime and spawns one task per audit; events come back the same way.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, crate::AuditError> {
        let client = ApiClient::new(&config.client)?;
        let poll = config.poll;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    audit_error!("failed to start engine runtime: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client, poll, command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_audit(&self, job_id: JobId, target: AuditTarget, transport: Transport) {
        let _ = self.cmd_tx.send(EngineCommand::StartAudit {
            job_id,
            target,
            transport,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    client: ApiClient,
    poll: PollSettings,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::StartAudit {
            job_id,
            target,
            transport,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = match transport {
                Transport::Stream => {
                    StreamAnalyzer::new(client)
                        .analyze(job_id, &target, &sink)
                        .await
                }
                Transport::Poll => {
                    PollAnalyzer::new(client, poll)
                        .analyze(job_id, &target, &sink)
                        .await
                }
            };
            let result = result.map(|data| AuditOutcome {
                url: target.url,
                summary: summarize(&data),
                data,
            });
            let _ = event_tx.send(EngineEvent::AuditCompleted { job_id, result });
        }
    }
}
