use audit_logging::audit_warn;
use futures_util::StreamExt;

use crate::ndjson::LineBuffer;
use crate::progress::{Analyzer, ProgressSink};
use crate::protocol::StreamMessage;
use crate::types::map_reqwest_error;
use crate::{ApiClient, AuditError, AuditTarget, EngineEvent, FailureKind, JobId};

/// Consumes the incremental `GET /api/stream` transport.
///
/// Progress lines are forwarded through the sink as they arrive; the
/// terminal `complete` payload is returned once the server closes the
/// stream. A backend-reported `error` aborts immediately.
#[derive(Debug, Clone)]
pub struct StreamAnalyzer {
    client: ApiClient,
}

impl StreamAnalyzer {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Analyzer for StreamAnalyzer {
    async fn analyze(
        &self,
        job_id: JobId,
        target: &AuditTarget,
        sink: &dyn ProgressSink,
    ) -> Result<serde_json::Value, AuditError> {
        let response = self
            .client
            .get_streaming("api/stream")?
            .query(&[("url", target.url.as_str()), ("lang", target.lang.as_str())])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClient::failure_from_response(response).await);
        }

        let mut body = response.bytes_stream();
        let mut buffer = LineBuffer::new();
        let mut result: Option<serde_json::Value> = None;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            for line in buffer.push(&chunk) {
                if let Some(data) = apply_line(job_id, &line, sink)? {
                    // Keep reading; the server closes the stream after this.
                    result = Some(data);
                }
            }
        }
        if let Some(line) = buffer.flush() {
            if let Some(data) = apply_line(job_id, &line, sink)? {
                result = Some(data);
            }
        }

        result.ok_or_else(|| {
            AuditError::new(FailureKind::Protocol, "stream ended without result")
        })
    }
}

/// Handle one complete line. Returns the final payload for a `complete`
/// message, an error for a backend-reported `error`, and `None` otherwise.
/// Lines that fail to decode or parse are logged and skipped; only an
/// explicit backend error aborts the stream.
fn apply_line(
    job_id: JobId,
    line: &[u8],
    sink: &dyn ProgressSink,
) -> Result<Option<serde_json::Value>, AuditError> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(err) => {
            audit_warn!("skipping non-utf8 stream line: {err}");
            return Ok(None);
        }
    };
    if text.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<StreamMessage>(text) {
        Ok(StreamMessage::Log { step, message }) => {
            sink.emit(EngineEvent::StreamLog {
                job_id,
                step,
                message,
            });
            Ok(None)
        }
        Ok(StreamMessage::Complete { data }) => Ok(Some(data)),
        Ok(StreamMessage::Error { message }) => {
            Err(AuditError::new(FailureKind::Server, message))
        }
        Err(err) => {
            audit_warn!("skipping unparsable stream line: {err}");
            Ok(None)
        }
    }
}
