//! RON-persisted record of recently completed audits.
//!
//! Stored in `.siteauditor_history.ron` in the working directory. Loading is
//! lenient: a missing or corrupt file starts an empty history.

use std::fs;
use std::path::{Path, PathBuf};

use audit_logging::{audit_error, audit_info, audit_warn};
use auditor_core::AuditSnapshot;
use auditor_engine::AtomicFileWriter;
use serde::{Deserialize, Serialize};

const HISTORY_FILENAME: &str = ".siteauditor_history.ron";
const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedAudit {
    url: String,
    global_score: Option<u8>,
    analyzed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedHistory {
    audits: Vec<PersistedAudit>,
}

fn read_raw(dir: &Path) -> PersistedHistory {
    let path = dir.join(HISTORY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PersistedHistory::default();
        }
        Err(err) => {
            audit_warn!("Failed to read audit history from {:?}: {}", path, err);
            return PersistedHistory::default();
        }
    };

    match ron::from_str(&content) {
        Ok(history) => history,
        Err(err) => {
            audit_warn!("Failed to parse audit history from {:?}: {}", path, err);
            PersistedHistory::default()
        }
    }
}

pub(crate) fn load(dir: &Path) -> Vec<AuditSnapshot> {
    let history = read_raw(dir);
    if !history.audits.is_empty() {
        audit_info!("Loaded {} persisted audits", history.audits.len());
    }
    history
        .audits
        .into_iter()
        .map(|audit| AuditSnapshot {
            url: audit.url,
            global_score: audit.global_score,
            analyzed_at: audit.analyzed_at,
        })
        .collect()
}

pub(crate) fn append(dir: &Path, snapshot: AuditSnapshot) {
    let mut history = read_raw(dir);
    history.audits.push(PersistedAudit {
        url: snapshot.url,
        global_score: snapshot.global_score,
        analyzed_at: snapshot.analyzed_at,
    });
    // Keep only the most recent entries.
    if history.audits.len() > HISTORY_LIMIT {
        let excess = history.audits.len() - HISTORY_LIMIT;
        history.audits.drain(..excess);
    }

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&history, pretty) {
        Ok(text) => text,
        Err(err) => {
            audit_error!("Failed to serialize audit history: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(dir));
    if let Err(err) = writer.write(HISTORY_FILENAME, &content) {
        audit_error!("Failed to write audit history to {:?}: {}", dir, err);
    }
}
