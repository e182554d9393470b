//! Activity domain — the user-facing audit trail of every operation.

pub mod state;

pub use state::{ActivityLog, DEFAULT_LOG_CAPACITY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of an activity entry, used by the view for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogKind::Info => write!(f, "info"),
            LogKind::Success => write!(f, "success"),
            LogKind::Error => write!(f, "error"),
        }
    }
}

/// One timestamped activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub kind: LogKind,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            kind,
        }
    }
}
