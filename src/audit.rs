//! JSONL audit logging for write-guard
//!
//! Records every terminal outcome to a JSONL file for later analysis.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::input::HookInput;
use crate::output::{BlockCategory, Verdict};

/// Log level for audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Allowed,
    Blocked,
    Fault,
    Malformed,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub level: LogLevel,

    /// Tool that was invoked; empty for malformed input
    pub tool: String,

    /// Candidate path (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Block category (if blocked)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub reason: String,

    /// Set when the block was only reported
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from input and verdict
    pub fn new(input: &HookInput, verdict: &Verdict, dry_run: bool) -> Self {
        let level = match verdict {
            Verdict::Allowed { .. } => LogLevel::Allowed,
            Verdict::Blocked {
                category: BlockCategory::Fault,
                ..
            } => LogLevel::Fault,
            Verdict::Blocked { .. } => LogLevel::Blocked,
            Verdict::FaultAllowed { .. } => LogLevel::Fault,
        };

        Self {
            timestamp: Utc::now(),
            level,
            tool: input.tool_name.clone(),
            file_path: input.file_path().map(String::from),
            category: verdict.category().map(|c| c.label().to_string()),
            reason: verdict.reason().to_string(),
            dry_run: dry_run && verdict.is_blocked(),
            session_id: input.session_id.clone(),
        }
    }

    /// Entry for a payload that could not be parsed
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: LogLevel::Malformed,
            tool: String::new(),
            file_path: None,
            category: None,
            reason: detail.into(),
            dry_run: false,
            session_id: None,
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger; `None` or an unopenable path disables it
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!(path = %parent.display(), error = %e, "Could not create audit log directory");
                }
            }

            OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .inspect_err(|e| tracing::warn!(path = %p.display(), error = %e, "Audit log unavailable"))
                .ok()
                .map(BufWriter::new)
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a verdict
    pub fn log_verdict(
        &mut self,
        input: &HookInput,
        verdict: &Verdict,
        dry_run: bool,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(input, verdict, dry_run);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
