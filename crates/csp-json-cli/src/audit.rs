// crates/csp-json-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Events
// Description: Structured JSON-lines records of command executions.
// Purpose: Record what was processed and the verdict without echoing content.
// Dependencies: csp-json-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every command invocation produces one [`CommandAuditEvent`]. Events carry
//! digests and sizes of the inputs rather than the inputs themselves. Sinks
//! are selected by the `[audit]` config section and default to no-op.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use csp_json_core::HashDigest;
use serde::Serialize;

use crate::config::AuditConfig;
use crate::config::AuditSinkKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Command classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// `echo`.
    Echo,
    /// `validate`.
    Validate,
    /// `is-solved`.
    IsSolved,
    /// `generate`.
    Generate,
    /// `schema`.
    Schema,
}

/// Command outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Command completed and produced its output.
    Ok,
    /// `validate` classified the document as invalid.
    Invalid,
    /// `is-solved` found at least one violated constraint.
    Unsolved,
    /// Command failed.
    Error,
}

/// Audit payload for one command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Executed command.
    pub command: CommandKind,
    /// Command outcome.
    pub outcome: CommandOutcome,
    /// Input document size in bytes.
    pub input_bytes: Option<usize>,
    /// Digest of the raw input bytes.
    pub input_hash: Option<HashDigest>,
    /// Digest of the canonical document.
    pub canonical_hash: Option<HashDigest>,
    /// Violated constraint indices (`is-solved` only).
    pub violated_constraints: Option<Vec<usize>>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct an audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAuditEventParams {
    /// Executed command.
    pub command: CommandKind,
    /// Command outcome.
    pub outcome: CommandOutcome,
    /// Input document size in bytes.
    pub input_bytes: Option<usize>,
    /// Digest of the raw input bytes.
    pub input_hash: Option<HashDigest>,
    /// Digest of the canonical document.
    pub canonical_hash: Option<HashDigest>,
    /// Violated constraint indices.
    pub violated_constraints: Option<Vec<usize>>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl CommandAuditEventParams {
    /// Creates params with only the command and outcome set.
    #[must_use]
    pub const fn new(command: CommandKind, outcome: CommandOutcome) -> Self {
        Self {
            command,
            outcome,
            input_bytes: None,
            input_hash: None,
            canonical_hash: None,
            violated_constraints: None,
            error_kind: None,
        }
    }
}

impl CommandAuditEvent {
    /// Creates a new audit event stamped with the current time.
    #[must_use]
    pub fn new(params: CommandAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "csp_json_command",
            timestamp_ms,
            command: params.command,
            outcome: params.outcome,
            input_bytes: params.input_bytes,
            input_hash: params.input_hash,
            canonical_hash: params.canonical_hash,
            violated_constraints: params.violated_constraints,
            error_kind: params.error_kind,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for command audit events.
pub trait AuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &CommandAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &CommandAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &CommandAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &CommandAuditEvent) {}
}

/// Builds the sink selected by `config`.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log.
pub fn build_sink(config: &AuditConfig) -> io::Result<Box<dyn AuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
        (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => Ok(Box::new(FileAuditSink::new(Path::new(path.trim()))?)),
        (AuditSinkKind::File, None) => {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "audit.path is required"))
        }
    }
}
