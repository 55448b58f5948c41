// crates/csp-json-cli/src/commands.rs
// ============================================================================
// Module: CLI Commands
// Description: Pure implementations of the csp-json subcommands.
// Purpose: Map input bytes to stdout text and audit data without doing I/O.
// Dependencies: csp-json-core, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! Each command takes already-read inputs and returns a [`CommandOutput`]
//! holding the exact stdout text plus audit parameters. File reading, stream
//! writing, and exit codes stay in the binary entry point.

// ============================================================================
// SECTION: Imports
// ============================================================================

use csp_json_core::AssignmentError;
use csp_json_core::Document;
use csp_json_core::GenerateError;
use csp_json_core::ParseError;
use csp_json_core::UrbcspParams;
use csp_json_core::Verdict;
use csp_json_core::csp_json_schema;
use csp_json_core::document_digest;
use csp_json_core::evaluate;
use csp_json_core::generate_instances;
use csp_json_core::parse_assignment;
use csp_json_core::parse_document;
use csp_json_core::sha256_digest;
use csp_json_core::to_canonical_string;
use thiserror::Error;

use crate::audit::CommandAuditEventParams;
use crate::audit::CommandKind;
use crate::audit::CommandOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Stdout text and audit data produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exact text for stdout.
    pub stdout: String,
    /// Audit parameters describing the invocation.
    pub audit: CommandAuditEventParams,
}

/// Result of the `validate` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateReport {
    /// Classification of the document.
    pub verdict: Verdict,
    /// Parse failure behind an invalid verdict.
    pub error: Option<ParseError>,
    /// Stdout text and audit data.
    pub output: CommandOutput,
}

/// Errors raised by command implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The CSP document failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The solution failed to parse or check.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    /// The generator rejected its parameters.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// The requested instance index overflowed.
    #[error("instance index {0} is too large")]
    InstanceTooLarge(usize),
    /// The schema could not be serialized.
    #[error("failed to serialize schema: {0}")]
    Schema(String),
}

impl CommandError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parse(ParseError::Syntax(_)) => "document_syntax",
            Self::Parse(ParseError::Schema(_)) => "document_schema",
            Self::Parse(ParseError::Shape(_)) => "document_shape",
            Self::Parse(ParseError::Document(_)) => "document_invalid",
            Self::Assignment(AssignmentError::Syntax(_)) => "solution_syntax",
            Self::Assignment(AssignmentError::ArityMismatch { .. }) => "solution_arity",
            Self::Assignment(AssignmentError::OutOfRange { .. }) => "solution_range",
            Self::Assignment(AssignmentError::UnresolvedConstraint { .. }) => "document_inconsistent",
            Self::Generate(_) | Self::InstanceTooLarge(_) => "generate_params",
            Self::Schema(_) => "schema_serialize",
        }
    }
}

/// Builds audit parameters for a failed command.
#[must_use]
pub fn failure_audit(
    command: CommandKind,
    input: Option<&[u8]>,
    error_kind: &'static str,
) -> CommandAuditEventParams {
    let mut audit = CommandAuditEventParams::new(command, CommandOutcome::Error);
    audit.input_bytes = input.map(<[u8]>::len);
    audit.input_hash = input.map(sha256_digest);
    audit.error_kind = Some(error_kind);
    audit
}

/// Builds audit parameters for a parsed document.
fn document_audit(
    command: CommandKind,
    outcome: CommandOutcome,
    input: &[u8],
    document: &Document,
) -> CommandAuditEventParams {
    let mut audit = CommandAuditEventParams::new(command, outcome);
    audit.input_bytes = Some(input.len());
    audit.input_hash = Some(sha256_digest(input));
    audit.canonical_hash = Some(document_digest(document));
    audit
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Parses a document and renders it in canonical layout.
///
/// # Errors
///
/// Returns [`CommandError::Parse`] when the document is invalid.
pub fn echo(input: &[u8]) -> Result<CommandOutput, CommandError> {
    let document = parse_document(input)?;
    Ok(CommandOutput {
        stdout: to_canonical_string(&document),
        audit: document_audit(CommandKind::Echo, CommandOutcome::Ok, input, &document),
    })
}

/// Classifies a document as `OK` or `Invalid`.
#[must_use]
pub fn validate(input: &[u8]) -> ValidateReport {
    match parse_document(input) {
        Ok(document) => ValidateReport {
            verdict: Verdict::Valid,
            error: None,
            output: CommandOutput {
                stdout: format!("{}\n", Verdict::Valid.label()),
                audit: document_audit(CommandKind::Validate, CommandOutcome::Ok, input, &document),
            },
        },
        Err(error) => validate_invalid(Some(input), CommandError::Parse(error.clone()).kind())
            .with_error(error),
    }
}

/// Builds the `Invalid` report used when a document cannot be classified valid.
#[must_use]
pub fn validate_invalid(input: Option<&[u8]>, error_kind: &'static str) -> ValidateReport {
    let mut audit = failure_audit(CommandKind::Validate, input, error_kind);
    audit.outcome = CommandOutcome::Invalid;
    ValidateReport {
        verdict: Verdict::Invalid,
        error: None,
        output: CommandOutput {
            stdout: format!("{}\n", Verdict::Invalid.label()),
            audit,
        },
    }
}

impl ValidateReport {
    /// Attaches the parse failure behind an invalid verdict.
    #[must_use]
    fn with_error(mut self, error: ParseError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Decides whether `solution` satisfies the document in `input`.
///
/// # Errors
///
/// Returns [`CommandError::Parse`] for an invalid document and
/// [`CommandError::Assignment`] for a malformed, mis-sized, or out-of-range
/// solution.
pub fn is_solved(input: &[u8], solution: &str) -> Result<CommandOutput, CommandError> {
    let document = parse_document(input)?;
    let assignment = parse_assignment(solution)?;
    let evaluation = evaluate(&document, &assignment)?;
    let outcome =
        if evaluation.is_solved() { CommandOutcome::Ok } else { CommandOutcome::Unsolved };
    let mut audit = document_audit(CommandKind::IsSolved, outcome, input, &document);
    audit.violated_constraints = Some(evaluation.violated().to_vec());
    Ok(CommandOutput {
        stdout: format!("{}\n", evaluation.is_solved()),
        audit,
    })
}

/// Generates instance `instance` of the sequence seeded by `params.seed`.
///
/// # Errors
///
/// Returns [`CommandError::Generate`] for illegal parameters.
pub fn generate(params: &UrbcspParams, instance: usize) -> Result<CommandOutput, CommandError> {
    let count = instance.checked_add(1).ok_or(CommandError::InstanceTooLarge(instance))?;
    let document = generate_instances(params, count)?
        .pop()
        .ok_or(CommandError::InstanceTooLarge(instance))?;
    let stdout = to_canonical_string(&document);
    let mut audit = CommandAuditEventParams::new(CommandKind::Generate, CommandOutcome::Ok);
    audit.canonical_hash = Some(document_digest(&document));
    Ok(CommandOutput {
        stdout,
        audit,
    })
}

/// Renders the CSP-JSON schema as canonical (RFC 8785) JSON.
///
/// # Errors
///
/// Returns [`CommandError::Schema`] when serialization fails.
pub fn schema() -> Result<CommandOutput, CommandError> {
    let mut stdout = serde_jcs::to_string(&csp_json_schema())
        .map_err(|err| CommandError::Schema(err.to_string()))?;
    stdout.push('\n');
    Ok(CommandOutput {
        stdout,
        audit: CommandAuditEventParams::new(CommandKind::Schema, CommandOutcome::Ok),
    })
}
