// crates/csp-json-cli/src/main.rs
// ============================================================================
// Module: CSP-JSON CLI Entry Point
// Description: Command dispatcher for CSP-JSON document tooling.
// Purpose: Map subcommands to core operations, stdout text, and exit codes.
// Dependencies: clap, csp-json-core, csp-json-cli, thiserror
// ============================================================================

//! ## Overview
//! The `csp-json` binary re-emits, validates, checks solutions against, and
//! generates CSP-JSON documents. Command logic lives in
//! [`csp_json_cli::commands`]; this file owns argument parsing, bounded file
//! reads, stream writes, audit recording, and exit codes. All user-facing
//! strings are routed through the i18n catalog. Diagnostics go to stderr only;
//! stdout carries nothing but the command result.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use csp_json_cli::audit::AuditSink;
use csp_json_cli::audit::CommandAuditEvent;
use csp_json_cli::audit::CommandKind;
use csp_json_cli::audit::build_sink;
use csp_json_cli::commands;
use csp_json_cli::commands::CommandError;
use csp_json_cli::commands::CommandOutput;
use csp_json_cli::config::CspJsonConfig;
use csp_json_cli::config::LimitsConfig;
use csp_json_cli::t;
use csp_json_core::UrbcspParams;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "csp-json", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Configuration file (overrides `CSP_JSON_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a document and print it in canonical layout.
    Echo(DocumentArgs),
    /// Print `OK` for a valid document and `Invalid` otherwise.
    Validate(DocumentArgs),
    /// Print whether an assignment satisfies every constraint.
    IsSolved(IsSolvedArgs),
    /// Generate a uniform random binary CSP instance.
    Generate(GenerateArgs),
    /// Print the CSP-JSON JSON Schema.
    Schema,
}

/// Arguments naming a single document file.
#[derive(Args, Debug)]
struct DocumentArgs {
    /// Path to the CSP-JSON document.
    #[arg(long, value_name = "PATH")]
    csp: PathBuf,
}

/// Arguments for `is-solved`.
#[derive(Args, Debug)]
struct IsSolvedArgs {
    /// Path to the CSP-JSON document.
    #[arg(long, value_name = "PATH")]
    csp: PathBuf,
    /// Domain indices as a JSON array, one per variable.
    #[arg(long, value_name = "JSON")]
    solution: String,
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of variables.
    #[arg(long = "vars", value_name = "N")]
    variables: usize,
    /// Domain size.
    #[arg(long = "vals", value_name = "D")]
    values: usize,
    /// Number of binary constraints.
    #[arg(long, value_name = "C")]
    constraints: usize,
    /// Forbidden value pairs per constraint.
    #[arg(long, value_name = "T")]
    nogoods: usize,
    /// Random seed.
    #[arg(long, value_name = "S", allow_negative_numbers = true)]
    seed: i32,
    /// Zero-based instance index within the seeded sequence.
    #[arg(long, value_name = "K", default_value_t = 0)]
    instance: usize,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let (config, sink) = match load_environment(cli.config.as_deref()) {
        Ok(environment) => environment,
        Err(err) if matches!(command, Commands::Validate(_)) => {
            return report_validate_setup_failure(&err);
        }
        Err(err) => return Err(err),
    };
    let sink = sink.as_ref();

    match command {
        Commands::Echo(args) => command_echo(&args, &config.limits, sink),
        Commands::Validate(args) => command_validate(&args, &config.limits, sink),
        Commands::IsSolved(args) => command_is_solved(&args, &config.limits, sink),
        Commands::Generate(args) => command_generate(&args, sink),
        Commands::Schema => command_schema(sink),
    }
}

/// Loads configuration and builds the audit sink it selects.
fn load_environment(path: Option<&Path>) -> CliResult<(CspJsonConfig, Box<dyn AuditSink>)> {
    let config = CspJsonConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let sink = build_sink(&config.audit).map_err(|err| {
        let path = config.audit.path.as_deref().unwrap_or_default();
        CliError::new(t!("audit.open_failed", path = path, error = err))
    })?;
    Ok((config, sink))
}

/// Reports `Invalid` for `validate` when configuration or audit setup fails.
fn report_validate_setup_failure(error: &CliError) -> CliResult<ExitCode> {
    write_stderr_line(&error.to_string())
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let report = commands::validate_invalid(None, "config");
    write_stdout_bytes(report.output.stdout.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::FAILURE)
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `echo`.
fn command_echo(
    args: &DocumentArgs,
    limits: &LimitsConfig,
    sink: &dyn AuditSink,
) -> CliResult<ExitCode> {
    let bytes = read_document(&args.csp, limits, CommandKind::Echo, sink)?;
    let output = commands::echo(&bytes).map_err(|err| {
        let message = describe_command_error(&err, Some(&args.csp), None);
        record_failure(sink, CommandKind::Echo, Some(&bytes), err.kind(), message)
    })?;
    finish(sink, output)
}

/// Executes `validate`; read failures are reported as `Invalid`.
fn command_validate(
    args: &DocumentArgs,
    limits: &LimitsConfig,
    sink: &dyn AuditSink,
) -> CliResult<ExitCode> {
    let report = match read_bytes_with_limit(&args.csp, limits.max_document_bytes) {
        Ok(bytes) => commands::validate(&bytes),
        Err(err) => {
            write_stderr_line(&read_error_message(&args.csp, &err))
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            commands::validate_invalid(None, err.kind())
        }
    };
    if let Some(error) = &report.error {
        write_stderr_line(&t!("validate.invalid", path = args.csp.display(), error = error))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    write_stdout_bytes(report.output.stdout.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    sink.record(&CommandAuditEvent::new(report.output.audit));
    if report.verdict.is_valid() { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
}

/// Executes `is-solved`.
fn command_is_solved(
    args: &IsSolvedArgs,
    limits: &LimitsConfig,
    sink: &dyn AuditSink,
) -> CliResult<ExitCode> {
    if args.solution.len() > limits.max_solution_bytes {
        let message = t!(
            "solution.too_large",
            size = args.solution.len(),
            limit = limits.max_solution_bytes
        );
        return Err(record_failure(sink, CommandKind::IsSolved, None, "solution_too_large", message));
    }
    let bytes = read_document(&args.csp, limits, CommandKind::IsSolved, sink)?;
    let output = commands::is_solved(&bytes, &args.solution).map_err(|err| {
        let message = describe_command_error(&err, Some(&args.csp), Some(&args.solution));
        record_failure(sink, CommandKind::IsSolved, Some(&bytes), err.kind(), message)
    })?;
    finish(sink, output)
}

/// Executes `generate`.
fn command_generate(args: &GenerateArgs, sink: &dyn AuditSink) -> CliResult<ExitCode> {
    let params = UrbcspParams {
        variables: args.variables,
        values: args.values,
        constraints: args.constraints,
        nogoods: args.nogoods,
        seed: args.seed,
    };
    let output = commands::generate(&params, args.instance).map_err(|err| {
        let message = describe_command_error(&err, None, None);
        record_failure(sink, CommandKind::Generate, None, err.kind(), message)
    })?;
    finish(sink, output)
}

/// Executes `schema`.
fn command_schema(sink: &dyn AuditSink) -> CliResult<ExitCode> {
    let output = commands::schema().map_err(|err| {
        let message = describe_command_error(&err, None, None);
        record_failure(sink, CommandKind::Schema, None, err.kind(), message)
    })?;
    finish(sink, output)
}

/// Writes a successful command's stdout and records its audit event.
fn finish(sink: &dyn AuditSink, output: CommandOutput) -> CliResult<ExitCode> {
    write_stdout_bytes(output.stdout.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    sink.record(&CommandAuditEvent::new(output.audit));
    Ok(ExitCode::SUCCESS)
}

/// Records a failure audit event and returns the matching [`CliError`].
fn record_failure(
    sink: &dyn AuditSink,
    command: CommandKind,
    input: Option<&[u8]>,
    error_kind: &'static str,
    message: String,
) -> CliError {
    sink.record(&CommandAuditEvent::new(commands::failure_audit(command, input, error_kind)));
    CliError::new(message)
}

/// Formats a localized message for a command failure.
fn describe_command_error(
    error: &CommandError,
    path: Option<&Path>,
    solution: Option<&str>,
) -> String {
    match error {
        CommandError::Parse(err) => {
            let path = path.map_or_else(String::new, |path| path.display().to_string());
            t!("document.parse_failed", path = path, error = err)
        }
        CommandError::Assignment(err) => {
            t!("solution.invalid", solution = solution.unwrap_or_default(), error = err)
        }
        CommandError::Generate(err) => t!("generate.failed", error = err),
        CommandError::InstanceTooLarge(instance) => {
            t!("generate.instance_too_large", instance = instance)
        }
        CommandError::Schema(err) => t!("schema.serialize_failed", error = err),
    }
}

// ============================================================================
// SECTION: Read Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

impl ReadLimitError {
    /// Returns a stable label for audit records.
    const fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "read_io",
            Self::TooLarge {
                ..
            } => "read_too_large",
        }
    }
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a CSP document, recording a failure audit event on error.
fn read_document(
    path: &Path,
    limits: &LimitsConfig,
    command: CommandKind,
    sink: &dyn AuditSink,
) -> CliResult<Vec<u8>> {
    read_bytes_with_limit(path, limits.max_document_bytes).map_err(|err| {
        record_failure(sink, command, None, err.kind(), read_error_message(path, &err))
    })
}

/// Formats a localized message for a failed document read.
fn read_error_message(path: &Path, error: &ReadLimitError) -> String {
    let kind = t!("input.kind.document");
    match error {
        ReadLimitError::Io(err) => {
            t!("input.read_failed", kind = kind, path = path.display(), error = err)
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => t!("input.too_large", kind = kind, path = path.display(), size = size, limit = limit),
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)?;
    stdout.flush()
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
