// crates/csp-json-core/src/parse.rs
// ============================================================================
// Module: CSP-JSON Parser
// Description: Staged parsing from raw bytes into a validated document.
// Purpose: Reject malformed or inconsistent input before any evaluation.
// Dependencies: jsonschema, serde_json, crate::{schema, wire, model}
// ============================================================================

//! ## Overview
//! Parsing runs four stages, failing closed at the first error:
//! 1. JSON syntax.
//! 2. JSON Schema (draft 2020-12) against [`csp_json_schema`].
//! 3. Typed decoding into the wire shapes.
//! 4. Model invariants via [`Document::new`].
//!
//! Security posture: input bytes are untrusted; callers bound their size.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::model::Document;
use crate::model::DocumentError;
use crate::schema::csp_json_schema;
use crate::wire::WireDocument;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing a CSP-JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input is not well-formed JSON.
    #[error("malformed json: {0}")]
    Syntax(String),
    /// Input violates the CSP-JSON schema.
    #[error("schema violation: {0}")]
    Schema(String),
    /// Input passed the schema but could not be decoded.
    #[error("invalid document shape: {0}")]
    Shape(String),
    /// Decoded document violates a model invariant.
    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),
}

// ============================================================================
// SECTION: Schema Validator
// ============================================================================

/// Compiled document schema, built on first use.
static DOCUMENT_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Returns the compiled document schema validator.
fn document_validator() -> Result<&'static Validator, ParseError> {
    DOCUMENT_VALIDATOR
        .get_or_init(|| {
            jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&csp_json_schema())
                .map_err(|err| format!("failed to compile document schema: {err}"))
        })
        .as_ref()
        .map_err(|err| ParseError::Schema(err.clone()))
}

/// Validates a JSON value against the document schema.
fn ensure_schema(value: &Value) -> Result<(), ParseError> {
    let validator = document_validator()?;
    let messages: Vec<String> = validator.iter_errors(value).map(|err| err.to_string()).collect();
    if messages.is_empty() {
        Ok(())
    } else {
        Err(ParseError::Schema(messages.join("; ")))
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses and validates a CSP-JSON document from raw bytes.
///
/// # Errors
///
/// Returns [`ParseError`] identifying the first failing stage.
pub fn parse_document(bytes: &[u8]) -> Result<Document, ParseError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| ParseError::Syntax(err.to_string()))?;
    ensure_schema(&value)?;
    let wire: WireDocument =
        serde_json::from_slice(bytes).map_err(|err| ParseError::Shape(err.to_string()))?;
    Ok(wire.into_document()?)
}

/// Parses and validates a CSP-JSON document from text.
///
/// # Errors
///
/// Returns [`ParseError`] identifying the first failing stage.
pub fn parse_document_str(text: &str) -> Result<Document, ParseError> {
    parse_document(text.as_bytes())
}
