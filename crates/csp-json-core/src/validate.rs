// crates/csp-json-core/src/validate.rs
// ============================================================================
// Module: CSP-JSON Validator
// Description: Binary validity verdicts for raw documents.
// Purpose: Classify input as valid or invalid without exposing partial state.
// Dependencies: crate::parse
// ============================================================================

//! ## Overview
//! Validation is parsing with the result discarded: a document is valid
//! exactly when [`parse_document`] succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::parse::ParseError;
use crate::parse::parse_document;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of validating a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Document parsed and satisfied every invariant.
    Valid,
    /// Document failed at some parsing stage.
    Invalid,
}

impl Verdict {
    /// Returns the line printed by the `validate` command.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "OK",
            Self::Invalid => "Invalid",
        }
    }

    /// Returns true for [`Verdict::Valid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Classifies raw bytes as a valid or invalid document.
#[must_use]
pub fn validate_bytes(bytes: &[u8]) -> Verdict {
    if validate_detailed(bytes).is_ok() { Verdict::Valid } else { Verdict::Invalid }
}

/// Validates raw bytes, returning the parse failure for diagnostics.
///
/// # Errors
///
/// Returns the [`ParseError`] that made the document invalid.
pub fn validate_detailed(bytes: &[u8]) -> Result<(), ParseError> {
    parse_document(bytes).map(|_| ())
}
