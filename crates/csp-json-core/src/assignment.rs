// crates/csp-json-core/src/assignment.rs
// ============================================================================
// Module: CSP Assignments
// Description: Candidate solutions expressed as domain indices.
// Purpose: Parse and check assignments before evaluation.
// Dependencies: serde_json, thiserror, crate::model
// ============================================================================

//! ## Overview
//! An [`Assignment`] holds one domain index per variable, in variable order.
//! Its text form is a flat JSON array of integers such as `[0, 1, 2]`.
//! Entries are kept signed so that negative input surfaces as an
//! out-of-range error rather than a syntax error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::model::Document;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing or checking an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// Text is not a flat JSON array of integers.
    #[error("assignment must be a flat json array of integers: {0}")]
    Syntax(String),
    /// Assignment length differs from the variable count.
    #[error("assignment has {actual} entries but the document declares {expected} variables")]
    ArityMismatch {
        /// Number of variables in the document.
        expected: usize,
        /// Number of entries in the assignment.
        actual: usize,
    },
    /// An entry is not a valid index into its variable's domain.
    #[error("assignment entry {variable} holds {value} outside a domain of size {domain_size}")]
    OutOfRange {
        /// Variable index.
        variable: usize,
        /// Offending entry.
        value: i64,
        /// Size of the variable's domain.
        domain_size: usize,
    },
    /// A constraint references a variable or relation missing from the document.
    #[error("constraint {constraint} references a variable or relation outside the document")]
    UnresolvedConstraint {
        /// Constraint index.
        constraint: usize,
    },
}

// ============================================================================
// SECTION: Assignment
// ============================================================================

/// Ordered domain indices, one per variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Raw entries in variable order.
    values: Vec<i64>,
}

impl Assignment {
    /// Creates an assignment from raw entries.
    #[must_use]
    pub const fn new(values: Vec<i64>) -> Self {
        Self {
            values,
        }
    }

    /// Returns the raw entries.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the assignment has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks the assignment against `document` and returns domain indices.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::ArityMismatch`] when the length differs from
    /// the variable count, then [`AssignmentError::OutOfRange`] for the first
    /// entry outside its variable's domain.
    pub fn resolve(&self, document: &Document) -> Result<Vec<usize>, AssignmentError> {
        let expected = document.variables().len();
        if self.values.len() != expected {
            return Err(AssignmentError::ArityMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        self.values
            .iter()
            .enumerate()
            .map(|(variable, &value)| {
                let domain_size = document.variable_domain(variable).map_or(0, |domain| domain.len());
                usize::try_from(value).ok().filter(|index| *index < domain_size).ok_or(
                    AssignmentError::OutOfRange {
                        variable,
                        value,
                        domain_size,
                    },
                )
            })
            .collect()
    }
}

impl From<Vec<i64>> for Assignment {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a flat JSON array of integers into an [`Assignment`].
///
/// # Errors
///
/// Returns [`AssignmentError::Syntax`] for malformed JSON, nested arrays,
/// non-integer entries, or a non-array value.
pub fn parse_assignment(text: &str) -> Result<Assignment, AssignmentError> {
    let values: Vec<i64> =
        serde_json::from_str(text).map_err(|err| AssignmentError::Syntax(err.to_string()))?;
    Ok(Assignment::new(values))
}
