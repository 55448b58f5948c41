// crates/csp-json-core/src/evaluate.rs
// ============================================================================
// Module: CSP Solution Evaluator
// Description: Decide whether an assignment satisfies every constraint.
// Purpose: Provide the `is-solved` verdict and the list of violations.
// Dependencies: crate::{assignment, model}
// ============================================================================

//! ## Overview
//! Evaluation first checks the assignment's arity and ranges (hard failures),
//! then tests each constraint independently:
//! - `goods`: the scope's tuple of indices must be listed.
//! - `noGoods`: the scope's tuple of indices must not be listed.
//! - intension: the operator must hold over the two indices.
//!
//! The verdict is the conjunction over constraints, so a document without
//! constraints is solved by any in-range assignment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::assignment::Assignment;
use crate::assignment::AssignmentError;
use crate::model::Document;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Result of evaluating an assignment against a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Indices of unsatisfied constraints, ascending.
    violated: Vec<usize>,
}

impl Evaluation {
    /// Returns true when no constraint is violated.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.violated.is_empty()
    }

    /// Returns the indices of violated constraints.
    #[must_use]
    pub fn violated(&self) -> &[usize] {
        &self.violated
    }
}

/// Evaluates every constraint of `document` under `assignment`.
///
/// # Errors
///
/// Returns [`AssignmentError`] when the assignment has the wrong length or an
/// out-of-range entry, and [`AssignmentError::UnresolvedConstraint`] when a
/// constraint cannot be resolved against the document.
pub fn evaluate(
    document: &Document,
    assignment: &Assignment,
) -> Result<Evaluation, AssignmentError> {
    let indices = assignment.resolve(document)?;
    let mut violated = Vec::new();
    for (index, constraint) in document.constraints().iter().enumerate() {
        let relation = document.relation_of(constraint);
        let tuple = scope_tuple(&constraint.scope, &indices);
        let (Some(relation), Some(tuple)) = (relation, tuple) else {
            return Err(AssignmentError::UnresolvedConstraint {
                constraint: index,
            });
        };
        if !relation.is_satisfied_by(&tuple) {
            violated.push(index);
        }
    }
    Ok(Evaluation {
        violated,
    })
}

/// Reads the assigned domain index of every variable in `scope`.
///
/// Returns `None` when a scope entry has no assigned index.
pub(crate) fn scope_tuple(scope: &[usize], indices: &[usize]) -> Option<Vec<usize>> {
    scope.iter().map(|variable| indices.get(*variable).copied()).collect()
}

/// Returns true when `assignment` satisfies every constraint of `document`.
///
/// # Errors
///
/// Returns [`AssignmentError`] when the assignment has the wrong length or an
/// out-of-range entry.
pub fn is_solved(document: &Document, assignment: &Assignment) -> Result<bool, AssignmentError> {
    evaluate(document, assignment).map(|evaluation| evaluation.is_solved())
}
