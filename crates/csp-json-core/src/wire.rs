// crates/csp-json-core/src/wire.rs
// ============================================================================
// Module: CSP-JSON Wire Shapes
// Description: Serde shapes of the CSP-JSON interchange format.
// Purpose: Decode typed documents before semantic validation.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! These types mirror the JSON layout exactly (`meta`, `domains`, `vars`,
//! `constraintDefs`, `constraints`). Unknown keys are rejected and `params`
//! is captured as raw text so the serializer can reproduce it verbatim.
//! Conversion into [`Document`] applies the model invariants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::model::Constraint;
use crate::model::Document;
use crate::model::DocumentError;
use crate::model::Domain;
use crate::model::Meta;
use crate::model::Operator;
use crate::model::Relation;
use crate::model::TupleSet;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Top-level CSP-JSON object.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireDocument {
    /// Generator metadata.
    pub meta: WireMeta,
    /// Domain definitions.
    pub domains: Vec<WireDomain>,
    /// Domain index per variable.
    pub vars: Vec<usize>,
    /// Relation definitions.
    #[serde(rename = "constraintDefs")]
    pub constraint_defs: Vec<WireRelation>,
    /// Constraint applications.
    pub constraints: Vec<WireConstraint>,
}

/// `meta` object.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireMeta {
    /// Instance identifier.
    pub id: String,
    /// Producing algorithm.
    pub algo: String,
    /// Parameters kept as raw JSON text.
    pub params: Box<RawValue>,
}

/// `domains[i]` object.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireDomain {
    /// Domain values.
    pub values: Vec<i64>,
}

/// `constraintDefs[i]` object, exactly one key.
#[derive(Debug, Deserialize)]
pub enum WireRelation {
    /// Satisfying tuples.
    #[serde(rename = "goods")]
    Goods(Vec<Vec<usize>>),
    /// Forbidden tuples.
    #[serde(rename = "noGoods")]
    NoGoods(Vec<Vec<usize>>),
    /// Binary operator label.
    #[serde(rename = "intension")]
    Intension(Operator),
}

/// `constraints[i]` object.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireConstraint {
    /// Index into `constraintDefs`.
    pub id: usize,
    /// Scope as variable indices.
    pub vars: Vec<usize>,
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

impl WireDocument {
    /// Converts the wire shape into a validated [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when a model invariant is violated.
    pub fn into_document(self) -> Result<Document, DocumentError> {
        let meta = Meta {
            id: self.meta.id,
            algo: self.meta.algo,
            params: self.meta.params.get().to_string(),
        };
        let domains = self.domains.into_iter().map(|domain| Domain::new(domain.values)).collect();
        let relations = self.constraint_defs.into_iter().map(Relation::from).collect();
        let constraints = self
            .constraints
            .into_iter()
            .map(|constraint| Constraint::new(constraint.id, constraint.vars))
            .collect();
        Document::new(meta, domains, self.vars, relations, constraints)
    }
}

impl From<WireRelation> for Relation {
    fn from(relation: WireRelation) -> Self {
        match relation {
            WireRelation::Goods(tuples) => Self::Goods(TupleSet::new(tuples)),
            WireRelation::NoGoods(tuples) => Self::NoGoods(TupleSet::new(tuples)),
            WireRelation::Intension(operator) => Self::Intension(operator),
        }
    }
}
