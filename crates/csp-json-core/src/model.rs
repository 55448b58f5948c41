// crates/csp-json-core/src/model.rs
// ============================================================================
// Module: CSP-JSON Document Model
// Description: Variables, domains, relations, and constraints of a CSP instance.
// Purpose: Provide an immutable, always-valid in-memory document.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Document`] is the in-memory form of one CSP-JSON instance. It can only
//! be built through [`Document::new`], which enforces every structural and
//! semantic invariant, so consumers (serializer, evaluator) never re-check.
//!
//! ## Invariants
//! - At least one variable; every variable references an existing domain.
//! - Domains are non-empty and hold distinct values.
//! - Every constraint references an existing relation, has a non-empty scope
//!   of existing variables, and agrees with the relation's arity.
//! - Extensional tuples hold valid domain indices for the scoped variables.
//! - Intensional operators are binary and never see a repeated variable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Meta
// ============================================================================

/// Generator metadata carried by every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    /// Instance identifier (e.g. `human/color-australia`).
    pub id: String,
    /// Name of the algorithm or author that produced the instance.
    pub algo: String,
    /// Generator parameters as raw JSON text, preserved byte-for-byte.
    pub params: String,
}

impl Meta {
    /// Creates metadata with `null` parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, algo: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            algo: algo.into(),
            params: "null".to_string(),
        }
    }

    /// Replaces the raw parameter JSON text.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }
}

// ============================================================================
// SECTION: Domains and Variables
// ============================================================================

/// Ordered set of integer values a variable may take.
///
/// Assignments and tuples refer to values by *domain index*, the 0-based
/// position of a value in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Domain values in declaration order.
    values: Vec<i64>,
}

impl Domain {
    /// Creates a domain from explicit values.
    #[must_use]
    pub const fn new(values: Vec<i64>) -> Self {
        Self {
            values,
        }
    }

    /// Creates the domain `[0, size)`.
    #[must_use]
    pub fn range(size: usize) -> Self {
        Self {
            values: (0 .. size).map(|value| i64::try_from(value).unwrap_or(i64::MAX)).collect(),
        }
    }

    /// Returns the domain values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Returns the number of values in the domain.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the domain has no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value stored at `index`, if any.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    /// Returns the first value that appears more than once.
    fn first_duplicate(&self) -> Option<i64> {
        let mut seen = BTreeSet::new();
        self.values.iter().copied().find(|value| !seen.insert(*value))
    }
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Positional name, unique within the document.
    name: String,
    /// Index into the document domain list.
    domain: usize,
}

impl Variable {
    /// Returns the variable name (`x0`, `x1`, ...).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the index of the variable's domain in [`Document::domains`].
    #[must_use]
    pub const fn domain(&self) -> usize {
        self.domain
    }
}

/// Returns the positional variable name for `index`.
#[must_use]
pub fn variable_name(index: usize) -> String {
    format!("x{index}")
}

// ============================================================================
// SECTION: Relations
// ============================================================================

/// Binary operator of an intensional relation, applied to domain indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Both indices are equal.
    #[serde(rename = "eq")]
    Equals,
    /// The indices differ.
    #[serde(rename = "ne")]
    NotEquals,
    /// First index is strictly smaller.
    #[serde(rename = "lt")]
    LessThan,
    /// First index is smaller or equal.
    #[serde(rename = "le")]
    LessThanOrEqual,
    /// First index is strictly greater.
    #[serde(rename = "gt")]
    GreaterThan,
    /// First index is greater or equal.
    #[serde(rename = "ge")]
    GreaterThanOrEqual,
}

impl Operator {
    /// All operators in wire-label order.
    pub const ALL: [Self; 6] = [
        Self::Equals,
        Self::NotEquals,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
    ];

    /// Returns the wire label of the operator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "ne",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "le",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "ge",
        }
    }

    /// Returns the fixed scope arity the operator requires.
    #[must_use]
    pub const fn arity(self) -> usize {
        2
    }

    /// Applies the operator to two domain indices.
    #[must_use]
    pub const fn apply(self, left: usize, right: usize) -> bool {
        match self {
            Self::Equals => left == right,
            Self::NotEquals => left != right,
            Self::LessThan => left < right,
            Self::LessThanOrEqual => left <= right,
            Self::GreaterThan => left > right,
            Self::GreaterThanOrEqual => left >= right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Ordered list of domain-index tuples of an extensional relation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TupleSet {
    /// Tuples in declaration order.
    tuples: Vec<Vec<usize>>,
}

impl TupleSet {
    /// Creates a tuple set from rows; arity is checked by [`Document::new`].
    #[must_use]
    pub const fn new(tuples: Vec<Vec<usize>>) -> Self {
        Self {
            tuples,
        }
    }

    /// Returns the tuples in declaration order.
    #[must_use]
    pub fn tuples(&self) -> &[Vec<usize>] {
        &self.tuples
    }

    /// Returns the arity of the first tuple, or `None` for an empty set.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        self.tuples.first().map(Vec::len)
    }

    /// Returns the number of tuples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Returns true when the set holds no tuples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Returns true when `tuple` is a member of the set.
    #[must_use]
    pub fn contains(&self, tuple: &[usize]) -> bool {
        self.tuples.iter().any(|candidate| candidate.as_slice() == tuple)
    }

    /// Returns the index of the first tuple whose arity differs from the first.
    fn first_arity_mismatch(&self) -> Option<usize> {
        let arity = self.arity()?;
        self.tuples.iter().position(|tuple| tuple.len() != arity)
    }
}

/// Relation definition referenced by constraints (a `constraintDefs` entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Extensional relation listing the satisfying tuples.
    Goods(TupleSet),
    /// Extensional relation listing the forbidden tuples.
    NoGoods(TupleSet),
    /// Intensional relation given by a binary operator.
    Intension(Operator),
}

impl Relation {
    /// Returns the arity the relation imposes on a scope, if it is fixed.
    ///
    /// Empty tuple sets have no inherent arity and accept any scope length.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Goods(tuples) | Self::NoGoods(tuples) => tuples.arity(),
            Self::Intension(operator) => Some(operator.arity()),
        }
    }

    /// Returns true when the same variable may appear twice in a scope.
    #[must_use]
    pub const fn allows_repeated_scope(&self) -> bool {
        matches!(self, Self::Goods(_) | Self::NoGoods(_))
    }

    /// Decides whether the resolved domain indices satisfy the relation.
    #[must_use]
    pub fn is_satisfied_by(&self, values: &[usize]) -> bool {
        match self {
            Self::Goods(tuples) => tuples.contains(values),
            Self::NoGoods(tuples) => !tuples.contains(values),
            Self::Intension(operator) => match values {
                [left, right] => operator.apply(*left, *right),
                _ => false,
            },
        }
    }

    /// Returns the tuple set of an extensional relation.
    #[must_use]
    pub const fn tuples(&self) -> Option<&TupleSet> {
        match self {
            Self::Goods(tuples) | Self::NoGoods(tuples) => Some(tuples),
            Self::Intension(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// Application of a relation to an ordered scope of variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Index into the document relation list.
    pub relation: usize,
    /// Variable indices in scope order.
    pub scope: Vec<usize>,
}

impl Constraint {
    /// Creates a constraint referencing `relation` over `scope`.
    #[must_use]
    pub const fn new(relation: usize, scope: Vec<usize>) -> Self {
        Self {
            relation,
            scope,
        }
    }
}

// ============================================================================
// SECTION: Document
// ============================================================================

/// Validated CSP instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Generator metadata.
    meta: Meta,
    /// Domain definitions.
    domains: Vec<Domain>,
    /// Variables in index order.
    variables: Vec<Variable>,
    /// Relation definitions.
    relations: Vec<Relation>,
    /// Constraints in declaration order.
    constraints: Vec<Constraint>,
}

impl Document {
    /// Builds a document, enforcing every model invariant.
    ///
    /// `variable_domains[i]` is the domain index of variable `i`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] for the first violated invariant.
    pub fn new(
        meta: Meta,
        domains: Vec<Domain>,
        variable_domains: Vec<usize>,
        relations: Vec<Relation>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, DocumentError> {
        if variable_domains.is_empty() {
            return Err(DocumentError::NoVariables);
        }
        ensure_domains_well_formed(&domains)?;
        let variables = variable_domains
            .into_iter()
            .enumerate()
            .map(|(index, domain)| {
                if domain >= domains.len() {
                    return Err(DocumentError::UnknownDomain {
                        variable: index,
                        domain,
                    });
                }
                Ok(Variable {
                    name: variable_name(index),
                    domain,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        ensure_relations_well_formed(&relations)?;
        let document = Self {
            meta,
            domains,
            variables,
            relations,
            constraints,
        };
        document.ensure_constraints_well_formed()?;
        Ok(document)
    }

    /// Returns the generator metadata.
    #[must_use]
    pub const fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Returns the domain definitions.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Returns the variables in index order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the relation definitions.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Returns the constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the domain of the variable at `variable`.
    #[must_use]
    pub fn variable_domain(&self, variable: usize) -> Option<&Domain> {
        self.variables.get(variable).and_then(|var| self.domains.get(var.domain))
    }

    /// Returns the relation a constraint applies.
    #[must_use]
    pub fn relation_of(&self, constraint: &Constraint) -> Option<&Relation> {
        self.relations.get(constraint.relation)
    }

    /// Checks every constraint against the variables and relations.
    fn ensure_constraints_well_formed(&self) -> Result<(), DocumentError> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            let relation = self.relation_of(constraint).ok_or(DocumentError::UnknownRelation {
                constraint: index,
                relation: constraint.relation,
            })?;
            if constraint.scope.is_empty() {
                return Err(DocumentError::EmptyScope(index));
            }
            for &variable in &constraint.scope {
                if variable >= self.variables.len() {
                    return Err(DocumentError::UnknownVariable {
                        constraint: index,
                        variable,
                    });
                }
            }
            if let Some(expected) = relation.arity()
                && expected != constraint.scope.len()
            {
                return Err(DocumentError::ArityMismatch {
                    constraint: index,
                    expected,
                    actual: constraint.scope.len(),
                });
            }
            if !relation.allows_repeated_scope()
                && let Some(variable) = first_repeated(&constraint.scope)
            {
                return Err(DocumentError::RepeatedVariable {
                    constraint: index,
                    variable,
                });
            }
            if let Some(tuples) = relation.tuples() {
                self.ensure_tuples_in_range(index, constraint, tuples)?;
            }
        }
        Ok(())
    }

    /// Checks that tuple entries are valid domain indices for the scope.
    fn ensure_tuples_in_range(
        &self,
        index: usize,
        constraint: &Constraint,
        tuples: &TupleSet,
    ) -> Result<(), DocumentError> {
        for tuple in tuples.tuples() {
            for (position, (&value, &variable)) in tuple.iter().zip(&constraint.scope).enumerate()
            {
                let size = self.variable_domain(variable).map_or(0, Domain::len);
                if value >= size {
                    return Err(DocumentError::TupleValueOutOfRange {
                        constraint: index,
                        position,
                        value,
                        domain_size: size,
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Semantic invariant violations detected while building a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document declares no variables.
    #[error("document must declare at least one variable")]
    NoVariables,
    /// A domain has no values.
    #[error("domain {0} has no values")]
    EmptyDomain(usize),
    /// A domain lists the same value twice.
    #[error("domain {domain} lists value {value} more than once")]
    DuplicateDomainValue {
        /// Domain index.
        domain: usize,
        /// Repeated value.
        value: i64,
    },
    /// A variable references a missing domain.
    #[error("variable {variable} references unknown domain {domain}")]
    UnknownDomain {
        /// Variable index.
        variable: usize,
        /// Referenced domain index.
        domain: usize,
    },
    /// An extensional relation mixes tuple arities.
    #[error("relation {relation} tuple {tuple} differs in arity from the first tuple")]
    MixedTupleArity {
        /// Relation index.
        relation: usize,
        /// Offending tuple index.
        tuple: usize,
    },
    /// A constraint references a missing relation.
    #[error("constraint {constraint} references unknown relation {relation}")]
    UnknownRelation {
        /// Constraint index.
        constraint: usize,
        /// Referenced relation index.
        relation: usize,
    },
    /// A constraint has an empty scope.
    #[error("constraint {0} has an empty scope")]
    EmptyScope(usize),
    /// A constraint scope references a missing variable.
    #[error("constraint {constraint} references unknown variable {variable}")]
    UnknownVariable {
        /// Constraint index.
        constraint: usize,
        /// Referenced variable index.
        variable: usize,
    },
    /// Scope length disagrees with the relation arity.
    #[error("constraint {constraint} has scope length {actual} but its relation needs {expected}")]
    ArityMismatch {
        /// Constraint index.
        constraint: usize,
        /// Arity required by the relation.
        expected: usize,
        /// Scope length.
        actual: usize,
    },
    /// An intensional constraint repeats a variable.
    #[error("constraint {constraint} repeats variable {variable} under an intensional relation")]
    RepeatedVariable {
        /// Constraint index.
        constraint: usize,
        /// Repeated variable index.
        variable: usize,
    },
    /// A tuple entry is not a valid domain index for its scoped variable.
    #[error(
        "constraint {constraint} tuple position {position} holds index {value} outside a domain \
         of size {domain_size}"
    )]
    TupleValueOutOfRange {
        /// Constraint index.
        constraint: usize,
        /// Position within the tuple.
        position: usize,
        /// Offending domain index.
        value: usize,
        /// Size of the scoped variable's domain.
        domain_size: usize,
    },
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures every domain is non-empty and duplicate free.
fn ensure_domains_well_formed(domains: &[Domain]) -> Result<(), DocumentError> {
    for (index, domain) in domains.iter().enumerate() {
        if domain.is_empty() {
            return Err(DocumentError::EmptyDomain(index));
        }
        if let Some(value) = domain.first_duplicate() {
            return Err(DocumentError::DuplicateDomainValue {
                domain: index,
                value,
            });
        }
    }
    Ok(())
}

/// Ensures extensional relations use a single tuple arity.
fn ensure_relations_well_formed(relations: &[Relation]) -> Result<(), DocumentError> {
    for (index, relation) in relations.iter().enumerate() {
        if let Some(tuple) = relation.tuples().and_then(TupleSet::first_arity_mismatch) {
            return Err(DocumentError::MixedTupleArity {
                relation: index,
                tuple,
            });
        }
    }
    Ok(())
}

/// Returns the first variable that appears twice in a scope.
fn first_repeated(scope: &[usize]) -> Option<usize> {
    let mut seen = BTreeSet::new();
    scope.iter().copied().find(|variable| !seen.insert(*variable))
}
