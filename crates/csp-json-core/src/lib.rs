// crates/csp-json-core/src/lib.rs
// ============================================================================
// Module: CSP-JSON Core Library
// Description: Public API surface for the CSP-JSON document toolkit.
// Purpose: Expose the document model, parser, validator, serializer, evaluator.
// Dependencies: crate::{model, wire, schema, parse, validate, canonical, evaluate, generate}
// ============================================================================

//! ## Overview
//! CSP-JSON core parses Constraint Satisfaction Problem documents, validates
//! their structural and semantic invariants, re-emits them in a pinned
//! canonical layout, and checks candidate assignments against their
//! constraints. It never searches for solutions.
//!
//! Security posture: documents and assignments are untrusted input; every
//! parsed [`Document`] has passed schema and semantic validation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assignment;
pub mod canonical;
pub mod evaluate;
pub mod generate;
pub mod hashing;
pub mod model;
pub mod parse;
pub mod schema;
pub mod validate;
pub mod wire;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assignment::Assignment;
pub use assignment::AssignmentError;
pub use assignment::parse_assignment;
pub use canonical::to_canonical_string;
pub use canonical::write_canonical;
pub use evaluate::Evaluation;
pub use evaluate::evaluate;
pub use evaluate::is_solved;
pub use generate::GENERATOR_ALGO;
pub use generate::GenerateError;
pub use generate::UrbcspParams;
pub use generate::generate_instances;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::document_digest;
pub use hashing::sha256_digest;
pub use model::Constraint;
pub use model::Document;
pub use model::DocumentError;
pub use model::Domain;
pub use model::Meta;
pub use model::Operator;
pub use model::Relation;
pub use model::TupleSet;
pub use model::Variable;
pub use model::variable_name;
pub use parse::ParseError;
pub use parse::parse_document;
pub use parse::parse_document_str;
pub use schema::csp_json_schema;
pub use validate::Verdict;
pub use validate::validate_bytes;
pub use validate::validate_detailed;
