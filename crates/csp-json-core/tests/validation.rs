// crates/csp-json-core/tests/validation.rs
// ============================================================================
// Module: Document Validation Tests
// Description: Negative fixtures and per-stage parse failures.
// Purpose: Ensure malformed or inconsistent documents fail closed.
// ============================================================================

//! Validation tests covering every parser stage and model invariant.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use csp_json_core::DocumentError;
use csp_json_core::ParseError;
use csp_json_core::Verdict;
use csp_json_core::csp_json_schema;
use csp_json_core::parse_document;
use csp_json_core::validate_bytes;
use csp_json_core::validate_detailed;
use jsonschema::Draft;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn tests_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests")
}

fn invalid_fixture(name: &str) -> Vec<u8> {
    fs::read(tests_dir().join("data-invalid").join(name)).expect("read fixture")
}

fn parse_error(name: &str) -> ParseError {
    parse_document(&invalid_fixture(name)).expect_err("fixture must be rejected")
}

fn document_error(name: &str) -> DocumentError {
    match parse_error(name) {
        ParseError::Document(err) => err,
        other => panic!("{name}: expected a document error, got {other}"),
    }
}

// ============================================================================
// SECTION: Verdicts
// ============================================================================

#[test]
fn every_negative_fixture_is_invalid() {
    let dir = tests_dir().join("data-invalid");
    let mut count = 0;
    for entry in fs::read_dir(&dir).expect("read dir") {
        let path = entry.expect("entry").path();
        let bytes = fs::read(&path).expect("read");
        assert_eq!(validate_bytes(&bytes), Verdict::Invalid, "{} validated", path.display());
        count += 1;
    }
    assert!(count >= 20);
}

#[test]
fn australia_is_valid() {
    let bytes =
        fs::read(tests_dir().join("data").join("human").join("color-australia.json")).expect("read");
    assert_eq!(validate_bytes(&bytes), Verdict::Valid);
    assert!(validate_detailed(&bytes).is_ok());
}

#[test]
fn verdict_labels_match_cli_output() {
    assert_eq!(Verdict::Valid.label(), "OK");
    assert_eq!(Verdict::Invalid.label(), "Invalid");
    assert!(Verdict::Valid.is_valid());
    assert!(!Verdict::Invalid.is_valid());
}

#[test]
fn empty_input_is_invalid() {
    assert_eq!(validate_bytes(b""), Verdict::Invalid);
    assert!(matches!(validate_detailed(b"   "), Err(ParseError::Syntax(_))));
}

// ============================================================================
// SECTION: Stages
// ============================================================================

#[test]
fn malformed_json_is_a_syntax_error() {
    assert!(matches!(parse_error("malformed-json.json"), ParseError::Syntax(_)));
}

#[test]
fn structural_problems_are_schema_errors() {
    for name in [
        "missing-meta.json",
        "unknown-key.json",
        "meta-unknown-key.json",
        "wrong-type-vars.json",
        "negative-var-domain.json",
        "unknown-operator.json",
        "relation-two-keys.json",
        "fractional-value.json",
        "top-level-array.json",
    ] {
        assert!(matches!(parse_error(name), ParseError::Schema(_)), "{name} not a schema error");
    }
}

#[test]
fn out_of_range_integers_are_shape_errors() {
    let text = br#"{"meta": {"id": "x", "algo": "y", "params": null}, "domains": [{"values": [18446744073709551615]}], "vars": [0], "constraintDefs": [], "constraints": []}"#;
    assert!(matches!(parse_document(text), Err(ParseError::Shape(_))));
}

#[test]
fn duplicate_keys_are_rejected() {
    let text = br#"{"meta": {"id": "x", "id": "y", "algo": "y", "params": null}, "domains": [{"values": [0]}], "vars": [0], "constraintDefs": [], "constraints": []}"#;
    assert_eq!(validate_bytes(text), Verdict::Invalid);
}

// ============================================================================
// SECTION: Model Invariants
// ============================================================================

#[test]
fn empty_variable_list_is_rejected() {
    assert_eq!(document_error("no-variables.json"), DocumentError::NoVariables);
}

#[test]
fn domain_problems_are_rejected() {
    assert_eq!(document_error("empty-domain.json"), DocumentError::EmptyDomain(0));
    assert_eq!(
        document_error("duplicate-domain-value.json"),
        DocumentError::DuplicateDomainValue {
            domain: 0,
            value: 1,
        }
    );
    assert_eq!(
        document_error("dangling-domain.json"),
        DocumentError::UnknownDomain {
            variable: 1,
            domain: 1,
        }
    );
}

#[test]
fn constraint_references_are_checked() {
    assert_eq!(
        document_error("dangling-relation.json"),
        DocumentError::UnknownRelation {
            constraint: 0,
            relation: 1,
        }
    );
    assert_eq!(document_error("empty-scope.json"), DocumentError::EmptyScope(0));
    assert_eq!(
        document_error("dangling-scope-variable.json"),
        DocumentError::UnknownVariable {
            constraint: 0,
            variable: 2,
        }
    );
}

#[test]
fn arity_problems_are_rejected() {
    assert_eq!(
        document_error("arity-mismatch.json"),
        DocumentError::ArityMismatch {
            constraint: 0,
            expected: 2,
            actual: 3,
        }
    );
    assert_eq!(
        document_error("intension-arity.json"),
        DocumentError::ArityMismatch {
            constraint: 0,
            expected: 2,
            actual: 3,
        }
    );
    assert_eq!(
        document_error("mixed-tuple-arity.json"),
        DocumentError::MixedTupleArity {
            relation: 0,
            tuple: 1,
        }
    );
}

#[test]
fn tuple_values_must_index_the_scoped_domain() {
    assert_eq!(
        document_error("tuple-out-of-range.json"),
        DocumentError::TupleValueOutOfRange {
            constraint: 0,
            position: 1,
            value: 2,
            domain_size: 2,
        }
    );
}

#[test]
fn intensional_scopes_must_be_distinct() {
    assert_eq!(
        document_error("intension-repeated-variable.json"),
        DocumentError::RepeatedVariable {
            constraint: 0,
            variable: 1,
        }
    );
}

// ============================================================================
// SECTION: Schema
// ============================================================================

#[test]
fn schema_compiles_and_accepts_fixtures() {
    let schema = csp_json_schema();
    let validator = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .expect("schema compiles");
    let bytes =
        fs::read(tests_dir().join("data").join("test").join("mixed-relations.json")).expect("read");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert!(validator.is_valid(&value));
}

#[test]
fn schema_requires_every_top_level_key() {
    let schema = csp_json_schema();
    let required = schema.pointer("/required").and_then(|value| value.as_array()).expect("required");
    let names: Vec<&str> = required.iter().filter_map(|value| value.as_str()).collect();
    assert_eq!(names, ["meta", "domains", "vars", "constraintDefs", "constraints"]);
    assert_eq!(schema.pointer("/additionalProperties"), Some(&serde_json::Value::Bool(false)));
}
