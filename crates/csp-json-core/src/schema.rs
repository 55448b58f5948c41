// crates/csp-json-core/src/schema.rs
// ============================================================================
// Module: CSP-JSON Schema
// Description: JSON Schema builder for CSP-JSON documents.
// Purpose: Gate untrusted input before typed decoding.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! This module defines the draft 2020-12 JSON Schema for CSP-JSON. The parser
//! validates every input against it, and the CLI can print it for tooling.
//! Cross-reference checks (dangling indices, arity, ranges) are semantic and
//! live in [`crate::model`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Returns the JSON schema for CSP-JSON documents.
#[must_use]
pub fn csp_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "csp-json://schemas/document.schema.json",
        "title": "CSP-JSON Document",
        "description": "Constraint satisfaction problem instance.",
        "type": "object",
        "properties": {
            "meta": meta_schema(),
            "domains": {
                "type": "array",
                "items": domain_schema()
            },
            "vars": {
                "type": "array",
                "items": index_schema()
            },
            "constraintDefs": {
                "type": "array",
                "items": relation_schema()
            },
            "constraints": {
                "type": "array",
                "items": constraint_schema()
            }
        },
        "required": ["meta", "domains", "vars", "constraintDefs", "constraints"],
        "additionalProperties": false
    })
}

/// Schema for a non-negative index.
fn index_schema() -> Value {
    json!({ "type": "integer", "minimum": 0 })
}

/// Schema for the `meta` object.
fn meta_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "algo": { "type": "string" },
            "params": {
                "description": "Generator parameters, any JSON value."
            }
        },
        "required": ["id", "algo", "params"],
        "additionalProperties": false
    })
}

/// Schema for a domain entry.
fn domain_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "values": {
                "type": "array",
                "items": { "type": "integer" }
            }
        },
        "required": ["values"],
        "additionalProperties": false
    })
}

/// Schema for a list of domain-index tuples.
fn tuples_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "array",
            "items": index_schema()
        }
    })
}

/// Schema for a relation definition.
fn relation_schema() -> Value {
    json!({
        "oneOf": [
            {
                "type": "object",
                "properties": { "noGoods": tuples_schema() },
                "required": ["noGoods"],
                "additionalProperties": false
            },
            {
                "type": "object",
                "properties": { "goods": tuples_schema() },
                "required": ["goods"],
                "additionalProperties": false
            },
            {
                "type": "object",
                "properties": {
                    "intension": {
                        "type": "string",
                        "enum": ["eq", "ne", "lt", "le", "gt", "ge"]
                    }
                },
                "required": ["intension"],
                "additionalProperties": false
            }
        ]
    })
}

/// Schema for a constraint entry.
fn constraint_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": index_schema(),
            "vars": {
                "type": "array",
                "items": index_schema()
            }
        },
        "required": ["id", "vars"],
        "additionalProperties": false
    })
}
