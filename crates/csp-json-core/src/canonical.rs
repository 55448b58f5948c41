// crates/csp-json-core/src/canonical.rs
// ============================================================================
// Module: CSP-JSON Canonical Serializer
// Description: Deterministic text layout for CSP-JSON documents.
// Purpose: Emit byte-stable output so canonical input round-trips exactly.
// Dependencies: serde_json, crate::model
// ============================================================================

//! ## Overview
//! The canonical layout is pinned:
//!
//! ```text
//! {
//!   "meta": {
//!     "id": "<id>",
//!     "algo": "<algo>",
//!     "params": <raw params>
//!   },
//!   "domains": [
//!     {"values": [0, 1, 2]}
//!   ],
//!   "vars": [0, 0],
//!   "constraintDefs": [
//!     {"noGoods": [[0, 0], [1, 1]]}
//!   ],
//!   "constraints": [
//!     {"id": 0, "vars": [0, 1]}
//!   ]
//! }
//! ```
//!
//! Empty top-level lists collapse to `[]` on the key line. The output always
//! ends with a newline. For any canonical input `b`,
//! `to_canonical_string(&parse_document(b)?) == b`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::io;
use std::io::Write;

use serde_json::Value;

use crate::model::Constraint;
use crate::model::Document;
use crate::model::Domain;
use crate::model::Relation;
use crate::model::TupleSet;

// ============================================================================
// SECTION: Serialization
// ============================================================================

/// Renders a document in canonical layout.
#[must_use]
pub fn to_canonical_string(document: &Document) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    push_meta(&mut out, document);
    push_block(&mut out, "domains", document.domains(), push_domain, true);
    out.push_str("  \"vars\": ");
    push_inline(&mut out, document.variables().iter().map(|variable| variable.domain()));
    out.push_str(",\n");
    push_block(&mut out, "constraintDefs", document.relations(), push_relation, true);
    push_block(&mut out, "constraints", document.constraints(), push_constraint, false);
    out.push_str("}\n");
    out
}

/// Writes a document in canonical layout to `writer`.
///
/// # Errors
///
/// Returns the underlying I/O error when the write fails.
pub fn write_canonical(document: &Document, mut writer: impl Write) -> io::Result<()> {
    writer.write_all(to_canonical_string(document).as_bytes())
}

// ============================================================================
// SECTION: Layout Helpers
// ============================================================================

/// Appends the `meta` block.
fn push_meta(out: &mut String, document: &Document) {
    let meta = document.meta();
    out.push_str("  \"meta\": {\n");
    out.push_str("    \"id\": ");
    out.push_str(&json_string(&meta.id));
    out.push_str(",\n");
    out.push_str("    \"algo\": ");
    out.push_str(&json_string(&meta.algo));
    out.push_str(",\n");
    out.push_str("    \"params\": ");
    out.push_str(&meta.params);
    out.push('\n');
    out.push_str("  },\n");
}

/// Appends a top-level list with one entry per line.
fn push_block<T>(
    out: &mut String,
    key: &str,
    items: &[T],
    push_item: fn(&mut String, &T),
    trailing_comma: bool,
) {
    let terminator = if trailing_comma { ",\n" } else { "\n" };
    out.push_str("  \"");
    out.push_str(key);
    out.push_str("\": [");
    if items.is_empty() {
        out.push(']');
        out.push_str(terminator);
        return;
    }
    out.push('\n');
    for (index, item) in items.iter().enumerate() {
        out.push_str("    ");
        push_item(out, item);
        out.push_str(if index + 1 == items.len() { "\n" } else { ",\n" });
    }
    out.push_str("  ]");
    out.push_str(terminator);
}

/// Appends a domain entry.
fn push_domain(out: &mut String, domain: &Domain) {
    out.push_str("{\"values\": ");
    push_inline(out, domain.values().iter());
    out.push('}');
}

/// Appends a relation entry.
fn push_relation(out: &mut String, relation: &Relation) {
    match relation {
        Relation::Goods(tuples) => push_tuples(out, "goods", tuples),
        Relation::NoGoods(tuples) => push_tuples(out, "noGoods", tuples),
        Relation::Intension(operator) => {
            out.push_str("{\"intension\": \"");
            out.push_str(operator.label());
            out.push_str("\"}");
        }
    }
}

/// Appends an extensional relation entry.
fn push_tuples(out: &mut String, key: &str, tuples: &TupleSet) {
    out.push_str("{\"");
    out.push_str(key);
    out.push_str("\": [");
    for (index, tuple) in tuples.tuples().iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        push_inline(out, tuple.iter());
    }
    out.push_str("]}");
}

/// Appends a constraint entry.
fn push_constraint(out: &mut String, constraint: &Constraint) {
    out.push_str("{\"id\": ");
    out.push_str(&constraint.relation.to_string());
    out.push_str(", \"vars\": ");
    push_inline(out, constraint.scope.iter());
    out.push('}');
}

/// Appends `[a, b, c]`.
fn push_inline<I>(out: &mut String, items: I)
where
    I: IntoIterator,
    I::Item: Display,
{
    out.push('[');
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(&item.to_string());
    }
    out.push(']');
}

/// Returns `text` as a quoted, escaped JSON string literal.
fn json_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}
