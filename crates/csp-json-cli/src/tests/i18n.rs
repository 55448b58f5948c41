// crates/csp-json-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog integrity and placeholder substitution.
// Purpose: Ensure every message the CLI emits resolves to a template.
// Dependencies: csp-json-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the catalog has unique keys, covers every key the binary uses,
//! and substitutes named placeholders.

use std::collections::BTreeSet;

use crate::i18n::CATALOG;
use crate::i18n::MessageArg;
use crate::i18n::catalog;
use crate::i18n::translate;

/// Keys referenced by `main.rs`.
const USED_KEYS: &[&str] = &[
    "main.version",
    "output.stream.stdout",
    "output.stream.stderr",
    "output.stream.unknown",
    "output.write_failed",
    "config.load_failed",
    "audit.open_failed",
    "input.kind.document",
    "input.read_failed",
    "input.too_large",
    "document.parse_failed",
    "validate.invalid",
    "solution.too_large",
    "solution.invalid",
    "generate.failed",
    "generate.instance_too_large",
    "schema.serialize_failed",
];

#[test]
fn catalog_keys_are_unique() {
    let keys: BTreeSet<&str> = CATALOG.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), CATALOG.len(), "duplicate catalog key");
    assert_eq!(catalog().len(), CATALOG.len());
}

#[test]
fn catalog_covers_used_keys() {
    for key in USED_KEYS {
        assert!(catalog().contains_key(key), "missing catalog key {key}");
    }
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "input.too_large",
        vec![
            MessageArg::new("kind", "CSP document"),
            MessageArg::new("path", "big.json"),
            MessageArg::new("size", "20"),
            MessageArg::new("limit", "10"),
        ],
    );
    assert_eq!(
        output,
        "Refusing to read CSP document big.json: 20 bytes exceeds the 10 byte limit"
    );
}

#[test]
fn translate_leaves_unbound_placeholders() {
    let output = translate("generate.failed", Vec::new());
    assert_eq!(output, "Failed to generate instance: {error}");
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn macro_formats_named_arguments() {
    let output = crate::t!("main.version", version = "1.2.3");
    assert_eq!(output, "csp-json 1.2.3");
}
