// crates/csp-json-core/tests/round_trip.rs
// ============================================================================
// Module: Canonical Round-Trip Tests
// Description: Parse then serialize every fixture and compare bytes.
// Purpose: Pin the canonical layout against checked-in documents.
// ============================================================================

//! Canonical round-trip tests over the positive fixture set.

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

use csp_json_core::Document;
use csp_json_core::parse_document;
use csp_json_core::parse_document_str;
use csp_json_core::to_canonical_string;
use csp_json_core::write_canonical;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns every `.json` file under `dir`, sorted.
fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(next) = pending.pop() {
        for entry in fs::read_dir(&next).expect("read fixture dir") {
            let path = entry.expect("fixture entry").path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn load(relative: &str) -> Document {
    let bytes = fs::read(fixture_dir().join(relative)).expect("read fixture");
    parse_document(&bytes).expect("parse fixture")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn every_fixture_round_trips_byte_for_byte() {
    let files = json_files(&fixture_dir());
    assert!(files.len() >= 5, "expected the positive fixture set");
    for path in files {
        let original = fs::read_to_string(&path).expect("read fixture");
        let document = parse_document_str(&original)
            .unwrap_or_else(|err| panic!("{} failed to parse: {err}", path.display()));
        let rendered = to_canonical_string(&document);
        assert_eq!(rendered, original, "{} is not canonical", path.display());
    }
}

#[test]
fn compact_input_is_rewritten_in_canonical_layout() {
    let compact = r#"{"constraints":[{"vars":[0,1],"id":0}],"vars":[0,0],"domains":[{"values":[3,4]}],"constraintDefs":[{"intension":"ne"}],"meta":{"params":{"a":1},"algo":"human","id":"test/compact"}}"#;
    let document = parse_document_str(compact).expect("parse compact");
    let expected = concat!(
        "{\n",
        "  \"meta\": {\n",
        "    \"id\": \"test/compact\",\n",
        "    \"algo\": \"human\",\n",
        "    \"params\": {\"a\":1}\n",
        "  },\n",
        "  \"domains\": [\n",
        "    {\"values\": [3, 4]}\n",
        "  ],\n",
        "  \"vars\": [0, 0],\n",
        "  \"constraintDefs\": [\n",
        "    {\"intension\": \"ne\"}\n",
        "  ],\n",
        "  \"constraints\": [\n",
        "    {\"id\": 0, \"vars\": [0, 1]}\n",
        "  ]\n",
        "}\n",
    );
    assert_eq!(to_canonical_string(&document), expected);
}

#[test]
fn canonical_output_is_idempotent() {
    let document = load("test/mixed-relations.json");
    let once = to_canonical_string(&document);
    let twice = to_canonical_string(&parse_document_str(&once).expect("reparse"));
    assert_eq!(once, twice);
    assert_eq!(parse_document_str(&once).expect("reparse"), document);
}

#[test]
fn empty_lists_collapse_onto_the_key_line() {
    let rendered = to_canonical_string(&load("test/no-constraints.json"));
    assert!(rendered.contains("  \"constraintDefs\": [],\n"));
    assert!(rendered.ends_with("  \"constraints\": []\n}\n"));
}

#[test]
fn strings_are_json_escaped() {
    let text = r#"{"meta": {"id": "quote\"and\\slash", "algo": "tab\there", "params": null}, "domains": [{"values": [0]}], "vars": [0], "constraintDefs": [], "constraints": []}"#;
    let rendered = to_canonical_string(&parse_document_str(text).expect("parse"));
    assert!(rendered.contains(r#""id": "quote\"and\\slash","#));
    assert!(rendered.contains(r#""algo": "tab\there","#));
    let reparsed = parse_document_str(&rendered).expect("reparse");
    assert_eq!(reparsed.meta().id, "quote\"and\\slash");
}

#[test]
fn write_canonical_matches_string_rendering() {
    let document = load("human/color-australia.json");
    let mut buffer = Vec::new();
    write_canonical(&document, &mut buffer).expect("write");
    assert_eq!(buffer, to_canonical_string(&document).into_bytes());
}

#[test]
fn params_are_preserved_verbatim() {
    let document = load("test/no-constraints.json");
    assert_eq!(document.meta().params, r#"{"note": "single variable"}"#);
}
