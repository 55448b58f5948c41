// crates/csp-json-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and translation helpers for the CLI.
// Purpose: Route every user-facing string through one keyed catalog.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! The `csp-json` CLI keeps its user-facing strings in a keyed catalog.
//! Runtime output should be produced with the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholders are substituted in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Named placeholder value for a catalog template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Substituted text.
    pub value: String,
}

impl MessageArg {
    /// Creates a placeholder binding.
    #[must_use]
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English message templates keyed by message id.
pub(crate) const CATALOG: &[(&str, &str)] = &[
    ("main.version", "csp-json {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output stream"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load configuration: {error}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("input.kind.document", "CSP document"),
    ("input.read_failed", "Failed to read {kind} {path}: {error}"),
    ("input.too_large", "Refusing to read {kind} {path}: {size} bytes exceeds the {limit} byte limit"),
    ("document.parse_failed", "Failed to parse CSP document {path}: {error}"),
    ("validate.invalid", "CSP document {path} is invalid: {error}"),
    ("solution.too_large", "Solution is {size} bytes, exceeding the {limit} byte limit"),
    ("solution.invalid", "Invalid solution {solution}: {error}"),
    ("generate.failed", "Failed to generate instance: {error}"),
    ("generate.instance_too_large", "Instance index {instance} is too large"),
    ("schema.serialize_failed", "Failed to serialize schema: {error}"),
];

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up `key` and substitutes `args` into its placeholders.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
