// crates/csp-json-cli/src/lib.rs
// ============================================================================
// Module: CSP-JSON CLI Library
// Description: Shared components for the csp-json command-line interface.
// Purpose: Expose commands, configuration, audit, and i18n to the binary and tests.
// Dependencies: csp-json-core, serde, serde_jcs, thiserror, toml
// ============================================================================

//! ## Overview
//! This library houses everything the `csp-json` binary needs apart from
//! argument parsing and stream I/O. Commands are pure functions from input
//! bytes to [`commands::CommandOutput`], so they are testable without
//! spawning a process.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured audit events and sinks.
pub mod audit;
/// Pure command implementations.
pub mod commands;
/// `csp-json.toml` loading and validation.
pub mod config;
/// Message catalog and the `t!` macro.
pub mod i18n;

#[cfg(test)]
mod tests;
