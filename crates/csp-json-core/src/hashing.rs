// crates/csp-json-core/src/hashing.rs
// ============================================================================
// Module: CSP-JSON Content Digests
// Description: SHA-256 digests over raw input and canonical documents.
// Purpose: Identify processed documents in audit records.
// Dependencies: serde, sha2, crate::canonical
// ============================================================================

//! ## Overview
//! Two documents that differ only in whitespace share a canonical digest,
//! because [`document_digest`] hashes the canonical layout rather than the
//! input bytes. [`sha256_digest`] hashes arbitrary bytes such as a rejected
//! input file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::canonical::to_canonical_string;
use crate::model::Document;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

/// Hex-encoded content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Returns the SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_digest(bytes: &[u8]) -> HashDigest {
    let digest = Sha256::digest(bytes);
    HashDigest {
        algorithm: HashAlgorithm::Sha256,
        value: hex_encode(&digest),
    }
}

/// Returns the SHA-256 digest of the document's canonical layout.
#[must_use]
pub fn document_digest(document: &Document) -> HashDigest {
    sha256_digest(to_canonical_string(document).as_bytes())
}

/// Encodes bytes as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}
