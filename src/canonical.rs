//! Canonical serialization for deterministic hashing.
//!
//! Every digest in this crate — Weisfeiler-Lehman node signatures as well as
//! the final fingerprint strings — is computed over canonical bytes produced
//! here, so the same graph state always yields the same fingerprint.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: vectors serialize in index order
//! - No HashMap allowed: use BTreeMap or sorted Vecs in hashed data
//! - Signature multisets are sorted before they reach this module

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Produces deterministic output for the same input, suitable for digest
/// computation and fingerprint comparison across processes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute the canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute the canonical hash and return it as a 16-char hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
