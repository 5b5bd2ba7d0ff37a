//! Per-structure fingerprint records.
//!
//! Bundles the six hash variants into one serializable record. In batch
//! mode a failed structure yields a sentinel record (every variant
//! missing) instead of aborting the batch: at most one structure is lost
//! per failure, never the run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hash::{
    decorated_graph_hash, decorated_no_leaf_hash, decorated_scaffold_hash,
    undecorated_graph_hash, undecorated_no_leaf_hash, undecorated_scaffold_hash,
    HashComputationError,
};
use crate::types::PeriodicGraph;

/// The six fingerprint variants of one structure.
///
/// `None` is the sentinel missing-value recorded when the structure's
/// pipeline failed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FingerprintSet {
    /// Full quotient graph, species ignored.
    pub undecorated_graph_hash: Option<String>,
    /// Leaf-pruned graph, species ignored.
    pub undecorated_no_leaf_hash: Option<String>,
    /// Bridge-free scaffold, species ignored.
    pub undecorated_scaffold_hash: Option<String>,
    /// Full quotient graph, species included.
    pub decorated_graph_hash: Option<String>,
    /// Leaf-pruned graph, species included.
    pub decorated_no_leaf_hash: Option<String>,
    /// Bridge-free scaffold, species included.
    pub decorated_scaffold_hash: Option<String>,
}

impl FingerprintSet {
    /// Compute all six variants, failing on the first error.
    ///
    /// This is the single-structure path: the caller attaches the
    /// offending structure's identifier when reporting the error.
    pub fn compute_strict(
        graph: &PeriodicGraph,
        lqg: bool,
    ) -> Result<Self, HashComputationError> {
        Ok(Self {
            undecorated_graph_hash: Some(undecorated_graph_hash(graph, lqg)?),
            undecorated_no_leaf_hash: Some(undecorated_no_leaf_hash(graph, lqg)?),
            undecorated_scaffold_hash: Some(undecorated_scaffold_hash(graph, lqg)?),
            decorated_graph_hash: Some(decorated_graph_hash(graph, lqg)?),
            decorated_no_leaf_hash: Some(decorated_no_leaf_hash(graph, lqg)?),
            decorated_scaffold_hash: Some(decorated_scaffold_hash(graph, lqg)?),
        })
    }

    /// Compute all six variants, substituting the sentinel record on any
    /// failure. This is the batch path.
    pub fn compute(graph: &PeriodicGraph, lqg: bool) -> Self {
        match Self::compute_strict(graph, lqg) {
            Ok(set) => set,
            Err(error) => {
                tracing::warn!(%error, "fingerprint computation failed, recording sentinel");
                Self::missing()
            }
        }
    }

    /// The sentinel record: every variant missing.
    pub fn missing() -> Self {
        Self::default()
    }

    /// True if every variant is the sentinel missing-value.
    pub fn is_missing(&self) -> bool {
        self.undecorated_graph_hash.is_none()
            && self.undecorated_no_leaf_hash.is_none()
            && self.undecorated_scaffold_hash.is_none()
            && self.decorated_graph_hash.is_none()
            && self.decorated_no_leaf_hash.is_none()
            && self.decorated_scaffold_hash.is_none()
    }

    /// The mapping of fingerprint names to hash strings, in stable order.
    pub fn as_map(&self) -> BTreeMap<&'static str, Option<String>> {
        BTreeMap::from([
            ("undecorated_graph_hash", self.undecorated_graph_hash.clone()),
            ("undecorated_no_leaf_hash", self.undecorated_no_leaf_hash.clone()),
            ("undecorated_scaffold_hash", self.undecorated_scaffold_hash.clone()),
            ("decorated_graph_hash", self.decorated_graph_hash.clone()),
            ("decorated_no_leaf_hash", self.decorated_no_leaf_hash.clone()),
            ("decorated_scaffold_hash", self.decorated_scaffold_hash.clone()),
        ])
    }
}

/// One structure's fingerprints, keyed by its identifier. Suitable for
/// line-delimited serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// Structure identifier (file stem, database key, ...).
    pub id: String,
    /// The six hash variants.
    #[serde(flatten)]
    pub hashes: FingerprintSet,
}

/// Fingerprint a batch of structures, in submission order.
///
/// Per-structure failures become sentinel records; the batch always
/// completes.
pub fn compute_fingerprint_records(
    structures: &[(String, PeriodicGraph)],
    lqg: bool,
) -> Vec<FingerprintRecord> {
    structures
        .iter()
        .map(|(id, graph)| {
            tracing::debug!(structure = %id, "computing fingerprints");
            FingerprintRecord {
                id: id.clone(),
                hashes: FingerprintSet::compute(graph, lqg),
            }
        })
        .collect()
}
