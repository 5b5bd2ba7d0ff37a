//! # crystal-graph-kernel
//!
//! Deterministic topology fingerprints for periodic crystal graphs.
//!
//! The kernel answers two questions:
//!
//! > Do two crystal structures share the **same bonding topology**?
//!
//! > Which **finite molecules** are embedded in a periodic structure?
//!
//! ## Core Contract
//!
//! 1. Build a periodic connectivity graph from a lattice, sites and a
//!    [`NeighborStrategy`]
//! 2. Optionally reduce it (leaf pruning, scaffold extraction)
//! 3. Canonicalize it as a quotient graph with direction-independent
//!    voltage labels
//! 4. Produce the six Weisfeiler-Lehman fingerprint variants for
//!    deduplication and clustering
//! 5. Independently, extract finite molecular fragments via supercell
//!    expansion
//!
//! ## Architecture
//!
//! ```text
//! NeighborStrategy → PeriodicGraph → GraphReducer → QuotientGraph → FingerprintSet
//!                         ↓
//!                  FragmentExtractor → MolecularFragments
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph state → identical fingerprints, on any platform
//! - Site relabeling and rigid motions never change a fingerprint
//! - Edge voltages are independent of emission direction
//! - Equal fingerprints are necessary, not sufficient, for isomorphism;
//!   pair them with [`fragments_isomorphic`]-style checks when proof is
//!   required

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod elements;
pub mod fingerprint;
pub mod fragments;
pub mod hash;
pub mod logging;
pub mod neighbors;
pub mod quotient;
pub mod reduce;
pub mod types;

// Re-exports
pub use types::{
    FragmentBond, Image, InvalidGraphError, Lattice, LatticeError, MolecularFragment,
    PeriodicEdge, PeriodicGraph, Site,
};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use fingerprint::{compute_fingerprint_records, FingerprintRecord, FingerprintSet};
pub use fragments::{extract_fragments, fragments_isomorphic, FragmentOptions};
pub use hash::{
    decorated_graph_hash, decorated_no_leaf_hash, decorated_scaffold_hash, generate_hash,
    undecorated_graph_hash, undecorated_no_leaf_hash, undecorated_scaffold_hash,
    HashComputationError, WL_ITERATIONS,
};
pub use logging::enable_logging;
pub use neighbors::{
    build_bonded_graph, CutoffConfig, CutoffStrategy, GraphBuildError, MinimumDistanceStrategy,
    Neighbor, NeighborMethod, NeighborStrategy, UnresolvedNeighborError,
};
pub use quotient::{
    build_quotient_graph, voltage, QuotientEdge, QuotientGraph, QuotientMode, QuotientNode,
};
pub use reduce::{extract_scaffold, leaf_sites, prune_leaf_sites, retain_sites, ReducedGraph};

/// Schema version for fingerprint records.
/// Increment on breaking changes to the hashing pipeline or record shape.
pub const FINGERPRINT_SCHEMA_VERSION: &str = "1.0.0";
