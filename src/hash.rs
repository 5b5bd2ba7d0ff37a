//! Canonical graph hashing.
//!
//! Iterative neighborhood-signature refinement (Weisfeiler-Lehman style)
//! over quotient graphs, producing the six fingerprint variants:
//! `{undecorated, decorated} × {graph, no_leaf, scaffold}`.
//!
//! ## Determinism Guarantees
//!
//! - Two graphs isomorphic under a label- and edge-preserving mapping
//!   produce identical digests
//! - Site relabeling and rigid motions never change a digest
//!
//! The converse does not hold: this is an approximate canonical form, and
//! distinct topologies can collide. Treat equal fingerprints as a
//! candidate match and pair them with an explicit isomorphism check when
//! proof of identical topology is required.

use crate::canonical::canonical_hash_hex;
use crate::quotient::{build_quotient_graph, QuotientGraph, QuotientMode};
use crate::reduce::{extract_scaffold, prune_leaf_sites};
use crate::types::{negate, Image, InvalidGraphError, PeriodicGraph};

/// Refinement rounds used by all public fingerprint variants.
pub const WL_ITERATIONS: usize = 6;

/// Placeholder signature for undecorated hashing.
const UNLABELED: &str = "*";

/// Error raised when a hash cannot be computed.
#[derive(Debug, thiserror::Error)]
pub enum HashComputationError {
    /// The graph (possibly after reduction) has no nodes left to hash.
    #[error("cannot hash an empty graph")]
    EmptyGraph,
    /// The underlying periodic graph is malformed.
    #[error(transparent)]
    InvalidGraph(#[from] InvalidGraphError),
}

/// Run iterative neighborhood-signature refinement on a quotient graph.
///
/// Each round replaces a node's signature with a digest of its own
/// signature plus the sorted multiset of `(neighbor signature, edge
/// label)` over all incident edges. Each endpoint sees the edge label
/// with the translation oriented away from itself (a self-loop
/// contributes both orientations), so the digest is independent of the
/// direction an edge happened to be stored in and of any site
/// relabeling. The final digest covers the sorted signature multiset and
/// the edge count.
pub fn generate_hash(
    graph: &QuotientGraph,
    node_labeled: bool,
    edge_labeled: bool,
    iterations: usize,
) -> Result<String, HashComputationError> {
    let num_nodes = graph.num_nodes();
    if num_nodes == 0 {
        return Err(HashComputationError::EmptyGraph);
    }

    // Incidence lists: (neighbor, edge label as seen from this endpoint).
    let mut incidence: Vec<Vec<(usize, String)>> = vec![Vec::new(); num_nodes];
    for edge in &graph.edges {
        let (from_lower, from_upper) = match edge.voltage {
            Some(v) if edge_labeled => (format_image(v), format_image(negate(v))),
            _ => (String::new(), String::new()),
        };
        incidence[edge.u].push((edge.v, from_lower));
        incidence[edge.v].push((edge.u, from_upper));
    }

    let mut signatures: Vec<String> = (0..num_nodes)
        .map(|node| {
            if node_labeled {
                graph.nodes[node].species.clone()
            } else {
                UNLABELED.to_string()
            }
        })
        .collect();

    for _ in 0..iterations {
        let mut next = Vec::with_capacity(num_nodes);
        for node in 0..num_nodes {
            let mut neighborhood: Vec<String> = incidence[node]
                .iter()
                .map(|(neighbor, label)| format!("{}|{}", signatures[*neighbor], label))
                .collect();
            neighborhood.sort_unstable();
            next.push(canonical_hash_hex(&(&signatures[node], neighborhood)));
        }
        signatures = next;
    }

    signatures.sort_unstable();
    Ok(canonical_hash_hex(&(signatures, graph.num_edges())))
}

fn format_image([a, b, c]: Image) -> String {
    format!("{a},{b},{c}")
}

fn quotient_mode(lqg: bool) -> QuotientMode {
    if lqg {
        QuotientMode::Lqg
    } else {
        QuotientMode::Simple
    }
}

fn hash_graph(
    graph: &PeriodicGraph,
    node_labeled: bool,
    lqg: bool,
) -> Result<String, HashComputationError> {
    let quotient = build_quotient_graph(graph, quotient_mode(lqg))?;
    generate_hash(&quotient, node_labeled, lqg, WL_ITERATIONS)
}

/// Hash of the full quotient graph, ignoring atomic species.
pub fn undecorated_graph_hash(
    graph: &PeriodicGraph,
    lqg: bool,
) -> Result<String, HashComputationError> {
    hash_graph(graph, false, lqg)
}

/// Hash of the full quotient graph, including atomic species.
pub fn decorated_graph_hash(
    graph: &PeriodicGraph,
    lqg: bool,
) -> Result<String, HashComputationError> {
    hash_graph(graph, true, lqg)
}

/// Species-blind hash with leaf sites pruned first.
pub fn undecorated_no_leaf_hash(
    graph: &PeriodicGraph,
    lqg: bool,
) -> Result<String, HashComputationError> {
    hash_graph(&prune_leaf_sites(graph).graph, false, lqg)
}

/// Species-aware hash with leaf sites pruned first.
pub fn decorated_no_leaf_hash(
    graph: &PeriodicGraph,
    lqg: bool,
) -> Result<String, HashComputationError> {
    hash_graph(&prune_leaf_sites(graph).graph, true, lqg)
}

/// Species-blind hash of the bridge-free scaffold.
pub fn undecorated_scaffold_hash(
    graph: &PeriodicGraph,
    lqg: bool,
) -> Result<String, HashComputationError> {
    hash_graph(&extract_scaffold(graph).graph, false, lqg)
}

/// Species-aware hash of the bridge-free scaffold.
pub fn decorated_scaffold_hash(
    graph: &PeriodicGraph,
    lqg: bool,
) -> Result<String, HashComputationError> {
    hash_graph(&extract_scaffold(graph).graph, true, lqg)
}
