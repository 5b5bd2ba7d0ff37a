//! Graph-reduction transforms.
//!
//! Leaf pruning and scaffold extraction run on the periodic graph before
//! quotient-graph construction. Both are pure copy-on-write functions: the
//! input graph is never mutated, so distinct structures can be reduced
//! concurrently on any worker pool.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{PeriodicEdge, PeriodicGraph};

/// A periodic graph with a subset of the original sites removed.
///
/// `kept_sites[i]` is the original index of the reduced graph's site `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedGraph {
    /// The reduced graph, reindexed to 0..k-1.
    pub graph: PeriodicGraph,
    /// Original site indices that survived the reduction, ascending.
    pub kept_sites: Vec<usize>,
}

/// Indices of all degree-1 sites (multiplicity-counted adjacency).
pub fn leaf_sites(graph: &PeriodicGraph) -> Vec<usize> {
    (0..graph.num_sites())
        .filter(|&site| graph.degree(site) == 1)
        .collect()
}

/// Remove every degree-1 site in a single pass.
///
/// Deliberately not iterated: a site that only becomes degree-1 after its
/// neighbor's removal is left in place. Downstream fingerprints are
/// defined relative to this single-pass behavior.
pub fn prune_leaf_sites(graph: &PeriodicGraph) -> ReducedGraph {
    let leaves: BTreeSet<usize> = leaf_sites(graph).into_iter().collect();
    let keep: Vec<usize> = (0..graph.num_sites())
        .filter(|site| !leaves.contains(site))
        .collect();
    retain_sites(graph, &keep)
}

/// Keep only the largest bridge-free component.
///
/// The simple undirected projection of the graph is stripped of all its
/// bridges; of the resulting connected components, only the largest by
/// site count survives (ties go to the component holding the smallest
/// site index). In framework chemistry the discarded pieces are pendant
/// functional groups and solvent, the survivor is the scaffold.
pub fn extract_scaffold(graph: &PeriodicGraph) -> ReducedGraph {
    let num_sites = graph.num_sites();
    let pairs: Vec<(usize, usize)> = graph
        .simple_pairs()
        .into_iter()
        .filter(|(u, v)| u != v)
        .collect();

    let bridge_set: BTreeSet<(usize, usize)> = bridges(num_sites, &pairs).into_iter().collect();
    let remaining: Vec<(usize, usize)> = pairs
        .into_iter()
        .filter(|pair| !bridge_set.contains(pair))
        .collect();

    let components = connected_components(num_sites, &remaining);
    // Ties go to the first-encountered component, not the last.
    let mut largest: &[usize] = &[];
    for component in &components {
        if component.len() > largest.len() {
            largest = component;
        }
    }
    retain_sites(graph, largest)
}

/// Keep exactly the named sites, dropping every edge touching a removed
/// site. Copy-on-write; the input graph is untouched.
pub fn retain_sites(graph: &PeriodicGraph, keep: &[usize]) -> ReducedGraph {
    let kept_sites: Vec<usize> = {
        let unique: BTreeSet<usize> = keep
            .iter()
            .copied()
            .filter(|&site| site < graph.num_sites())
            .collect();
        unique.into_iter().collect()
    };

    let mut remap = vec![usize::MAX; graph.num_sites()];
    for (new_index, &old_index) in kept_sites.iter().enumerate() {
        remap[old_index] = new_index;
    }

    let sites = kept_sites
        .iter()
        .map(|&old_index| graph.sites()[old_index].clone())
        .collect();
    let edges = graph
        .edges()
        .iter()
        .filter(|edge| remap[edge.u] != usize::MAX && remap[edge.v] != usize::MAX)
        .map(|edge| PeriodicEdge {
            u: remap[edge.u],
            v: remap[edge.v],
            image: edge.image,
            weight: edge.weight,
        })
        .collect();

    ReducedGraph {
        graph: PeriodicGraph::from_parts_unchecked(graph.lattice().clone(), sites, edges),
        kept_sites,
    }
}

/// All bridges of the simple graph over `num_sites` nodes, as `(min, max)`
/// pairs. Iterative Tarjan low-link pass; self-loops must already be
/// filtered out.
pub(crate) fn bridges(num_sites: usize, pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); num_sites];
    for (edge_id, &(u, v)) in pairs.iter().enumerate() {
        adjacency[u].push((v, edge_id));
        adjacency[v].push((u, edge_id));
    }

    let mut discovery = vec![usize::MAX; num_sites];
    let mut low = vec![usize::MAX; num_sites];
    let mut timer = 0;
    let mut found = Vec::new();

    for root in 0..num_sites {
        if discovery[root] != usize::MAX {
            continue;
        }
        // Frames of (node, edge used to enter it, next adjacency slot).
        let mut stack: Vec<(usize, usize, usize)> = vec![(root, usize::MAX, 0)];
        discovery[root] = timer;
        low[root] = timer;
        timer += 1;

        while !stack.is_empty() {
            let top = stack.len() - 1;
            let (node, entry_edge, slot) = stack[top];
            if slot < adjacency[node].len() {
                stack[top].2 += 1;
                let (next, edge_id) = adjacency[node][slot];
                if edge_id == entry_edge {
                    continue;
                }
                if discovery[next] == usize::MAX {
                    discovery[next] = timer;
                    low[next] = timer;
                    timer += 1;
                    stack.push((next, edge_id, 0));
                } else {
                    low[node] = low[node].min(discovery[next]);
                }
            } else {
                stack.pop();
                if let Some(&(parent, _, _)) = stack.last() {
                    low[parent] = low[parent].min(low[node]);
                    if low[node] > discovery[parent] {
                        found.push((parent.min(node), parent.max(node)));
                    }
                }
            }
        }
    }
    found
}

/// Connected components over `num_sites` nodes, each sorted ascending,
/// ordered by their smallest member. Isolated nodes form singleton
/// components.
pub(crate) fn connected_components(
    num_sites: usize,
    pairs: &[(usize, usize)],
) -> Vec<Vec<usize>> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); num_sites];
    for &(u, v) in pairs {
        if u != v {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
    }

    let mut component_of = vec![usize::MAX; num_sites];
    let mut components = Vec::new();
    for root in 0..num_sites {
        if component_of[root] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = vec![root];
        component_of[root] = id;
        let mut cursor = 0;
        while cursor < members.len() {
            let node = members[cursor];
            cursor += 1;
            for &next in &adjacency[node] {
                if component_of[next] == usize::MAX {
                    component_of[next] = id;
                    members.push(next);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lattice, Site};

    fn graph_with(species: &[&str], edges: Vec<PeriodicEdge>) -> PeriodicGraph {
        let sites = species
            .iter()
            .enumerate()
            .map(|(i, s)| Site::new(*s, [0.1 * i as f64, 0.0, 0.0]))
            .collect();
        PeriodicGraph::from_edges(Lattice::cubic(10.0).unwrap(), sites, edges).unwrap()
    }

    #[test]
    fn test_leaf_sites() {
        // Periodic C chain with one terminal H.
        let graph = graph_with(
            &["C", "H"],
            vec![
                PeriodicEdge::new(0, 0, [1, 0, 0]),
                PeriodicEdge::new(0, 1, [0, 0, 0]),
            ],
        );
        assert_eq!(leaf_sites(&graph), vec![1]);
    }

    #[test]
    fn test_prune_removes_terminal_hydrogens() {
        let graph = graph_with(
            &["C", "H", "H"],
            vec![
                PeriodicEdge::new(0, 0, [1, 0, 0]),
                PeriodicEdge::new(0, 1, [0, 0, 0]),
                PeriodicEdge::new(0, 2, [0, 0, 0]),
            ],
        );
        let reduced = prune_leaf_sites(&graph);

        assert_eq!(reduced.kept_sites, vec![0]);
        assert_eq!(reduced.graph.num_sites(), 1);
        assert_eq!(reduced.graph.edges().len(), 1);
        assert_eq!(reduced.graph.sites()[0].species, "C");
    }

    #[test]
    fn test_prune_is_single_pass() {
        // H-O-C(chain): removing H makes O degree-1, but O stays.
        let graph = graph_with(
            &["C", "O", "H"],
            vec![
                PeriodicEdge::new(0, 0, [1, 0, 0]),
                PeriodicEdge::new(0, 1, [0, 0, 0]),
                PeriodicEdge::new(1, 2, [0, 0, 0]),
            ],
        );
        let reduced = prune_leaf_sites(&graph);

        assert_eq!(reduced.kept_sites, vec![0, 1]);
        let again = prune_leaf_sites(&reduced.graph);
        assert_eq!(again.kept_sites, vec![0]);
    }

    #[test]
    fn test_prune_without_leaves_is_identity() {
        let graph = graph_with(
            &["C", "N"],
            vec![
                PeriodicEdge::new(0, 1, [0, 0, 0]),
                PeriodicEdge::new(0, 1, [1, 0, 0]),
            ],
        );
        let reduced = prune_leaf_sites(&graph);

        assert_eq!(reduced.graph.num_sites(), graph.num_sites());
        assert_eq!(reduced.graph.edges().len(), graph.edges().len());
    }

    #[test]
    fn test_bridges_in_barbell() {
        // Two triangles joined by one edge: only the joining edge is a
        // bridge.
        let pairs = vec![(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (3, 5)];
        let found = bridges(6, &pairs);
        assert_eq!(found, vec![(2, 3)]);
    }

    #[test]
    fn test_scaffold_drops_pendant_group() {
        // Periodic C scaffold with a pendant N-H group hanging off a
        // bridge.
        let graph = graph_with(
            &["C", "N", "H"],
            vec![
                PeriodicEdge::new(0, 0, [1, 0, 0]),
                PeriodicEdge::new(0, 1, [0, 0, 0]),
                PeriodicEdge::new(1, 2, [0, 0, 0]),
            ],
        );
        let reduced = extract_scaffold(&graph);

        assert_eq!(reduced.kept_sites, vec![0]);
        assert_eq!(reduced.graph.sites()[0].species, "C");
        assert_eq!(reduced.graph.edges().len(), 1);
    }

    #[test]
    fn test_scaffold_of_bridge_free_graph_is_identity() {
        // Triangle: no bridges, everything survives.
        let graph = graph_with(
            &["C", "N", "O"],
            vec![
                PeriodicEdge::new(0, 1, [0, 0, 0]),
                PeriodicEdge::new(1, 2, [0, 0, 0]),
                PeriodicEdge::new(0, 2, [0, 0, 0]),
            ],
        );
        let reduced = extract_scaffold(&graph);

        assert_eq!(reduced.graph.num_sites(), graph.num_sites());
        assert_eq!(reduced.graph.edges().len(), graph.edges().len());
    }

    #[test]
    fn test_retain_sites_reindexes_edges() {
        let graph = graph_with(
            &["C", "O", "N"],
            vec![
                PeriodicEdge::new(0, 1, [0, 0, 0]),
                PeriodicEdge::new(1, 2, [0, 1, 0]),
            ],
        );
        let reduced = retain_sites(&graph, &[1, 2]);

        assert_eq!(reduced.kept_sites, vec![1, 2]);
        assert_eq!(reduced.graph.num_sites(), 2);
        assert_eq!(reduced.graph.edges().len(), 1);
        let edge = &reduced.graph.edges()[0];
        assert_eq!((edge.u, edge.v, edge.image), (0, 1, [0, 1, 0]));
    }

    #[test]
    fn test_components_order_and_singletons() {
        let components = connected_components(5, &[(3, 4), (1, 2)]);
        assert_eq!(components, vec![vec![0], vec![1, 2], vec![3, 4]]);
    }
}
