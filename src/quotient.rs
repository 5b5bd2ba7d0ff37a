//! Canonical quotient graphs.
//!
//! A quotient graph identifies each periodic site with one representative
//! per unit cell, retaining connectivity and (in LQG mode) translation
//! labels. It is derived from a [`PeriodicGraph`] and recomputed whenever
//! the underlying graph changes, never mutated directly.
//!
//! ## Voltage
//!
//! The voltage of an edge `(u, v, image)` is the net lattice translation
//! it crosses, canonicalized so the label does not depend on which
//! endpoint the neighbor strategy happened to list first: attach
//! translation `(0,0,0)` to `u` and `-image` to `v`, reorder the endpoint
//! pair by ascending site index (self-edges keep their original order),
//! and take the difference of the reordered translations. Relabeling
//! invariance of the LQG fingerprints depends on this rule.

use serde::{Deserialize, Serialize};

use crate::types::{negate, Image, InvalidGraphError, PeriodicGraph};

/// How periodic edges are projected into the quotient graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotientMode {
    /// Collapse every edge of a site pair into one undirected unlabeled
    /// edge.
    Simple,
    /// Labeled quotient graph: keep every edge as a directed multigraph
    /// edge carrying its voltage.
    Lqg,
}

/// A node of the quotient graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotientNode {
    /// Species label of the underlying site.
    pub species: String,
    /// Species plus coordination number, e.g. `"C-3"`.
    pub species_cn: String,
}

/// An edge of the quotient graph. Endpoints are ordered ascending; the
/// voltage is present in LQG mode only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuotientEdge {
    /// Lower endpoint.
    pub u: usize,
    /// Upper endpoint.
    pub v: usize,
    /// Canonical net lattice translation, LQG mode only.
    pub voltage: Option<Image>,
}

/// Node-labeled, optionally edge-labeled graph over the home-cell site
/// index space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotientGraph {
    /// Projection mode this graph was built with.
    pub mode: QuotientMode,
    /// One node per site, in site order.
    pub nodes: Vec<QuotientNode>,
    /// Projected edges, canonically ordered.
    pub edges: Vec<QuotientEdge>,
}

impl QuotientGraph {
    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

/// Canonical net lattice translation crossed by edge `(u, v, image)`,
/// identical for `(v, u, -image)`.
pub fn voltage(u: usize, v: usize, image: Image) -> Image {
    if v < u {
        negate(image)
    } else {
        image
    }
}

/// Project a periodic graph onto its quotient graph.
///
/// Node and edge counts match the input exactly: no nodes or edges are
/// invented or dropped beyond the mode's projection rule.
pub fn build_quotient_graph(
    graph: &PeriodicGraph,
    mode: QuotientMode,
) -> Result<QuotientGraph, InvalidGraphError> {
    graph.validate()?;

    let nodes = graph
        .sites()
        .iter()
        .enumerate()
        .map(|(index, site)| QuotientNode {
            species: site.species.clone(),
            species_cn: format!("{}-{}", site.species, graph.coordination_number(index)),
        })
        .collect();

    let mut edges: Vec<QuotientEdge> = match mode {
        QuotientMode::Simple => graph
            .simple_pairs()
            .into_iter()
            .map(|(u, v)| QuotientEdge {
                u,
                v,
                voltage: None,
            })
            .collect(),
        QuotientMode::Lqg => graph
            .edges()
            .iter()
            .map(|edge| QuotientEdge {
                u: edge.u.min(edge.v),
                v: edge.u.max(edge.v),
                voltage: Some(voltage(edge.u, edge.v, edge.image)),
            })
            .collect(),
    };
    edges.sort();

    Ok(QuotientGraph { mode, nodes, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lattice, PeriodicEdge, Site};

    fn diatomic_graph(edges: Vec<PeriodicEdge>) -> PeriodicGraph {
        PeriodicGraph::from_edges(
            Lattice::cubic(4.0).unwrap(),
            vec![Site::new("C", [0.0, 0.0, 0.0]), Site::new("N", [0.5, 0.5, 0.5])],
            edges,
        )
        .unwrap()
    }

    #[test]
    fn test_voltage_direction_independent() {
        assert_eq!(voltage(0, 1, [1, 0, 0]), voltage(1, 0, [-1, 0, 0]));
        assert_eq!(voltage(2, 5, [0, -1, 1]), voltage(5, 2, [0, 1, -1]));
    }

    #[test]
    fn test_self_edge_voltage_keeps_original_order() {
        assert_eq!(voltage(3, 3, [1, 0, 0]), [1, 0, 0]);
    }

    #[test]
    fn test_node_labels_carry_coordination() {
        let graph = diatomic_graph(vec![
            PeriodicEdge::new(0, 1, [0, 0, 0]),
            PeriodicEdge::new(0, 1, [-1, 0, 0]),
        ]);
        let quotient = build_quotient_graph(&graph, QuotientMode::Simple).unwrap();

        assert_eq!(quotient.nodes[0].species, "C");
        assert_eq!(quotient.nodes[0].species_cn, "C-2");
        assert_eq!(quotient.nodes[1].species_cn, "N-2");
    }

    #[test]
    fn test_simple_mode_collapses_multiplicity() {
        let graph = diatomic_graph(vec![
            PeriodicEdge::new(0, 1, [0, 0, 0]),
            PeriodicEdge::new(0, 1, [-1, 0, 0]),
            PeriodicEdge::new(0, 0, [0, 0, 1]),
        ]);
        let quotient = build_quotient_graph(&graph, QuotientMode::Simple).unwrap();

        assert_eq!(quotient.num_edges(), 2);
        assert!(quotient.edges.iter().all(|e| e.voltage.is_none()));
    }

    #[test]
    fn test_lqg_mode_preserves_multiplicity_and_voltage() {
        let graph = diatomic_graph(vec![
            PeriodicEdge::new(0, 1, [0, 0, 0]),
            PeriodicEdge::new(1, 0, [1, 0, 0]),
        ]);
        let quotient = build_quotient_graph(&graph, QuotientMode::Lqg).unwrap();

        assert_eq!(quotient.num_edges(), 2);
        let voltages: Vec<Image> = quotient.edges.iter().filter_map(|e| e.voltage).collect();
        assert_eq!(voltages, vec![[-1, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_out_of_range_edge_rejected() {
        let graph = PeriodicGraph::from_parts_unchecked(
            Lattice::cubic(4.0).unwrap(),
            vec![Site::new("C", [0.0, 0.0, 0.0])],
            vec![PeriodicEdge::new(0, 4, [0, 0, 0])],
        );
        assert!(build_quotient_graph(&graph, QuotientMode::Simple).is_err());
    }
}
