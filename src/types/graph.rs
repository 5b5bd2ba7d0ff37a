//! Periodic connectivity graphs.

use std::collections::BTreeSet;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::edge::{negate, Image, PeriodicEdge};
use super::lattice::Lattice;
use super::site::Site;

/// Error for malformed graph input.
#[derive(Debug, thiserror::Error)]
pub enum InvalidGraphError {
    /// An edge references a site index outside the site list.
    #[error("edge ({u}, {v}) references a site out of range (graph has {sites} sites)")]
    SiteOutOfRange {
        /// First endpoint of the offending edge.
        u: usize,
        /// Second endpoint of the offending edge.
        v: usize,
        /// Number of sites in the graph.
        sites: usize,
    },
}

/// Periodic atomic-connectivity graph: a lattice, an ordered site list and
/// a multiset of periodic edges. Site index is identity; the same pair of
/// sites may be connected by several edges with different image offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicGraph {
    lattice: Lattice,
    sites: Vec<Site>,
    edges: Vec<PeriodicEdge>,
}

impl PeriodicGraph {
    /// Create a graph with no bonds.
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self {
            lattice,
            sites,
            edges: Vec::new(),
        }
    }

    /// Create a graph from a bond list, validating indices and skipping
    /// duplicate bonds.
    pub fn from_edges(
        lattice: Lattice,
        sites: Vec<Site>,
        edges: Vec<PeriodicEdge>,
    ) -> Result<Self, InvalidGraphError> {
        let mut graph = Self::new(lattice, sites);
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    pub(crate) fn from_parts_unchecked(
        lattice: Lattice,
        sites: Vec<Site>,
        edges: Vec<PeriodicEdge>,
    ) -> Self {
        Self {
            lattice,
            sites,
            edges,
        }
    }

    /// Insert a bond.
    ///
    /// An edge equal to a stored one, or equal to a stored one reversed,
    /// is skipped with a warning; returns whether the edge was stored.
    pub fn add_edge(&mut self, edge: PeriodicEdge) -> Result<bool, InvalidGraphError> {
        let sites = self.sites.len();
        if edge.u >= sites || edge.v >= sites {
            return Err(InvalidGraphError::SiteOutOfRange {
                u: edge.u,
                v: edge.v,
                sites,
            });
        }
        if self.edges.iter().any(|e| e.is_same_bond(&edge)) {
            tracing::warn!(
                u = edge.u,
                v = edge.v,
                image = ?edge.image,
                "skipping duplicate periodic edge"
            );
            return Ok(false);
        }
        self.edges.push(edge);
        Ok(true)
    }

    /// The lattice this graph lives on.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// All sites, in identity order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// All stored bonds.
    pub fn edges(&self) -> &[PeriodicEdge] {
        &self.edges
    }

    /// Number of sites.
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// True if the graph has no sites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Cartesian position of a site's home-cell image.
    pub fn cartesian_position(&self, site: usize) -> Vector3<f64> {
        self.lattice.to_cartesian(&self.sites[site].frac)
    }

    /// Endpoint-incidence degree of a site; a self-edge contributes 2.
    pub fn degree(&self, site: usize) -> usize {
        let mut degree = 0;
        for edge in &self.edges {
            if edge.u == site {
                degree += 1;
            }
            if edge.v == site {
                degree += 1;
            }
        }
        degree
    }

    /// Coordination number: distinct `(neighbor, image)` pairs seen from
    /// `site`, counting periodic multiplicity. A self-edge contributes its
    /// two opposite images.
    pub fn coordination_number(&self, site: usize) -> usize {
        let mut seen: BTreeSet<(usize, Image)> = BTreeSet::new();
        for edge in &self.edges {
            if edge.u == site {
                seen.insert((edge.v, edge.image));
            }
            if edge.v == site {
                seen.insert((edge.u, negate(edge.image)));
            }
        }
        seen.len()
    }

    /// Unordered simple-graph projection: one `(min, max)` pair per bonded
    /// site pair, image offsets and multiplicity discarded. Self-loops are
    /// kept as `(u, u)`.
    pub(crate) fn simple_pairs(&self) -> BTreeSet<(usize, usize)> {
        self.edges
            .iter()
            .map(|e| (e.u.min(e.v), e.u.max(e.v)))
            .collect()
    }

    /// Check every stored edge against the site list.
    pub fn validate(&self) -> Result<(), InvalidGraphError> {
        let sites = self.sites.len();
        for edge in &self.edges {
            if edge.u >= sites || edge.v >= sites {
                return Err(InvalidGraphError::SiteOutOfRange {
                    u: edge.u,
                    v: edge.v,
                    sites,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_site_graph() -> PeriodicGraph {
        PeriodicGraph::new(
            Lattice::cubic(5.0).unwrap(),
            vec![Site::new("H", [0.0, 0.0, 0.0]), Site::new("He", [0.5, 0.5, 0.5])],
        )
    }

    #[test]
    fn test_add_edge_rejects_bad_index() {
        let mut graph = two_site_graph();
        let err = graph.add_edge(PeriodicEdge::new(0, 2, [0, 0, 0]));
        assert!(err.is_err());
    }

    #[test]
    fn test_add_edge_skips_reversed_duplicate() {
        let mut graph = two_site_graph();
        assert!(graph.add_edge(PeriodicEdge::new(0, 1, [1, 0, 0])).unwrap());
        assert!(!graph.add_edge(PeriodicEdge::new(1, 0, [-1, 0, 0])).unwrap());
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_self_edge_degree_and_coordination() {
        let mut graph = two_site_graph();
        graph.add_edge(PeriodicEdge::new(0, 0, [1, 0, 0])).unwrap();

        // One self-edge: two endpoint incidences, two distinct images.
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.coordination_number(0), 2);
        assert_eq!(graph.degree(1), 0);
    }

    #[test]
    fn test_simple_pairs_collapse_multiplicity() {
        let mut graph = two_site_graph();
        graph.add_edge(PeriodicEdge::new(0, 1, [0, 0, 0])).unwrap();
        graph.add_edge(PeriodicEdge::new(0, 1, [1, 0, 0])).unwrap();
        graph.add_edge(PeriodicEdge::new(0, 0, [0, 1, 0])).unwrap();

        let pairs = graph.simple_pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&(0, 0)));
        assert!(pairs.contains(&(0, 1)));
    }
}
