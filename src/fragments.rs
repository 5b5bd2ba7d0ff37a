//! Finite-fragment extraction.
//!
//! Materializes a 3×3×3 supercell so any molecule wrapping the home
//! cell's boundary is fully connected, takes connected components of the
//! expanded simple graph, rejects components that wrap the *supercell*
//! boundary (those are infinite 1-, 2- or 3-dimensional sub-frameworks,
//! not molecules), and deduplicates the survivors up to species-preserving
//! graph isomorphism.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use nalgebra::Vector3;
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use crate::reduce::connected_components;
use crate::types::{FragmentBond, Image, MolecularFragment, PeriodicGraph};

/// Knobs for fragment extraction. `Default` gives the standard pipeline:
/// unique fragments, boundary rejection on, no edge pruning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentOptions {
    /// Require equal bond weights in the isomorphism match.
    pub use_weights: bool,
    /// Keep one representative per isomorphism class, recentered to the
    /// center of mass.
    pub return_unique: bool,
    /// Discard components that wrap the supercell boundary.
    pub check_boundary_crossing: bool,
    /// When not deduplicating, keep only components with at least one
    /// atom inside the home cell, one copy per distinct home-index set.
    pub filter_in_cell: bool,
    /// Drop expanded edges longer than this many Å before taking
    /// components. Defensive pruning against spurious long edges from
    /// upstream neighbor strategies.
    pub prune_edges_longer_than: Option<f64>,
}

impl Default for FragmentOptions {
    fn default() -> Self {
        Self {
            use_weights: false,
            return_unique: true,
            check_boundary_crossing: true,
            filter_in_cell: true,
            prune_edges_longer_than: None,
        }
    }
}

struct ExpandedSite {
    home: usize,
    frac: Vector3<f64>,
    cart: Vector3<f64>,
}

#[derive(Clone, Copy)]
struct ExpandedBond {
    weight: Option<f64>,
    crosses_boundary: bool,
}

/// Extract finite molecular fragments from a periodic graph.
///
/// An empty graph yields an empty list; a single isolated atom is a valid
/// fragment.
pub fn extract_fragments(
    graph: &PeriodicGraph,
    options: &FragmentOptions,
) -> Vec<MolecularFragment> {
    let num_sites = graph.num_sites();
    if num_sites == 0 {
        return Vec::new();
    }

    let offsets = supercell_offsets();
    let sites = expand_sites(graph, &offsets);
    let mut bonds = expand_bonds(graph, &offsets);

    if let Some(limit) = options.prune_edges_longer_than {
        bonds.retain(|&(a, b), _| (sites[a].cart - sites[b].cart).norm() <= limit);
    }

    let pairs: Vec<(usize, usize)> = bonds.keys().copied().collect();
    let components = connected_components(sites.len(), &pairs);

    let mut component_of = vec![usize::MAX; sites.len()];
    for (id, members) in components.iter().enumerate() {
        for &member in members {
            component_of[member] = id;
        }
    }

    let mut wraps = vec![false; components.len()];
    let mut local_bonds: Vec<Vec<(usize, usize, Option<f64>)>> = vec![Vec::new(); components.len()];
    for (&(a, b), bond) in &bonds {
        let id = component_of[a];
        wraps[id] |= bond.crosses_boundary;
        local_bonds[id].push((a, b, bond.weight));
    }

    let mut fragments = Vec::new();
    let mut member_sets = Vec::new();
    for (id, members) in components.iter().enumerate() {
        if options.check_boundary_crossing && wraps[id] {
            continue;
        }
        fragments.push(build_fragment(graph, &sites, members, &local_bonds[id]));
        member_sets.push(members.clone());
    }

    if options.return_unique {
        return deduplicate(fragments, options.use_weights);
    }

    if options.filter_in_cell {
        return filter_in_cell(fragments, &member_sets, &sites);
    }

    fragments
}

/// The 27 cell offsets of the tiling; the home cell is strictly interior.
fn supercell_offsets() -> Vec<Image> {
    let mut offsets = Vec::with_capacity(27);
    for a in -1..=1 {
        for b in -1..=1 {
            for c in -1..=1 {
                offsets.push([a, b, c]);
            }
        }
    }
    offsets
}

fn offset_rank(offset: Image) -> usize {
    ((offset[0] + 1) * 9 + (offset[1] + 1) * 3 + (offset[2] + 1)) as usize
}

/// Wrap a cell offset back into the tiling; reports whether wrapping was
/// needed (the edge crosses the supercell boundary).
fn wrap_offset(offset: Image) -> (Image, bool) {
    let wrapped = offset.map(|x| (x + 1).rem_euclid(3) - 1);
    (wrapped, wrapped != offset)
}

fn expand_sites(graph: &PeriodicGraph, offsets: &[Image]) -> Vec<ExpandedSite> {
    let mut sites = Vec::with_capacity(offsets.len() * graph.num_sites());
    for cell in offsets {
        let shift = Vector3::new(f64::from(cell[0]), f64::from(cell[1]), f64::from(cell[2]));
        for (home, site) in graph.sites().iter().enumerate() {
            let frac = site.frac + shift;
            sites.push(ExpandedSite {
                home,
                frac,
                cart: graph.lattice().to_cartesian(&frac),
            });
        }
    }
    sites
}

/// Collapse the expanded periodic multigraph into a simple undirected
/// bond map, keyed by unordered expanded-site pairs.
fn expand_bonds(
    graph: &PeriodicGraph,
    offsets: &[Image],
) -> BTreeMap<(usize, usize), ExpandedBond> {
    let num_sites = graph.num_sites();
    let mut bonds = BTreeMap::new();
    for (cell_index, cell) in offsets.iter().enumerate() {
        for edge in graph.edges() {
            let target = [
                cell[0] + edge.image[0],
                cell[1] + edge.image[1],
                cell[2] + edge.image[2],
            ];
            let (wrapped, crosses_boundary) = wrap_offset(target);
            let a = cell_index * num_sites + edge.u;
            let b = offset_rank(wrapped) * num_sites + edge.v;
            let key = (a.min(b), a.max(b));
            match bonds.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(ExpandedBond {
                        weight: edge.weight,
                        crosses_boundary,
                    });
                }
                Entry::Occupied(mut slot) => {
                    slot.get_mut().crosses_boundary |= crosses_boundary;
                }
            }
        }
    }
    bonds
}

fn build_fragment(
    graph: &PeriodicGraph,
    sites: &[ExpandedSite],
    members: &[usize],
    bonds: &[(usize, usize, Option<f64>)],
) -> MolecularFragment {
    let local_index: BTreeMap<usize, usize> = members
        .iter()
        .enumerate()
        .map(|(local, &expanded)| (expanded, local))
        .collect();

    let species: Vec<String> = members
        .iter()
        .map(|&m| graph.sites()[sites[m].home].species.clone())
        .collect();
    let coords: Vec<Vector3<f64>> = members.iter().map(|&m| sites[m].cart).collect();
    let home_indices: Vec<usize> = members.iter().map(|&m| sites[m].home).collect();
    let bonds: Vec<FragmentBond> = bonds
        .iter()
        .map(|&(a, b, weight)| FragmentBond {
            u: local_index[&a],
            v: local_index[&b],
            weight,
        })
        .collect();

    let center_of_mass = MolecularFragment::compute_center_of_mass(&species, &coords);
    MolecularFragment {
        species,
        coords,
        home_indices,
        bonds,
        center_of_mass,
    }
}

/// One representative per species-preserving isomorphism class, first
/// encountered wins; representatives are recentered.
fn deduplicate(fragments: Vec<MolecularFragment>, use_weights: bool) -> Vec<MolecularFragment> {
    let mut unique: Vec<MolecularFragment> = Vec::new();
    for fragment in fragments {
        let duplicate = unique
            .iter()
            .any(|kept| fragments_isomorphic(kept, &fragment, use_weights));
        if !duplicate {
            let mut representative = fragment;
            representative.recenter();
            unique.push(representative);
        }
    }
    unique
}

/// Keep fragments with at least one atom inside the home cell, one copy
/// per distinct sorted home-index set.
fn filter_in_cell(
    fragments: Vec<MolecularFragment>,
    member_sets: &[Vec<usize>],
    sites: &[ExpandedSite],
) -> Vec<MolecularFragment> {
    let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut kept = Vec::new();
    for (fragment, members) in fragments.into_iter().zip(member_sets) {
        let any_in_cell = members.iter().any(|&m| in_home_cell(&sites[m].frac));
        if !any_in_cell {
            continue;
        }
        let mut key = fragment.home_indices.clone();
        key.sort_unstable();
        if seen.insert(key) {
            kept.push(fragment);
        }
    }
    kept
}

fn in_home_cell(frac: &Vector3<f64>) -> bool {
    frac.iter().all(|&x| (-1e-8..=1.0 + 1e-8).contains(&x))
}

/// Species-label-preserving graph isomorphism between two fragments,
/// optionally also requiring equal bond weights.
pub fn fragments_isomorphic(
    a: &MolecularFragment,
    b: &MolecularFragment,
    use_weights: bool,
) -> bool {
    if a.num_atoms() != b.num_atoms()
        || a.bonds.len() != b.bonds.len()
        || a.composition() != b.composition()
    {
        return false;
    }
    let graph_a = fragment_petgraph(a);
    let graph_b = fragment_petgraph(b);
    is_isomorphic_matching(
        &graph_a,
        &graph_b,
        |x, y| x == y,
        |x, y| !use_weights || weights_match(*x, *y),
    )
}

fn fragment_petgraph(fragment: &MolecularFragment) -> UnGraph<&str, Option<f64>> {
    let mut graph = UnGraph::with_capacity(fragment.num_atoms(), fragment.bonds.len());
    let nodes: Vec<_> = fragment
        .species
        .iter()
        .map(|s| graph.add_node(s.as_str()))
        .collect();
    for bond in &fragment.bonds {
        graph.add_edge(nodes[bond.u], nodes[bond.v], bond.weight);
    }
    graph
}

fn weights_match(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => (x - y).abs() < 1e-8,
        _ => false,
    }
}
