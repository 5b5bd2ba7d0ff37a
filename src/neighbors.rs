//! Bonded-neighbor strategies.
//!
//! The kernel is polymorphic over anything implementing
//! [`NeighborStrategy`]; strategies differ only in which bonds they emit,
//! never in graph-processing semantics. A closed [`NeighborMethod`]
//! enumeration preserves the pick-by-name external interface without
//! stringly-typed dispatch, and cutoff tables live in explicit
//! [`CutoffConfig`] values constructed once at process start — there are no
//! ambient mutable singletons.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::elements;
use crate::types::{negate, Image, InvalidGraphError, Lattice, PeriodicEdge, PeriodicGraph, Site};

/// Error raised when a strategy cannot resolve a site's neighbors.
#[derive(Debug, thiserror::Error)]
pub enum UnresolvedNeighborError {
    /// The queried site index is outside the site list.
    #[error("site index {site} out of range (structure has {sites} sites)")]
    SiteOutOfRange {
        /// The queried site index.
        site: usize,
        /// Number of sites in the structure.
        sites: usize,
    },
    /// No cutoff radius is configured for a species.
    #[error("no cutoff radius for species {species:?} at site {site}")]
    MissingRadius {
        /// The unresolvable species label.
        species: String,
        /// Site carrying that species.
        site: usize,
    },
}

/// Error raised while building a bonded graph from a strategy.
#[derive(Debug, thiserror::Error)]
pub enum GraphBuildError {
    /// The strategy failed to resolve neighbors.
    #[error(transparent)]
    Neighbors(#[from] UnresolvedNeighborError),
    /// The strategy emitted an out-of-range site index.
    #[error(transparent)]
    Graph(#[from] InvalidGraphError),
}

/// One bonded neighbor of a site, with its periodic image offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Site index of the neighbor.
    pub index: usize,
    /// Lattice-translation offset of the neighbor's image.
    pub image: Image,
    /// Optional weight, typically the bond length in Å.
    pub weight: Option<f64>,
}

/// Supplies raw bonded-neighbor lists with periodic image offsets.
///
/// Implementations are not required to emit edges in a canonical
/// direction; [`build_bonded_graph`] deduplicates reversed emissions.
pub trait NeighborStrategy {
    /// Bonded neighbors of `site`, with periodic image offsets.
    fn neighbors(
        &self,
        lattice: &Lattice,
        sites: &[Site],
        site: usize,
    ) -> Result<Vec<Neighbor>, UnresolvedNeighborError>;
}

/// Explicit cutoff configuration for distance-based strategies.
///
/// Constructed once and shared by reference across batch workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffConfig {
    /// Per-element cutoff radii, Å, keyed by bare element symbol.
    pub radii: BTreeMap<String, f64>,
    /// Slack added on top of the summed radii of a pair.
    pub tolerance: f64,
    /// Hard ceiling on any bond length, Å.
    pub max_distance: f64,
}

impl CutoffConfig {
    /// Covalent-radii table with the tolerance used for framework
    /// structures (VESTA-style bonding).
    pub fn vesta() -> Self {
        Self {
            radii: elements::covalent_radius_table()
                .map(|(symbol, radius)| (symbol.to_string(), radius))
                .collect(),
            tolerance: 0.45,
            max_distance: 4.0,
        }
    }

    /// Covalent-radii table with the tighter tolerance used for atom
    /// typing.
    pub fn atom_typing() -> Self {
        Self {
            tolerance: 0.25,
            max_distance: 3.5,
            ..Self::vesta()
        }
    }

    /// Cutoff radius for a species label, if configured.
    pub fn radius_for(&self, species: &str) -> Option<f64> {
        self.radii.get(elements::element_symbol(species)).copied()
    }
}

/// Bond two sites whenever their distance is at most the sum of their
/// configured radii plus the tolerance.
pub struct CutoffStrategy {
    config: Arc<CutoffConfig>,
}

impl CutoffStrategy {
    /// Create a strategy over a shared cutoff configuration.
    pub fn new(config: Arc<CutoffConfig>) -> Self {
        Self { config }
    }
}

impl NeighborStrategy for CutoffStrategy {
    fn neighbors(
        &self,
        lattice: &Lattice,
        sites: &[Site],
        site: usize,
    ) -> Result<Vec<Neighbor>, UnresolvedNeighborError> {
        let center = sites
            .get(site)
            .ok_or(UnresolvedNeighborError::SiteOutOfRange {
                site,
                sites: sites.len(),
            })?;
        let center_radius = self.config.radius_for(&center.species).ok_or_else(|| {
            UnresolvedNeighborError::MissingRadius {
                species: center.species.clone(),
                site,
            }
        })?;

        let origin = lattice.to_cartesian(&center.frac);
        let mut found = Vec::new();
        for (index, other) in sites.iter().enumerate() {
            let other_radius = self.config.radius_for(&other.species).ok_or_else(|| {
                UnresolvedNeighborError::MissingRadius {
                    species: other.species.clone(),
                    site: index,
                }
            })?;
            let cutoff = (center_radius + other_radius + self.config.tolerance)
                .min(self.config.max_distance);
            for (image, distance) in
                images_within(lattice, &origin, &other.frac, self.config.max_distance)
            {
                if index == site && image == [0, 0, 0] {
                    continue;
                }
                if distance <= cutoff {
                    found.push(Neighbor {
                        index,
                        image,
                        weight: Some(distance),
                    });
                }
            }
        }
        Ok(found)
    }
}

/// Bond a site to everything within a small factor of its shortest
/// contact distance.
pub struct MinimumDistanceStrategy {
    /// Relative slack over the minimum distance.
    pub tolerance: f64,
    /// Search radius for candidate contacts, Å.
    pub cutoff: f64,
}

impl Default for MinimumDistanceStrategy {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            cutoff: 10.0,
        }
    }
}

impl NeighborStrategy for MinimumDistanceStrategy {
    fn neighbors(
        &self,
        lattice: &Lattice,
        sites: &[Site],
        site: usize,
    ) -> Result<Vec<Neighbor>, UnresolvedNeighborError> {
        let center = sites
            .get(site)
            .ok_or(UnresolvedNeighborError::SiteOutOfRange {
                site,
                sites: sites.len(),
            })?;
        let origin = lattice.to_cartesian(&center.frac);

        let mut candidates = Vec::new();
        for (index, other) in sites.iter().enumerate() {
            for (image, distance) in images_within(lattice, &origin, &other.frac, self.cutoff) {
                if index == site && image == [0, 0, 0] {
                    continue;
                }
                candidates.push((index, image, distance));
            }
        }

        let minimum = candidates
            .iter()
            .map(|(_, _, d)| *d)
            .fold(f64::INFINITY, f64::min);
        if !minimum.is_finite() {
            return Ok(Vec::new());
        }

        let threshold = minimum * (1.0 + self.tolerance);
        Ok(candidates
            .into_iter()
            .filter(|(_, _, distance)| *distance <= threshold)
            .map(|(index, image, distance)| Neighbor {
                index,
                image,
                weight: Some(distance),
            })
            .collect())
    }
}

/// All periodic images of `frac` within `radius` of `origin`, with their
/// distances. The image search box is sized from the lattice's
/// perpendicular widths so no image inside the radius is missed.
fn images_within(
    lattice: &Lattice,
    origin: &Vector3<f64>,
    frac: &Vector3<f64>,
    radius: f64,
) -> Vec<(Image, f64)> {
    let widths = lattice.perpendicular_widths();
    let reach = widths.map(|w| (radius / w).ceil().max(1.0) as i32 + 1);

    let mut hits = Vec::new();
    for a in -reach[0]..=reach[0] {
        for b in -reach[1]..=reach[1] {
            for c in -reach[2]..=reach[2] {
                let shifted = frac + Vector3::new(f64::from(a), f64::from(b), f64::from(c));
                let distance = (lattice.to_cartesian(&shifted) - origin).norm();
                if distance <= radius {
                    hits.push(([a, b, c], distance));
                }
            }
        }
    }
    hits
}

/// Closed enumeration of the bundled neighbor strategies.
///
/// Exhaustive mapping from the historical method names to concrete
/// constructors; unknown names resolve to `None` instead of silently
/// falling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborMethod {
    /// VESTA-style covalent cutoffs for framework structures.
    VestaCutoff,
    /// Tighter covalent cutoffs used for atom typing.
    AtomTypingCutoff,
    /// Shortest-contact bonding.
    MinimumDistance,
}

impl NeighborMethod {
    /// Resolve a method by its historical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "vesta" => Some(Self::VestaCutoff),
            "atr" => Some(Self::AtomTypingCutoff),
            "minimumdistance" => Some(Self::MinimumDistance),
            _ => None,
        }
    }

    /// Build the concrete strategy for this method.
    pub fn strategy(&self) -> Box<dyn NeighborStrategy + Send + Sync> {
        match self {
            Self::VestaCutoff => Box::new(CutoffStrategy::new(Arc::new(CutoffConfig::vesta()))),
            Self::AtomTypingCutoff => {
                Box::new(CutoffStrategy::new(Arc::new(CutoffConfig::atom_typing())))
            }
            Self::MinimumDistance => Box::new(MinimumDistanceStrategy::default()),
        }
    }
}

/// Build a periodic graph by querying `strategy` for every site's bonds.
///
/// Each bond is typically emitted twice, once from each endpoint;
/// emissions are reduced to one stored edge per bond before insertion.
pub fn build_bonded_graph(
    lattice: Lattice,
    sites: Vec<Site>,
    strategy: &dyn NeighborStrategy,
) -> Result<PeriodicGraph, GraphBuildError> {
    let mut graph = PeriodicGraph::new(lattice, sites);
    let mut seen: BTreeSet<(usize, usize, Image)> = BTreeSet::new();

    for site in 0..graph.num_sites() {
        let found = strategy.neighbors(graph.lattice(), graph.sites(), site)?;
        for neighbor in found {
            let key = bond_key(site, neighbor.index, neighbor.image);
            if !seen.insert(key) {
                continue;
            }
            let edge = match neighbor.weight {
                Some(weight) => PeriodicEdge::weighted(site, neighbor.index, neighbor.image, weight),
                None => PeriodicEdge::new(site, neighbor.index, neighbor.image),
            };
            graph.add_edge(edge)?;
        }
    }
    Ok(graph)
}

/// Direction-independent identity of a bond.
fn bond_key(u: usize, v: usize, image: Image) -> (usize, usize, Image) {
    if v < u || (v == u && negate(image) < image) {
        (v, u, negate(image))
    } else {
        (u, v, image)
    }
}
