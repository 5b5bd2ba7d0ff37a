//! Finite molecular fragments.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::elements;

/// A bond of a finite fragment, over local 0..k-1 atom indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentBond {
    /// First atom, local index.
    pub u: usize,
    /// Second atom, local index.
    pub v: usize,
    /// Optional bond weight carried over from the periodic graph.
    pub weight: Option<f64>,
}

/// A finite, non-periodic molecule extracted from a periodic graph.
///
/// Atoms are ordered; `home_indices[i]` is the home-cell site index the
/// i-th atom was expanded from. Produced per extraction call, never
/// persisted by the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularFragment {
    /// Species label per atom.
    pub species: Vec<String>,
    /// Cartesian coordinate per atom.
    pub coords: Vec<Vector3<f64>>,
    /// Back-reference into the home-cell site list, per atom.
    pub home_indices: Vec<usize>,
    /// Finite connectivity graph over local atom indices.
    pub bonds: Vec<FragmentBond>,
    /// Mass-weighted mean position of the fragment.
    pub center_of_mass: Vector3<f64>,
}

impl MolecularFragment {
    /// Number of atoms. A single isolated atom is a valid fragment.
    pub fn num_atoms(&self) -> usize {
        self.species.len()
    }

    /// True if the fragment has no atoms.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species counts, e.g. `{"H": 2, "O": 1}` for water.
    pub fn composition(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for species in &self.species {
            *counts.entry(species.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Shift all atoms so the center of mass sits at the origin.
    pub fn recenter(&mut self) {
        let shift = self.center_of_mass;
        for coord in &mut self.coords {
            *coord -= shift;
        }
        self.center_of_mass = Vector3::zeros();
    }

    /// Mass-weighted mean of a coordinate set. Species with no tabulated
    /// mass fall back to unit weight.
    pub fn compute_center_of_mass(species: &[String], coords: &[Vector3<f64>]) -> Vector3<f64> {
        let mut weighted = Vector3::zeros();
        let mut total = 0.0;
        for (label, coord) in species.iter().zip(coords) {
            let mass = elements::atomic_mass(label).unwrap_or_else(|| {
                tracing::warn!(species = %label, "no tabulated mass, using unit weight");
                1.0
            });
            weighted += coord * mass;
            total += mass;
        }
        if total > 0.0 {
            weighted / total
        } else {
            Vector3::zeros()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> MolecularFragment {
        let species = vec!["O".to_string(), "H".to_string(), "H".to_string()];
        let coords = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.96, 0.0, 0.0),
            Vector3::new(-0.24, 0.93, 0.0),
        ];
        let center_of_mass = MolecularFragment::compute_center_of_mass(&species, &coords);
        MolecularFragment {
            species,
            coords,
            home_indices: vec![0, 1, 2],
            bonds: vec![
                FragmentBond {
                    u: 0,
                    v: 1,
                    weight: None,
                },
                FragmentBond {
                    u: 0,
                    v: 2,
                    weight: None,
                },
            ],
            center_of_mass,
        }
    }

    #[test]
    fn test_composition() {
        let fragment = water();
        let composition = fragment.composition();
        assert_eq!(composition.get("H"), Some(&2));
        assert_eq!(composition.get("O"), Some(&1));
    }

    #[test]
    fn test_center_of_mass_near_oxygen() {
        let fragment = water();
        // Oxygen dominates the mass, so the center stays close to it.
        assert!(fragment.center_of_mass.norm() < 0.15);
    }

    #[test]
    fn test_recenter() {
        let mut fragment = water();
        fragment.recenter();
        assert!(fragment.center_of_mass.norm() < 1e-12);
        let recomputed =
            MolecularFragment::compute_center_of_mass(&fragment.species, &fragment.coords);
        assert!(recomputed.norm() < 1e-12);
    }
}
