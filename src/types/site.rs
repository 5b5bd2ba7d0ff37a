//! Crystal sites.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One site of the home cell: a species label plus fractional coordinates.
///
/// Coordinates are conceptually in [0, 1) but are not clamped; a site
/// slightly outside the cell is carried as-is. Sites are owned by exactly
/// one [`PeriodicGraph`](crate::PeriodicGraph) and identified by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Species label, e.g. `"Zn"` or `"O2-"`.
    pub species: String,
    /// Fractional coordinates in the lattice basis.
    pub frac: Vector3<f64>,
}

impl Site {
    /// Create a new site.
    pub fn new(species: impl Into<String>, frac: [f64; 3]) -> Self {
        Self {
            species: species.into(),
            frac: Vector3::new(frac[0], frac[1], frac[2]),
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.4}, {:.4}, {:.4})",
            self.species, self.frac.x, self.frac.y, self.frac.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let site = Site::new("Zn", [0.5, 0.25, 0.0]);
        assert_eq!(format!("{site}"), "Zn (0.5000, 0.2500, 0.0000)");
    }
}
