//! Static element data.
//!
//! Atomic masses (IUPAC standard atomic weights) and covalent radii
//! (Cordero et al., 2008) for the species labels that appear in crystal
//! structures. Tables are `'static` and read-only, safe to share across
//! batch workers without locking.
//!
//! Species labels may carry charge or oxidation-state suffixes ("Zn2+",
//! "O2-"); lookups strip everything after the leading alphabetic symbol.

/// Standard atomic weights, amu.
static ATOMIC_MASSES: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.180),
    ("Na", 22.990),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Sc", 44.956),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Ga", 69.723),
    ("Ge", 72.630),
    ("As", 74.922),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Kr", 83.798),
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Y", 88.906),
    ("Zr", 91.224),
    ("Nb", 92.906),
    ("Mo", 95.95),
    ("Ru", 101.07),
    ("Rh", 102.91),
    ("Pd", 106.42),
    ("Ag", 107.87),
    ("Cd", 112.41),
    ("In", 114.82),
    ("Sn", 118.71),
    ("Sb", 121.76),
    ("Te", 127.60),
    ("I", 126.90),
    ("Xe", 131.29),
    ("Cs", 132.91),
    ("Ba", 137.33),
    ("La", 138.91),
    ("Ce", 140.12),
    ("Nd", 144.24),
    ("Sm", 150.36),
    ("Eu", 151.96),
    ("Gd", 157.25),
    ("Tb", 158.93),
    ("Dy", 162.50),
    ("Ho", 164.93),
    ("Er", 167.26),
    ("Yb", 173.05),
    ("Lu", 174.97),
    ("Hf", 178.49),
    ("Ta", 180.95),
    ("W", 183.84),
    ("Re", 186.21),
    ("Os", 190.23),
    ("Ir", 192.22),
    ("Pt", 195.08),
    ("Au", 196.97),
    ("Hg", 200.59),
    ("Tl", 204.38),
    ("Pb", 207.2),
    ("Bi", 208.98),
    ("Th", 232.04),
    ("U", 238.03),
];

/// Single-bond covalent radii, Å.
static COVALENT_RADII: &[(&str, f64)] = &[
    ("H", 0.31),
    ("He", 0.28),
    ("Li", 1.28),
    ("Be", 0.96),
    ("B", 0.84),
    ("C", 0.76),
    ("N", 0.71),
    ("O", 0.66),
    ("F", 0.57),
    ("Ne", 0.58),
    ("Na", 1.66),
    ("Mg", 1.41),
    ("Al", 1.21),
    ("Si", 1.11),
    ("P", 1.07),
    ("S", 1.05),
    ("Cl", 1.02),
    ("Ar", 1.06),
    ("K", 2.03),
    ("Ca", 1.76),
    ("Sc", 1.70),
    ("Ti", 1.60),
    ("V", 1.53),
    ("Cr", 1.39),
    ("Mn", 1.39),
    ("Fe", 1.32),
    ("Co", 1.26),
    ("Ni", 1.24),
    ("Cu", 1.32),
    ("Zn", 1.22),
    ("Ga", 1.22),
    ("Ge", 1.20),
    ("As", 1.19),
    ("Se", 1.20),
    ("Br", 1.20),
    ("Kr", 1.16),
    ("Rb", 2.20),
    ("Sr", 1.95),
    ("Y", 1.90),
    ("Zr", 1.75),
    ("Nb", 1.64),
    ("Mo", 1.54),
    ("Ru", 1.46),
    ("Rh", 1.42),
    ("Pd", 1.39),
    ("Ag", 1.45),
    ("Cd", 1.44),
    ("In", 1.42),
    ("Sn", 1.39),
    ("Sb", 1.39),
    ("Te", 1.38),
    ("I", 1.39),
    ("Xe", 1.40),
    ("Cs", 2.44),
    ("Ba", 2.15),
    ("La", 2.07),
    ("Ce", 2.04),
    ("Nd", 2.01),
    ("Sm", 1.98),
    ("Eu", 1.98),
    ("Gd", 1.96),
    ("Tb", 1.94),
    ("Dy", 1.92),
    ("Ho", 1.92),
    ("Er", 1.89),
    ("Yb", 1.87),
    ("Lu", 1.87),
    ("Hf", 1.75),
    ("Ta", 1.70),
    ("W", 1.62),
    ("Re", 1.51),
    ("Os", 1.44),
    ("Ir", 1.41),
    ("Pt", 1.36),
    ("Au", 1.36),
    ("Hg", 1.32),
    ("Tl", 1.45),
    ("Pb", 1.46),
    ("Bi", 1.48),
    ("Th", 2.06),
    ("U", 1.96),
];

/// Strip charge/oxidation-state decoration from a species label.
///
/// `"Zn2+"` → `"Zn"`, `"O2-"` → `"O"`, `"Fe"` → `"Fe"`.
pub fn element_symbol(species: &str) -> &str {
    let end = species
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(species.len(), |(i, _)| i);
    &species[..end]
}

/// Atomic mass of a species, amu. `None` for unknown symbols.
pub fn atomic_mass(species: &str) -> Option<f64> {
    let symbol = element_symbol(species);
    ATOMIC_MASSES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, m)| *m)
}

/// Covalent radius of a species, Å. `None` for unknown symbols.
pub fn covalent_radius(species: &str) -> Option<f64> {
    let symbol = element_symbol(species);
    COVALENT_RADII
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, r)| *r)
}

/// All symbols with a known covalent radius.
pub(crate) fn covalent_radius_table() -> impl Iterator<Item = (&'static str, f64)> {
    COVALENT_RADII.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_stripping() {
        assert_eq!(element_symbol("Zn2+"), "Zn");
        assert_eq!(element_symbol("O2-"), "O");
        assert_eq!(element_symbol("Fe"), "Fe");
        assert_eq!(element_symbol("H+"), "H");
    }

    #[test]
    fn test_mass_lookup() {
        assert_eq!(atomic_mass("C"), Some(12.011));
        assert_eq!(atomic_mass("Zn2+"), Some(65.38));
        assert_eq!(atomic_mass("Xq"), None);
    }

    #[test]
    fn test_radius_lookup() {
        assert_eq!(covalent_radius("O"), Some(0.66));
        assert_eq!(covalent_radius("O2-"), Some(0.66));
        assert_eq!(covalent_radius("Xq"), None);
    }
}
