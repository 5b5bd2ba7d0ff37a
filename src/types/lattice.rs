//! Lattice basis and coordinate transforms.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a lattice basis is unusable.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// Basis matrix has zero or near-zero cell volume.
    #[error("lattice basis is singular (volume {volume:.3e})")]
    Singular {
        /// Signed volume of the rejected basis.
        volume: f64,
    },
    /// Cell angles do not describe a valid parallelepiped.
    #[error("invalid cell angles ({alpha}, {beta}, {gamma}) degrees")]
    InvalidAngles {
        /// Angle between the b and c vectors.
        alpha: f64,
        /// Angle between the a and c vectors.
        beta: f64,
        /// Angle between the a and b vectors.
        gamma: f64,
    },
}

/// Periodic repeat vectors of a crystal, stored as the columns of a 3×3
/// basis matrix. Immutable once constructed; the inverse is precomputed so
/// fractional/Cartesian conversion is a single matrix-vector product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    basis: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Lattice {
    /// Build a lattice from a basis matrix (basis vectors as columns).
    pub fn new(basis: Matrix3<f64>) -> Result<Self, LatticeError> {
        let volume = basis.determinant();
        let inverse = basis
            .try_inverse()
            .filter(|_| volume.abs() > 1e-9)
            .ok_or(LatticeError::Singular { volume })?;
        Ok(Self { basis, inverse })
    }

    /// Build from cell parameters: lengths in Å, angles in degrees.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, LatticeError> {
        let (ar, br, gr) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
        let term = 1.0 - ar.cos().powi(2) - br.cos().powi(2) - gr.cos().powi(2)
            + 2.0 * ar.cos() * br.cos() * gr.cos();
        if term <= 0.0 {
            return Err(LatticeError::InvalidAngles { alpha, beta, gamma });
        }

        let a_vec = Vector3::new(a, 0.0, 0.0);
        let b_vec = Vector3::new(b * gr.cos(), b * gr.sin(), 0.0);
        let c_vec = Vector3::new(
            c * br.cos(),
            c * (ar.cos() - br.cos() * gr.cos()) / gr.sin(),
            c * term.sqrt() / gr.sin(),
        );
        Self::new(Matrix3::from_columns(&[a_vec, b_vec, c_vec]))
    }

    /// Cubic cell with edge length `a`.
    pub fn cubic(a: f64) -> Result<Self, LatticeError> {
        Self::new(Matrix3::from_diagonal(&Vector3::new(a, a, a)))
    }

    /// Tetragonal cell with basal edge `a` and height `c`.
    pub fn tetragonal(a: f64, c: f64) -> Result<Self, LatticeError> {
        Self::new(Matrix3::from_diagonal(&Vector3::new(a, a, c)))
    }

    /// The basis matrix (basis vectors as columns).
    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    /// Convert fractional coordinates to Cartesian.
    pub fn to_cartesian(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.basis * frac
    }

    /// Convert Cartesian coordinates to fractional.
    pub fn to_fractional(&self, cart: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * cart
    }

    /// Cell volume, Å³.
    pub fn volume(&self) -> f64 {
        self.basis.determinant().abs()
    }

    /// Distance between opposite cell faces along each lattice axis.
    ///
    /// Used to decide how many periodic images a distance search must
    /// visit to cover a given radius.
    pub fn perpendicular_widths(&self) -> [f64; 3] {
        let a = self.basis.column(0).into_owned();
        let b = self.basis.column(1).into_owned();
        let c = self.basis.column(2).into_owned();
        let volume = self.volume();
        [
            volume / b.cross(&c).norm(),
            volume / c.cross(&a).norm(),
            volume / a.cross(&b).norm(),
        ]
    }
}
