//! Core types for the crystal graph kernel.

pub mod edge;
pub mod fragment;
pub mod graph;
pub mod lattice;
pub mod site;

pub(crate) use edge::negate;
pub use edge::{Image, PeriodicEdge};
pub use fragment::{FragmentBond, MolecularFragment};
pub use graph::{InvalidGraphError, PeriodicGraph};
pub use lattice::{Lattice, LatticeError};
pub use site::Site;
