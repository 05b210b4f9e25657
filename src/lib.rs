//! Conformer-averaged shape and topology descriptors for small molecules.
//!
//! For each molecule, given as a SMILES string, an external modeling toolkit
//! embeds a 3D structure and searches its conformers. This crate then
//! computes four descriptors and averages the geometric ones over the
//! ensemble:
//!
//! - **Globularity**: ratio of the smallest to the largest principal-axis
//!   variance of the coordinates (1 = spherical, 0 = flat or linear,
//!   −1 = degenerate geometry)
//! - **PBF**: mean distance of the atoms to their best-fit plane
//! - **Rotatable bonds**: count of non-ring, non-terminal single (and
//!   triple) bonds, excluding amides by default
//! - **Primary amine**: whether an NH₂ (or NH₃⁺) sits on an sp³ carbon
//!
//! plus the Hill formula and molecular weight. Many molecules can be
//! processed concurrently from a table with per-row timeouts and failure
//! isolation.
//!
//! # Quick Start
//!
//! The geometric descriptors work on any point cloud:
//!
//! ```
//! use shape_forge::geometry::{globularity, plane_deviation};
//!
//! let s = 0.5;
//! let tetrahedron = [[s, s, s], [s, -s, -s], [-s, s, -s], [-s, -s, s]];
//! assert!((globularity(&tetrahedron) - 1.0).abs() < 1e-9);
//!
//! let square = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
//! assert!(plane_deviation(&square) < 1e-12);
//! ```
//!
//! Topological descriptors work on a [`System`] with explicit hydrogens:
//!
//! ```
//! use shape_forge::{Atom, Bond, BondOrder, Element, System, Topology};
//! use shape_forge::rotor::rotatable_bond_count;
//!
//! // n-butane carbon chain with hydrogens
//! let mut system = System::new();
//! for k in 0..4 {
//!     system.atoms.push(Atom::new(Element::C, [1.5 * k as f64, 0.0, 0.0]));
//! }
//! for k in 0..3 {
//!     system.bonds.push(Bond::new(k, k + 1, BondOrder::Single));
//! }
//! for (carbon, count) in [(0, 3), (1, 2), (2, 2), (3, 3)] {
//!     for _ in 0..count {
//!         let h = system.atoms.len();
//!         system.atoms.push(Atom::new(Element::H, [0.0; 3]));
//!         system.bonds.push(Bond::new(carbon, h, BondOrder::Single));
//!     }
//! }
//!
//! let topology = Topology::perceive(&system)?;
//! assert_eq!(rotatable_bond_count(&topology, false), 1);
//! assert_eq!(system.formula(), "C4H10");
//! # Ok::<(), shape_forge::ShapeError>(())
//! ```
//!
//! Full records come from [`compute`] with a [`Toolkit`], usually
//! [`OpenBabel`], and whole tables from [`run_batch`].
//!
//! # Module Organization
//!
//! - [`geometry`]: globularity and best-fit-plane deviation
//! - [`perception`], [`rotor`], [`amine`]: topology descriptors
//! - [`aggregate`]: conformer averaging
//! - [`toolkit`]: the external toolkit boundary and the Open Babel driver
//! - [`batch`]: the concurrent table processor
//! - [`io`]: SDF and delimited-table I/O

mod cancel;
mod model;
mod shape;

pub mod batch;
pub mod io;
pub mod toolkit;

pub use shape::{aggregate, amine, geometry, perception, rotor};

pub use cancel::CancelToken;
pub use model::atom::Atom;
pub use model::descriptor::DescriptorRecord;
pub use model::system::{Bond, System};
pub use model::types::{BondOrder, Element, Hybridization, ParseElementError};

pub use shape::{ConformerSearch, EnsembleProperties, ShapeConfig, TopologyOptions, compute};
pub use shape::perception::{BondView, Topology};

pub use shape::Error as ShapeError;

pub use batch::{BatchConfig, BatchEvent, BatchSummary, RowState, run_batch};
pub use toolkit::{Ensemble, OpenBabel, Toolkit};
