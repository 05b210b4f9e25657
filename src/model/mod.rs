//! Core data structures flowing through `shape-forge`.
//!
//! - [`atom`] – Atom with element, Cartesian coordinates and formal charge.
//! - [`types`] – Elements, bond orders and hybridization states.
//! - [`system`] – A molecule: atoms plus bond topology.
//! - [`descriptor`] – The per-molecule descriptor record produced by the pipeline.
//!
//! A [`System`] carries one geometry; conformer ensembles reuse its bond list
//! and supply additional point clouds in the same atom order.
//!
//! [`System`]: system::System

pub mod atom;
pub mod descriptor;
pub mod system;
pub mod types;
