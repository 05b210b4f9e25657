pub mod aggregate;
pub mod amine;
pub mod config;
pub mod geometry;
pub mod perception;
pub mod rotor;

mod error;
mod pipeline;

pub use aggregate::EnsembleProperties;
pub use config::{ConformerSearch, ShapeConfig, TopologyOptions};
pub use error::Error;
pub use pipeline::compute;
