//! Error types for descriptor computation.
//!
//! Errors are categorized by the pipeline stage that produced them:
//! configuration parsing, topology perception, the external toolkit, and
//! conformer aggregation.

use thiserror::Error;

/// Errors that can occur while computing descriptors for one molecule.
///
/// Every variant is fatal for that molecule only. The batch orchestrator
/// converts them into dropped rows; single-molecule callers see them directly.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a TOML configuration document.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of its valid range.
    #[error("invalid configuration value for '{key}': {detail}")]
    InvalidConfig {
        /// Configuration key.
        key: &'static str,
        /// Description of the problem.
        detail: String,
    },

    /// The external toolkit failed to embed the structure or generate conformers.
    #[error(transparent)]
    Toolkit(#[from] crate::toolkit::Error),

    /// The input structure contains no atoms.
    #[error("input structure is empty: at least one atom is required")]
    EmptySystem,

    /// Invalid bond definition in the input structure.
    #[error("invalid bond between atoms {i} and {j}: {detail}")]
    InvalidBond {
        /// First atom index.
        i: usize,
        /// Second atom index.
        j: usize,
        /// Description of the problem.
        detail: String,
    },

    /// Conformer generation produced no usable conformers.
    ///
    /// The mean globularity of an empty ensemble is undefined, so the
    /// molecule is rejected instead of emitting a meaningless record.
    #[error("conformer ensemble for '{0}' is empty")]
    EmptyEnsemble(String),

    /// A conformer's point count does not match the base topology.
    #[error("conformer {index} has {found} points but the topology has {expected} atoms")]
    ConformerMismatch {
        /// Zero-based conformer index.
        index: usize,
        /// Atom count of the base topology.
        expected: usize,
        /// Number of points in the conformer.
        found: usize,
    },

    /// The computation observed its cancellation token and stopped.
    #[error("computation cancelled")]
    Cancelled,
}

impl Error {
    /// Creates an [`InvalidBond`](Error::InvalidBond) error.
    pub fn invalid_bond(i: usize, j: usize, details: impl Into<String>) -> Self {
        Self::InvalidBond {
            i,
            j,
            detail: details.into(),
        }
    }

    /// Creates an [`InvalidConfig`](Error::InvalidConfig) error.
    pub fn invalid_config(key: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key,
            detail: details.into(),
        }
    }
}
