//! Configuration for descriptor computation.
//!
//! [`ShapeConfig`] groups the conformer-search bounds handed to the toolkit
//! and the topology options used by the rotatable-bond classifier. It can be
//! built in code or read from a TOML document:
//!
//! ```toml
//! [conformers]
//! rmsd_cutoff = 0.5
//! max_conformers = 100000
//! energy_window = 50.0
//!
//! [topology]
//! include_amides = false
//! ```
//!
//! Every key is optional and falls back to its default. Unknown tables (such
//! as `[batch]`) are ignored so one file can configure the whole tool.

use serde::Deserialize;

use super::error::Error;

/// Bounds for the external conformer search.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConformerSearch {
    /// RMSD below which two conformers are considered duplicates (Å).
    #[serde(default = "default_rmsd_cutoff")]
    pub rmsd_cutoff: f64,
    /// Upper bound on the number of conformers kept.
    #[serde(default = "default_max_conformers")]
    pub max_conformers: u32,
    /// Energy window above the lowest conformer (kcal/mol).
    #[serde(default = "default_energy_window")]
    pub energy_window: f64,
}

fn default_rmsd_cutoff() -> f64 {
    0.5
}
fn default_max_conformers() -> u32 {
    100_000
}
fn default_energy_window() -> f64 {
    50.0
}

impl Default for ConformerSearch {
    fn default() -> Self {
        Self {
            rmsd_cutoff: default_rmsd_cutoff(),
            max_conformers: default_max_conformers(),
            energy_window: default_energy_window(),
        }
    }
}

/// Options for the rotatable-bond classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TopologyOptions {
    /// Count single C–N amide bonds as rotatable.
    #[serde(default)]
    pub include_amides: bool,
}

/// Settings for computing one descriptor record.
///
/// # Examples
///
/// ```
/// use shape_forge::ShapeConfig;
///
/// let config = ShapeConfig::from_toml("[conformers]\nmax_conformers = 250\n")?;
/// assert_eq!(config.conformers.max_conformers, 250);
/// assert_eq!(config.conformers.rmsd_cutoff, 0.5);
/// assert!(!config.topology.include_amides);
/// # Ok::<(), shape_forge::ShapeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ShapeConfig {
    #[serde(default)]
    pub conformers: ConformerSearch,
    #[serde(default)]
    pub topology: TopologyOptions,
}

impl ShapeConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML and
    /// [`Error::InvalidConfig`] for out-of-range values.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        let config: ShapeConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every numeric bound is usable by the conformer search.
    pub fn validate(&self) -> Result<(), Error> {
        let c = &self.conformers;
        if !c.rmsd_cutoff.is_finite() || c.rmsd_cutoff < 0.0 {
            return Err(Error::invalid_config(
                "conformers.rmsd_cutoff",
                format!("must be a non-negative number, got {}", c.rmsd_cutoff),
            ));
        }
        if c.max_conformers == 0 {
            return Err(Error::invalid_config(
                "conformers.max_conformers",
                "must be at least 1",
            ));
        }
        if !c.energy_window.is_finite() || c.energy_window <= 0.0 {
            return Err(Error::invalid_config(
                "conformers.energy_window",
                format!("must be a positive number, got {}", c.energy_window),
            ));
        }
        Ok(())
    }
}
