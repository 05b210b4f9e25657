use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use shape_forge::{BatchConfig, ShapeConfig};

use crate::cli::{BatchOptions, ConformerOptions};

/// Configuration read from `--config`, before command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    pub shape: ShapeConfig,
    pub batch: BatchConfig,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            shape: ShapeConfig::from_toml(source)?,
            batch: BatchConfig::from_toml(source)?,
        })
    }
}

pub fn build_shape_config(base: ShapeConfig, opts: &ConformerOptions) -> Result<ShapeConfig> {
    let mut config = base;
    if let Some(rmsd) = opts.rmsd_cutoff {
        config.conformers.rmsd_cutoff = rmsd;
    }
    if let Some(max) = opts.max_conformers {
        config.conformers.max_conformers = max;
    }
    if let Some(window) = opts.energy_window {
        config.conformers.energy_window = window;
    }
    if opts.include_amides {
        config.topology.include_amides = true;
    }

    config.validate().context("Invalid conformer search options")?;
    Ok(config)
}

pub fn build_batch_config(base: BatchConfig, opts: &BatchOptions) -> Result<BatchConfig> {
    let mut config = base;
    if let Some(column) = &opts.column {
        config.smiles_column = column.clone();
    }
    if let Some(timeout) = opts.timeout {
        config.timeout = timeout;
    }
    if let Some(jobs) = opts.jobs {
        config.workers = jobs;
    }

    config.validate().context("Invalid batch options")?;
    Ok(config)
}
