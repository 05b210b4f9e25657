//! Boundary with the external molecular-modeling toolkit.
//!
//! SMILES parsing, 3D embedding and force-field conformer search are not
//! implemented here. They are reached through the [`Toolkit`] trait, which the
//! pipeline and the batch orchestrator hold as a shared `dyn` object. The
//! shipped implementation, [`OpenBabel`], drives the `obabel` executable.

mod error;
mod obabel;

#[cfg(test)]
pub(crate) mod mock;

pub use error::Error;
pub use obabel::OpenBabel;

use crate::cancel::CancelToken;
use crate::model::system::System;
use crate::shape::config::ConformerSearch;

/// A base topology plus conformer coordinates that share its atom order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ensemble {
    pub topology: System,
    pub conformers: Vec<Vec<[f64; 3]>>,
}

impl Ensemble {
    pub fn new(topology: System, conformers: Vec<Vec<[f64; 3]>>) -> Self {
        Self {
            topology,
            conformers,
        }
    }

    /// Builds an ensemble from full structures, taking only their coordinates.
    pub fn from_structures(topology: System, structures: &[System]) -> Self {
        let conformers = structures.iter().map(System::positions).collect();
        Self::new(topology, conformers)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.conformers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conformers.is_empty()
    }
}

/// External collaborator that turns SMILES into 3D conformer ensembles.
///
/// Implementations must be shareable across worker threads. Both calls
/// receive the caller's [`CancelToken`] and should stop early, returning
/// [`Error::Cancelled`], once it is signalled.
pub trait Toolkit: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Parses a SMILES string and returns one 3D structure with explicit hydrogens.
    fn embed(&self, smiles: &str, cancel: &CancelToken) -> Result<System, Error>;

    /// Searches conformers of an embedded structure within the given bounds.
    fn generate_ensemble(
        &self,
        structure: &System,
        search: &ConformerSearch,
        cancel: &CancelToken,
    ) -> Result<Ensemble, Error>;
}
