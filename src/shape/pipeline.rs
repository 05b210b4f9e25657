//! Single-molecule pipeline: SMILES in, descriptor record out.

use log::debug;

use super::aggregate::average_properties;
use super::config::ShapeConfig;
use super::error::Error;
use crate::cancel::CancelToken;
use crate::model::descriptor::DescriptorRecord;
use crate::toolkit::Toolkit;

/// Computes the conformer-averaged descriptors of one molecule.
///
/// The toolkit embeds the SMILES in 3D and searches conformers within the
/// bounds of `config.conformers`; the ensemble is then averaged. Formula and
/// molecular weight come from the embedded structure, which carries explicit
/// hydrogens.
///
/// # Errors
///
/// Any toolkit failure, an empty ensemble, a malformed ensemble, or
/// cancellation. Each is fatal for this molecule only.
///
/// # Examples
///
/// ```no_run
/// use shape_forge::{CancelToken, OpenBabel, ShapeConfig, compute};
///
/// let record = compute("CCCCN", &OpenBabel::default(), &ShapeConfig::default(), &CancelToken::new())?;
/// assert_eq!(record.primary_amine, 1);
/// # Ok::<(), shape_forge::ShapeError>(())
/// ```
pub fn compute(
    smiles: &str,
    toolkit: &dyn Toolkit,
    config: &ShapeConfig,
    cancel: &CancelToken,
) -> Result<DescriptorRecord, Error> {
    let structure = toolkit.embed(smiles, cancel)?;
    debug!(
        "{}: embedded {} atoms with {}",
        smiles,
        structure.atom_count(),
        toolkit.name()
    );

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let ensemble = toolkit.generate_ensemble(&structure, &config.conformers, cancel)?;
    let props = average_properties(smiles, &ensemble, config.topology.include_amides, cancel)?;

    Ok(DescriptorRecord {
        source: smiles.to_string(),
        formula: structure.formula(),
        molecular_weight: structure.molecular_weight(),
        rotatable_bonds: props.rotatable_bonds,
        globularity: props.globularity,
        pbf: props.pbf,
        primary_amine: u8::from(props.primary_amine),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::mock::MockToolkit;

    fn run(smiles: &str) -> Result<DescriptorRecord, Error> {
        compute(smiles, &MockToolkit, &ShapeConfig::default(), &CancelToken::new())
    }

    #[test]
    fn computes_record_for_methane() {
        let record = run("C").unwrap();
        assert_eq!(record.source, "C");
        assert_eq!(record.formula, "CH4");
        assert!((record.molecular_weight - (12.011 + 4.0 * 1.008)).abs() < 1e-9);
        assert_eq!(record.rotatable_bonds, 0);
        assert!((record.globularity - 1.0).abs() < 1e-9);
        assert_eq!(record.primary_amine, 0);
    }

    #[test]
    fn flags_primary_amine() {
        let record = run("CN").unwrap();
        assert_eq!(record.formula, "CH5N");
        assert!(record.has_primary_amine());
    }

    #[test]
    fn embed_failure_propagates_as_toolkit_error() {
        let err = run("fail").unwrap_err();
        assert!(matches!(
            err,
            Error::Toolkit(crate::toolkit::Error::Embed { .. })
        ));
    }

    #[test]
    fn empty_ensemble_is_fatal() {
        assert!(matches!(run("empty"), Err(Error::EmptyEnsemble(_))));
    }

    #[test]
    fn cancelled_before_start_is_reported() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = compute("C", &MockToolkit, &ShapeConfig::default(), &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
