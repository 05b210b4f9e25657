//! Conformer averaging.
//!
//! Geometric descriptors are computed per conformer and averaged; the
//! topological ones (rotatable bonds, primary amine) depend only on the base
//! topology and are computed once.

use log::debug;

use super::amine::has_primary_amine;
use super::error::Error;
use super::geometry::{globularity, plane_deviation};
use super::perception::Topology;
use super::rotor::rotatable_bond_count;
use crate::cancel::CancelToken;
use crate::toolkit::Ensemble;

/// Descriptors of one molecule averaged over its conformer ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleProperties {
    pub rotatable_bonds: u32,
    pub primary_amine: bool,
    /// Arithmetic mean of per-conformer globularity.
    pub globularity: f64,
    /// Arithmetic mean of per-conformer best-fit-plane deviation.
    pub pbf: f64,
    pub conformer_count: usize,
}

/// Averages shape descriptors over `ensemble`.
///
/// `label` names the molecule in error messages. The cancellation token is
/// checked before each conformer.
///
/// # Errors
///
/// - [`Error::EmptyEnsemble`] if the ensemble has no conformers
/// - [`Error::ConformerMismatch`] if a conformer's length differs from the
///   topology's atom count
/// - [`Error::Cancelled`] if `cancel` is signalled mid-way
/// - perception errors for a malformed base topology
pub fn average_properties(
    label: &str,
    ensemble: &Ensemble,
    include_amides: bool,
    cancel: &CancelToken,
) -> Result<EnsembleProperties, Error> {
    if ensemble.is_empty() {
        return Err(Error::EmptyEnsemble(label.to_string()));
    }

    let topology = Topology::perceive(&ensemble.topology)?;
    let expected = topology.atom_count();

    let mut glob_sum = 0.0;
    let mut pbf_sum = 0.0;
    for (index, points) in ensemble.conformers.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if points.len() != expected {
            return Err(Error::ConformerMismatch {
                index,
                expected,
                found: points.len(),
            });
        }
        glob_sum += globularity(points);
        pbf_sum += plane_deviation(points);
    }

    let n = ensemble.len() as f64;
    let properties = EnsembleProperties {
        rotatable_bonds: rotatable_bond_count(&topology, include_amides),
        primary_amine: has_primary_amine(&topology),
        globularity: glob_sum / n,
        pbf: pbf_sum / n,
        conformer_count: ensemble.len(),
    };

    debug!(
        "{}: {} conformers, glob = {:.4}, pbf = {:.4}, rb = {}",
        label, properties.conformer_count, properties.globularity, properties.pbf, properties.rotatable_bonds
    );

    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::system::{Bond, System};
    use crate::model::types::{BondOrder, Element};
    use crate::shape::perception::tests::butane;

    /// Methane with a regular-tetrahedron hydrogen shell around the carbon.
    fn methane() -> (System, Vec<[f64; 3]>) {
        let s = 0.63;
        let points = vec![
            [0.0, 0.0, 0.0],
            [s, s, s],
            [s, -s, -s],
            [-s, s, -s],
            [-s, -s, s],
        ];
        let mut sys = System::new();
        sys.atoms.push(Atom::new(Element::C, points[0]));
        for p in &points[1..] {
            sys.atoms.push(Atom::new(Element::H, *p));
        }
        for h in 1..5 {
            sys.bonds.push(Bond::new(0, h, BondOrder::Single));
        }
        (sys, points)
    }

    #[test]
    fn single_tetrahedral_conformer_is_spherical() {
        let (sys, points) = methane();
        let ensemble = Ensemble::new(sys, vec![points]);
        let props = average_properties("C", &ensemble, false, &CancelToken::new()).unwrap();
        assert!((props.globularity - 1.0).abs() < 1e-9, "glob = {}", props.globularity);
        assert_eq!(props.rotatable_bonds, 0);
        assert!(!props.primary_amine);
        assert_eq!(props.conformer_count, 1);
    }

    #[test]
    fn averages_over_conformers() {
        let sys = butane();
        let n = sys.atom_count();
        let flat: Vec<[f64; 3]> = (0..n).map(|k| [k as f64, (k % 3) as f64, 0.0]).collect();
        let line: Vec<[f64; 3]> = (0..n).map(|k| [k as f64, 0.0, 0.0]).collect();
        let bumpy: Vec<[f64; 3]> = (0..n)
            .map(|k| [k as f64, (k % 3) as f64, (k % 2) as f64])
            .collect();

        let expected_glob = (globularity(&flat) + globularity(&line) + globularity(&bumpy)) / 3.0;
        let expected_pbf = (plane_deviation(&flat) + plane_deviation(&line) + plane_deviation(&bumpy)) / 3.0;

        let ensemble = Ensemble::new(sys, vec![flat, line, bumpy]);
        let props = average_properties("CCCC", &ensemble, false, &CancelToken::new()).unwrap();

        assert!((props.globularity - expected_glob).abs() < 1e-12);
        assert!((props.pbf - expected_pbf).abs() < 1e-12);
        assert!(props.pbf > 0.0);
        assert_eq!(props.rotatable_bonds, 1);
        assert_eq!(props.conformer_count, 3);
    }

    #[test]
    fn empty_ensemble_is_an_error() {
        let ensemble = Ensemble::new(butane(), Vec::new());
        let err = average_properties("CCCC", &ensemble, false, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyEnsemble(ref s) if s == "CCCC"));
    }

    #[test]
    fn conformer_length_must_match_topology() {
        let sys = butane();
        let good = sys.positions();
        let short = good[..3].to_vec();
        let ensemble = Ensemble::new(sys, vec![good, short]);

        let err = average_properties("CCCC", &ensemble, false, &CancelToken::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::ConformerMismatch {
                index: 1,
                expected: 14,
                found: 3
            }
        ));
    }

    #[test]
    fn cancelled_token_stops_aggregation() {
        let (sys, points) = methane();
        let ensemble = Ensemble::new(sys, vec![points; 4]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = average_properties("C", &ensemble, false, &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
