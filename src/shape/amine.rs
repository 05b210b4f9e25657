//! Primary-amine detection.
//!
//! The pattern is the two-alternative SMARTS
//! `[$([N;H2;X3][CX4]),$([N;H3;X4+][CX4])]`: a neutral aliphatic nitrogen with
//! two hydrogens, or a protonated one with three, bonded to an sp³ carbon.
//! Only this fixed shape (a constrained atom bonded to a constrained
//! neighbor) is supported, which keeps matching a single pass over atoms.

use std::sync::LazyLock;

use super::perception::{PerceivedAtom, Topology};
use crate::model::types::Element;

/// Constraints on a single atom. `None` leaves a property unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomQuery {
    pub element: Element,
    pub aromatic: Option<bool>,
    pub hydrogens: Option<usize>,
    pub degree: Option<usize>,
    pub charge: Option<i8>,
}

impl AtomQuery {
    /// An aliphatic atom of the given element with no further constraints.
    pub const fn aliphatic(element: Element) -> Self {
        Self {
            element,
            aromatic: Some(false),
            hydrogens: None,
            degree: None,
            charge: None,
        }
    }

    pub const fn hydrogens(mut self, count: usize) -> Self {
        self.hydrogens = Some(count);
        self
    }

    pub const fn degree(mut self, count: usize) -> Self {
        self.degree = Some(count);
        self
    }

    pub const fn charge(mut self, charge: i8) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn matches(&self, atom: &PerceivedAtom) -> bool {
        atom.element == self.element
            && self.aromatic.is_none_or(|a| a == atom.aromatic)
            && self.hydrogens.is_none_or(|h| h == atom.hydrogen_count)
            && self.degree.is_none_or(|x| x == atom.degree())
            && self.charge.is_none_or(|q| q == atom.formal_charge)
    }
}

/// An anchor atom bonded to at least one atom satisfying `neighbor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondedPair {
    pub anchor: AtomQuery,
    pub neighbor: AtomQuery,
}

/// A named set of alternatives; the pattern matches if any alternative does.
#[derive(Debug, Clone)]
pub struct SubstructurePattern {
    smarts: &'static str,
    alternatives: Vec<BondedPair>,
}

impl SubstructurePattern {
    pub fn new(smarts: &'static str, alternatives: Vec<BondedPair>) -> Self {
        Self {
            smarts,
            alternatives,
        }
    }

    /// The SMARTS text this pattern was compiled from.
    pub fn smarts(&self) -> &'static str {
        self.smarts
    }

    /// Indices of every anchor atom matched by the pattern.
    pub fn anchors(&self, topology: &Topology) -> Vec<usize> {
        topology
            .atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| {
                self.alternatives.iter().any(|alt| {
                    alt.anchor.matches(atom)
                        && atom
                            .neighbors
                            .iter()
                            .any(|&n| alt.neighbor.matches(&topology.atoms[n]))
                })
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn matches(&self, topology: &Topology) -> bool {
        !self.anchors(topology).is_empty()
    }
}

/// The primary-amine pattern, compiled on first use and shared read-only.
pub static PRIMARY_AMINE: LazyLock<SubstructurePattern> = LazyLock::new(|| {
    let sp3_carbon = AtomQuery::aliphatic(Element::C).degree(4);
    SubstructurePattern::new(
        "[$([N;H2;X3][CX4]),$([N;H3;X4+][CX4])]",
        vec![
            BondedPair {
                anchor: AtomQuery::aliphatic(Element::N).hydrogens(2).degree(3),
                neighbor: sp3_carbon,
            },
            BondedPair {
                anchor: AtomQuery::aliphatic(Element::N)
                    .hydrogens(3)
                    .degree(4)
                    .charge(1),
                neighbor: sp3_carbon,
            },
        ],
    )
});

/// `true` if the molecule carries a primary amine on an sp³ carbon.
pub fn has_primary_amine(topology: &Topology) -> bool {
    PRIMARY_AMINE.matches(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::system::{Bond, System};
    use crate::model::types::BondOrder;
    use crate::shape::perception::tests::{add_hydrogens, butane};

    /// CH3-NHx with the given hydrogens on N and formal charge.
    fn methylamine(n_hydrogens: usize, charge: i8) -> System {
        let mut sys = System::new();
        sys.atoms.push(Atom::new(Element::C, [0.0; 3]));
        sys.atoms
            .push(Atom::new(Element::N, [1.47, 0.0, 0.0]).with_charge(charge));
        sys.bonds.push(Bond::new(0, 1, BondOrder::Single));
        add_hydrogens(&mut sys, 0, 3);
        add_hydrogens(&mut sys, 1, n_hydrogens);
        sys
    }

    fn perceive(sys: &System) -> Topology {
        Topology::perceive(sys).unwrap()
    }

    #[test]
    fn neutral_primary_amine_matches() {
        let topo = perceive(&methylamine(2, 0));
        assert!(has_primary_amine(&topo));
        assert_eq!(PRIMARY_AMINE.anchors(&topo), vec![1]);
    }

    #[test]
    fn protonated_primary_amine_matches() {
        assert!(has_primary_amine(&perceive(&methylamine(3, 1))));
    }

    #[test]
    fn protonated_form_requires_positive_charge() {
        assert!(!has_primary_amine(&perceive(&methylamine(3, 0))));
    }

    #[test]
    fn secondary_amine_does_not_match() {
        // CH3-NH-CH3
        let mut sys = System::new();
        sys.atoms.push(Atom::new(Element::C, [0.0; 3]));
        sys.atoms.push(Atom::new(Element::N, [1.4, 0.0, 0.0]));
        sys.atoms.push(Atom::new(Element::C, [2.8, 0.0, 0.0]));
        sys.bonds.push(Bond::new(0, 1, BondOrder::Single));
        sys.bonds.push(Bond::new(1, 2, BondOrder::Single));
        add_hydrogens(&mut sys, 0, 3);
        add_hydrogens(&mut sys, 1, 1);
        add_hydrogens(&mut sys, 2, 3);
        assert!(!has_primary_amine(&perceive(&sys)));
    }

    #[test]
    fn aniline_nitrogen_does_not_match() {
        // NH2 on an aromatic carbon: the carbon has degree 3, not 4.
        let mut sys = System::new();
        for k in 0..6 {
            let angle = k as f64 * std::f64::consts::FRAC_PI_3;
            sys.atoms.push(Atom::new(Element::C, [angle.cos(), angle.sin(), 0.0]));
        }
        for k in 0..6 {
            sys.bonds.push(Bond::new(k, (k + 1) % 6, BondOrder::Aromatic));
        }
        sys.atoms.push(Atom::new(Element::N, [2.0, 0.0, 0.0]));
        sys.bonds.push(Bond::new(0, 6, BondOrder::Single));
        add_hydrogens(&mut sys, 6, 2);
        for k in 1..6 {
            add_hydrogens(&mut sys, k, 1);
        }
        assert!(!has_primary_amine(&perceive(&sys)));
    }

    #[test]
    fn molecule_without_nitrogen_does_not_match() {
        assert!(!has_primary_amine(&perceive(&butane())));
    }

    #[test]
    fn pattern_keeps_its_smarts() {
        assert_eq!(
            PRIMARY_AMINE.smarts(),
            "[$([N;H2;X3][CX4]),$([N;H3;X4+][CX4])]"
        );
    }
}
