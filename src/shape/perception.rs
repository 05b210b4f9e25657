//! Topology perception for the rotatable-bond classifier.
//!
//! Derives, once per molecule, the conformer-invariant attributes the
//! classifier and the substructure matcher consume: neighbor lists,
//! heavy-atom valence, attached hydrogen counts, hybridization, ring
//! membership and the amide flag. Geometry is never consulted, so every
//! conformer of a molecule shares one [`Topology`].

use std::collections::VecDeque;

use super::error::Error;
use crate::model::system::System;
use crate::model::types::{BondOrder, Element, Hybridization};

/// Atom with its perceived graph environment.
#[derive(Debug, Clone)]
pub struct PerceivedAtom {
    /// Chemical element.
    pub element: Element,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Indices of bonded neighbor atoms.
    pub neighbors: Vec<usize>,
    /// Number of non-hydrogen neighbors.
    pub heavy_valence: usize,
    /// Number of hydrogen neighbors.
    pub hydrogen_count: usize,
    /// Perceived hybridization state.
    pub hybridization: Hybridization,
    /// `true` if any incident bond is aromatic.
    pub aromatic: bool,
}

impl PerceivedAtom {
    /// Total number of explicit neighbors (the SMARTS `X` primitive).
    #[inline]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// A bond together with the attributes the rotor predicate needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondView {
    /// Begin atom index.
    pub i: usize,
    /// End atom index.
    pub j: usize,
    /// Bond order.
    pub order: BondOrder,
    /// Single C–N bond whose carbon carries a C=O double bond.
    pub is_amide: bool,
    /// The bond lies on at least one ring.
    pub in_ring: bool,
    /// Heavy-atom valence of the begin atom.
    pub begin_heavy_valence: usize,
    /// Heavy-atom valence of the end atom.
    pub end_heavy_valence: usize,
    /// Hybridization of the begin atom.
    pub begin_hybridization: Hybridization,
    /// Hybridization of the end atom.
    pub end_hybridization: Hybridization,
}

/// Perceived topology of one molecule.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Atoms in input order.
    pub atoms: Vec<PerceivedAtom>,
    /// Bonds in input order.
    pub bonds: Vec<BondView>,
}

impl Topology {
    /// Perceives the topology of a molecular [`System`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySystem`] if the system has no atoms, or
    /// [`Error::InvalidBond`] if a bond references out-of-bounds indices or
    /// joins an atom to itself.
    pub fn perceive(system: &System) -> Result<Self, Error> {
        if system.atoms.is_empty() {
            return Err(Error::EmptySystem);
        }

        let n_atoms = system.atoms.len();
        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n_atoms];

        for (b, bond) in system.bonds.iter().enumerate() {
            if bond.i >= n_atoms || bond.j >= n_atoms {
                return Err(Error::invalid_bond(
                    bond.i,
                    bond.j,
                    format!("atom index out of bounds (n_atoms = {})", n_atoms),
                ));
            }
            if bond.i == bond.j {
                return Err(Error::invalid_bond(bond.i, bond.j, "atom bonded to itself"));
            }
            adjacency[bond.i].push((bond.j, b));
            adjacency[bond.j].push((bond.i, b));
        }

        let atoms: Vec<PerceivedAtom> = system
            .atoms
            .iter()
            .enumerate()
            .map(|(idx, atom)| {
                let neighbors: Vec<usize> = adjacency[idx].iter().map(|(n, _)| *n).collect();
                let hydrogen_count = neighbors
                    .iter()
                    .filter(|&&n| !system.atoms[n].element.is_heavy())
                    .count();
                let orders: Vec<BondOrder> = adjacency[idx]
                    .iter()
                    .map(|(_, b)| system.bonds[*b].order)
                    .collect();

                PerceivedAtom {
                    element: atom.element,
                    formal_charge: atom.formal_charge,
                    heavy_valence: neighbors.len() - hydrogen_count,
                    hydrogen_count,
                    hybridization: perceive_hybridization(atom.element, &orders),
                    aromatic: orders.contains(&BondOrder::Aromatic),
                    neighbors,
                }
            })
            .collect();

        let bonds = system
            .bonds
            .iter()
            .enumerate()
            .map(|(b, bond)| BondView {
                i: bond.i,
                j: bond.j,
                order: bond.order,
                is_amide: is_amide(system, &adjacency, b),
                in_ring: bond_in_ring(&adjacency, b, bond.i, bond.j),
                begin_heavy_valence: atoms[bond.i].heavy_valence,
                end_heavy_valence: atoms[bond.j].heavy_valence,
                begin_hybridization: atoms[bond.i].hybridization,
                end_hybridization: atoms[bond.j].hybridization,
            })
            .collect();

        Ok(Self { atoms, bonds })
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

/// Hybridization from the orders of the incident bonds.
///
/// A triple bond or two cumulated double bonds make an atom linear (sp); any
/// double or aromatic bond makes it trigonal (sp²); every other bonded heavy
/// atom is tetrahedral (sp³). Hydrogens and isolated atoms stay unassigned.
fn perceive_hybridization(element: Element, orders: &[BondOrder]) -> Hybridization {
    if !element.is_heavy() || orders.is_empty() {
        return Hybridization::Unknown;
    }

    let doubles = orders.iter().filter(|o| **o == BondOrder::Double).count();
    if orders.contains(&BondOrder::Triple) || doubles >= 2 {
        Hybridization::Sp
    } else if doubles == 1 || orders.contains(&BondOrder::Aromatic) {
        Hybridization::Sp2
    } else {
        Hybridization::Sp3
    }
}

/// A single C–N bond whose carbon also carries a C=O double bond.
fn is_amide(system: &System, adjacency: &[Vec<(usize, usize)>], b: usize) -> bool {
    let bond = &system.bonds[b];
    if bond.order != BondOrder::Single {
        return false;
    }

    let (ei, ej) = (system.atoms[bond.i].element, system.atoms[bond.j].element);
    let carbon = match (ei, ej) {
        (Element::C, Element::N) => bond.i,
        (Element::N, Element::C) => bond.j,
        _ => return false,
    };

    adjacency[carbon].iter().any(|(n, other)| {
        system.bonds[*other].order == BondOrder::Double && system.atoms[*n].element == Element::O
    })
}

/// A bond lies on a ring iff its ends stay connected once it is removed.
fn bond_in_ring(adjacency: &[Vec<(usize, usize)>], b: usize, start: usize, goal: usize) -> bool {
    let mut seen = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;

    while let Some(atom) = queue.pop_front() {
        for &(next, via) in &adjacency[atom] {
            if via == b || seen[next] {
                continue;
            }
            if next == goal {
                return true;
            }
            seen[next] = true;
            queue.push_back(next);
        }
    }

    false
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::system::Bond;

    /// Appends `count` hydrogens bonded to `parent`.
    pub(crate) fn add_hydrogens(sys: &mut System, parent: usize, count: usize) {
        for _ in 0..count {
            let h = sys.atoms.len();
            sys.atoms.push(Atom::new(Element::H, [0.0; 3]));
            sys.bonds.push(Bond::new(parent, h, BondOrder::Single));
        }
    }

    /// n-Butane with explicit hydrogens: C0-C1-C2-C3.
    pub(crate) fn butane() -> System {
        let mut sys = System::new();
        for k in 0..4 {
            sys.atoms.push(Atom::new(Element::C, [k as f64 * 1.5, 0.0, 0.0]));
        }
        sys.bonds.push(Bond::new(0, 1, BondOrder::Single));
        sys.bonds.push(Bond::new(1, 2, BondOrder::Single));
        sys.bonds.push(Bond::new(2, 3, BondOrder::Single));
        add_hydrogens(&mut sys, 0, 3);
        add_hydrogens(&mut sys, 1, 2);
        add_hydrogens(&mut sys, 2, 2);
        add_hydrogens(&mut sys, 3, 3);
        sys
    }

    /// Cyclohexane carbons with explicit hydrogens.
    pub(crate) fn cyclohexane() -> System {
        let mut sys = System::new();
        for k in 0..6 {
            let angle = k as f64 * std::f64::consts::FRAC_PI_3;
            sys.atoms.push(Atom::new(Element::C, [angle.cos(), angle.sin(), 0.0]));
        }
        for k in 0..6 {
            sys.bonds.push(Bond::new(k, (k + 1) % 6, BondOrder::Single));
        }
        for k in 0..6 {
            add_hydrogens(&mut sys, k, 2);
        }
        sys
    }

    /// N-methylacetamide: C0(H3)-C1(=O2)-N3(H)-C4(H3).
    pub(crate) fn n_methylacetamide() -> System {
        let mut sys = System::new();
        sys.atoms.push(Atom::new(Element::C, [0.0; 3]));
        sys.atoms.push(Atom::new(Element::C, [1.5, 0.0, 0.0]));
        sys.atoms.push(Atom::new(Element::O, [2.0, 1.0, 0.0]));
        sys.atoms.push(Atom::new(Element::N, [2.3, -1.0, 0.0]));
        sys.atoms.push(Atom::new(Element::C, [3.7, -1.0, 0.0]));
        sys.bonds.push(Bond::new(0, 1, BondOrder::Single));
        sys.bonds.push(Bond::new(1, 2, BondOrder::Double));
        sys.bonds.push(Bond::new(1, 3, BondOrder::Single));
        sys.bonds.push(Bond::new(3, 4, BondOrder::Single));
        add_hydrogens(&mut sys, 0, 3);
        add_hydrogens(&mut sys, 3, 1);
        add_hydrogens(&mut sys, 4, 3);
        sys
    }

    #[test]
    fn perceives_valences_and_hydrogens() {
        let topo = Topology::perceive(&butane()).unwrap();
        assert_eq!(topo.atom_count(), 14);
        assert_eq!(topo.atoms[0].heavy_valence, 1);
        assert_eq!(topo.atoms[0].hydrogen_count, 3);
        assert_eq!(topo.atoms[1].heavy_valence, 2);
        assert_eq!(topo.atoms[1].degree(), 4);
        assert_eq!(topo.atoms[4].heavy_valence, 1);
        assert_eq!(topo.atoms[4].hydrogen_count, 0);
    }

    #[test]
    fn perceives_hybridization_from_bond_orders() {
        assert_eq!(
            perceive_hybridization(Element::C, &[BondOrder::Single; 4]),
            Hybridization::Sp3
        );
        assert_eq!(
            perceive_hybridization(Element::C, &[BondOrder::Double, BondOrder::Single]),
            Hybridization::Sp2
        );
        assert_eq!(
            perceive_hybridization(Element::C, &[BondOrder::Aromatic, BondOrder::Aromatic]),
            Hybridization::Sp2
        );
        assert_eq!(
            perceive_hybridization(Element::C, &[BondOrder::Triple, BondOrder::Single]),
            Hybridization::Sp
        );
        assert_eq!(
            perceive_hybridization(Element::C, &[BondOrder::Double, BondOrder::Double]),
            Hybridization::Sp
        );
        assert_eq!(
            perceive_hybridization(Element::H, &[BondOrder::Single]),
            Hybridization::Unknown
        );
        assert_eq!(perceive_hybridization(Element::Cl, &[]), Hybridization::Unknown);
    }

    #[test]
    fn chain_bonds_are_not_in_ring() {
        let topo = Topology::perceive(&butane()).unwrap();
        assert!(topo.bonds.iter().all(|b| !b.in_ring));
    }

    #[test]
    fn ring_bonds_are_detected() {
        let topo = Topology::perceive(&cyclohexane()).unwrap();
        let ring: Vec<bool> = topo.bonds.iter().map(|b| b.in_ring).collect();
        assert!(ring[..6].iter().all(|r| *r));
        assert!(ring[6..].iter().all(|r| !*r));
    }

    #[test]
    fn amide_bond_is_flagged() {
        let topo = Topology::perceive(&n_methylacetamide()).unwrap();
        assert!(!topo.bonds[0].is_amide);
        assert!(!topo.bonds[1].is_amide);
        assert!(topo.bonds[2].is_amide);
        assert!(!topo.bonds[3].is_amide);
    }

    #[test]
    fn bond_view_carries_endpoint_attributes() {
        let topo = Topology::perceive(&n_methylacetamide()).unwrap();
        let carbonyl = topo.bonds[1];
        assert_eq!(carbonyl.order, BondOrder::Double);
        assert_eq!(carbonyl.begin_hybridization, Hybridization::Sp2);
        assert_eq!(carbonyl.end_heavy_valence, 1);
    }

    #[test]
    fn errors_on_empty_system() {
        let result = Topology::perceive(&System::new());
        assert!(matches!(result, Err(Error::EmptySystem)));
    }

    #[test]
    fn errors_on_invalid_bond_index() {
        let mut sys = System::new();
        sys.atoms.push(Atom::new(Element::C, [0.0, 0.0, 0.0]));
        sys.bonds.push(Bond::new(0, 99, BondOrder::Single));

        let result = Topology::perceive(&sys);
        assert!(matches!(result, Err(Error::InvalidBond { i: 0, j: 99, .. })));
    }

    #[test]
    fn errors_on_self_bond() {
        let mut sys = System::new();
        sys.atoms.push(Atom::new(Element::C, [0.0, 0.0, 0.0]));
        sys.bonds.push(Bond::new(0, 0, BondOrder::Single));

        assert!(matches!(
            Topology::perceive(&sys),
            Err(Error::InvalidBond { i: 0, j: 0, .. })
        ));
    }
}
