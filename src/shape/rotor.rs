//! Rotatable-bond classification.

use super::perception::{BondView, Topology};
use crate::model::types::BondOrder;

/// Decides whether a bond counts as rotatable.
///
/// Rules are applied in order and the first one that matches decides:
///
/// 1. double bonds are never rotatable
/// 2. amide bonds are not rotatable unless `include_amides` is set
/// 3. ring bonds are not rotatable
/// 4. a bond with exactly one sp (linear) end is not rotatable
/// 5. a bond is rotatable iff both ends have more than one heavy neighbor
///
/// Triple bonds are not excluded by rule 1; an sp–sp bond between two heavy
/// centers passes rule 4 and is counted.
pub fn is_rotor(bond: &BondView, include_amides: bool) -> bool {
    if bond.order == BondOrder::Double {
        return false;
    }
    if bond.is_amide && !include_amides {
        return false;
    }
    if bond.in_ring {
        return false;
    }
    if bond.begin_hybridization.is_linear() != bond.end_hybridization.is_linear() {
        return false;
    }
    bond.begin_heavy_valence > 1 && bond.end_heavy_valence > 1
}

/// Counts the rotatable bonds of a perceived topology.
pub fn rotatable_bond_count(topology: &Topology, include_amides: bool) -> u32 {
    topology
        .bonds
        .iter()
        .filter(|bond| is_rotor(bond, include_amides))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::system::{Bond, System};
    use crate::model::types::{Element, Hybridization};
    use crate::shape::perception::tests::{
        add_hydrogens, butane, cyclohexane, n_methylacetamide,
    };

    fn view(order: BondOrder) -> BondView {
        BondView {
            i: 0,
            j: 1,
            order,
            is_amide: false,
            in_ring: false,
            begin_heavy_valence: 2,
            end_heavy_valence: 2,
            begin_hybridization: Hybridization::Sp3,
            end_hybridization: Hybridization::Sp3,
        }
    }

    #[test]
    fn plain_single_bond_between_internal_atoms_is_rotor() {
        assert!(is_rotor(&view(BondOrder::Single), false));
    }

    #[test]
    fn double_bond_is_never_rotor() {
        assert!(!is_rotor(&view(BondOrder::Double), false));
        assert!(!is_rotor(&view(BondOrder::Double), true));
    }

    #[test]
    fn ring_bond_is_never_rotor() {
        let bond = BondView {
            in_ring: true,
            ..view(BondOrder::Single)
        };
        assert!(!is_rotor(&bond, false));
        assert!(!is_rotor(&bond, true));
    }

    #[test]
    fn amide_bond_depends_on_flag() {
        let bond = BondView {
            is_amide: true,
            ..view(BondOrder::Single)
        };
        assert!(!is_rotor(&bond, false));
        assert!(is_rotor(&bond, true));
    }

    #[test]
    fn exactly_one_linear_end_is_not_rotor() {
        let bond = BondView {
            begin_hybridization: Hybridization::Sp,
            ..view(BondOrder::Single)
        };
        assert!(!is_rotor(&bond, false));

        let both = BondView {
            begin_hybridization: Hybridization::Sp,
            end_hybridization: Hybridization::Sp,
            ..view(BondOrder::Triple)
        };
        assert!(is_rotor(&both, false));
    }

    #[test]
    fn terminal_end_falls_through_to_false() {
        let bond = BondView {
            end_heavy_valence: 1,
            ..view(BondOrder::Single)
        };
        assert!(!is_rotor(&bond, false));

        let bare = BondView {
            begin_heavy_valence: 0,
            end_heavy_valence: 0,
            begin_hybridization: Hybridization::Unknown,
            end_hybridization: Hybridization::Unknown,
            ..view(BondOrder::Aromatic)
        };
        assert!(!is_rotor(&bare, false));
    }

    #[test]
    fn butane_has_one_rotor() {
        let topo = Topology::perceive(&butane()).unwrap();
        assert_eq!(rotatable_bond_count(&topo, false), 1);
    }

    #[test]
    fn cyclohexane_has_no_rotors() {
        let topo = Topology::perceive(&cyclohexane()).unwrap();
        assert_eq!(rotatable_bond_count(&topo, false), 0);
    }

    #[test]
    fn amide_counts_only_when_included() {
        let topo = Topology::perceive(&n_methylacetamide()).unwrap();
        assert_eq!(rotatable_bond_count(&topo, false), 0);
        assert_eq!(rotatable_bond_count(&topo, true), 1);
    }

    #[test]
    fn internal_triple_bond_is_counted() {
        // CH3-CH2-C#C-CH2-CH3 (3-hexyne)
        let mut sys = System::new();
        for k in 0..6 {
            sys.atoms.push(Atom::new(Element::C, [k as f64, 0.0, 0.0]));
        }
        sys.bonds.push(Bond::new(0, 1, BondOrder::Single));
        sys.bonds.push(Bond::new(1, 2, BondOrder::Single));
        sys.bonds.push(Bond::new(2, 3, BondOrder::Triple));
        sys.bonds.push(Bond::new(3, 4, BondOrder::Single));
        sys.bonds.push(Bond::new(4, 5, BondOrder::Single));
        add_hydrogens(&mut sys, 0, 3);
        add_hydrogens(&mut sys, 1, 2);
        add_hydrogens(&mut sys, 4, 2);
        add_hydrogens(&mut sys, 5, 3);

        let topo = Topology::perceive(&sys).unwrap();
        let rotors: Vec<bool> = topo.bonds[..5].iter().map(|b| is_rotor(b, false)).collect();
        assert_eq!(rotors, vec![false, false, true, false, false]);
        assert_eq!(rotatable_bond_count(&topo, false), 1);
    }

    #[test]
    fn count_is_invariant_under_bond_permutation() {
        let sys = n_methylacetamide();
        let mut chain = butane();
        let offset = chain.atoms.len();
        chain.atoms.extend(sys.atoms.iter().cloned());
        for b in &sys.bonds {
            chain.bonds.push(Bond::new(b.i + offset, b.j + offset, b.order));
        }

        let expected = rotatable_bond_count(&Topology::perceive(&chain).unwrap(), true);

        let mut reversed = chain.clone();
        reversed.bonds.reverse();
        let mut rotated = chain.clone();
        rotated.bonds.rotate_left(5);

        for permuted in [reversed, rotated] {
            let topo = Topology::perceive(&permuted).unwrap();
            assert_eq!(rotatable_bond_count(&topo, true), expected);
        }
        assert_eq!(expected, 2);
    }
}
