use std::collections::BTreeMap;

use super::atom::Atom;
use super::types::{BondOrder, Element};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// Returns the atom on the other end of the bond, if `idx` is one of its ends.
    #[inline]
    pub fn partner(&self, idx: usize) -> Option<usize> {
        if idx == self.i {
            Some(self.j)
        } else if idx == self.j {
            Some(self.i)
        } else {
            None
        }
    }
}

/// A molecule: atoms in a fixed index order plus the bonds between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Coordinates of every atom, in atom order.
    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Average molecular weight from standard atomic masses.
    pub fn molecular_weight(&self) -> f64 {
        self.atoms.iter().map(|a| a.element.atomic_mass()).sum()
    }

    /// Molecular formula in Hill order: carbon, then hydrogen, then the
    /// remaining elements alphabetically. Without carbon every element is
    /// alphabetical. A net formal charge is appended as `+`/`-` signs.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.symbol()).or_insert(0) += 1;
        }

        let mut out = String::new();
        let mut push = |symbol: &str, count: usize| {
            out.push_str(symbol);
            if count > 1 {
                out.push_str(&count.to_string());
            }
        };

        let carbon = counts.remove(Element::C.symbol());
        if let Some(c) = carbon {
            push(Element::C.symbol(), c);
            if let Some(h) = counts.remove(Element::H.symbol()) {
                push(Element::H.symbol(), h);
            }
        }
        for (symbol, count) in &counts {
            push(symbol, *count);
        }

        let charge: i32 = self.atoms.iter().map(|a| a.formal_charge as i32).sum();
        let sign = if charge > 0 { '+' } else { '-' };
        for _ in 0..charge.unsigned_abs() {
            out.push(sign);
        }

        out
    }
}
