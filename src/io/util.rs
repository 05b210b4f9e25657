//! CTfile field conversions shared by the SDF reader and writer.

use crate::model::types::{BondOrder, Element};
use std::str::FromStr;

/// Resolves an element from an atom-block symbol, tolerating case (`CL`, `cl`).
pub fn guess_element_symbol(token: &str) -> Option<Element> {
    let token = token.trim();
    let mut chars = token.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    let normalized: String = std::iter::once(first.to_ascii_uppercase())
        .chain(chars.map(|c| c.to_ascii_lowercase()))
        .collect();
    Element::from_str(&normalized).ok()
}

pub fn bond_order_from_ctfile(value: i32) -> Option<BondOrder> {
    match value {
        1 => Some(BondOrder::Single),
        2 => Some(BondOrder::Double),
        3 => Some(BondOrder::Triple),
        4 => Some(BondOrder::Aromatic),
        _ => None,
    }
}

pub fn bond_order_to_ctfile(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Decodes the atom-block charge field (`ccc`).
///
/// Code 4 marks a doublet radical and carries no charge.
pub fn charge_from_ctfile(code: i32) -> Option<i8> {
    match code {
        0 | 4 => Some(0),
        1 => Some(3),
        2 => Some(2),
        3 => Some(1),
        5 => Some(-1),
        6 => Some(-2),
        7 => Some(-3),
        _ => None,
    }
}

/// Encodes a formal charge for the atom-block charge field. Charges outside
/// `-3..=3` have no code and are written as 0; the `M  CHG` line carries them.
pub fn charge_to_ctfile(charge: i8) -> u8 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}
