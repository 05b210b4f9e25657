//! In-memory toolkit for tests.
//!
//! SMILES strings select the behavior:
//!
//! - `"fail"` fails to embed
//! - `"empty"` embeds as a lone atom that yields no conformers
//! - `"slow"` blocks until cancelled (or for 30 s)
//! - `"stuck"` blocks for 3 s and never looks at its token
//! - `"panic"` panics inside the worker
//! - anything else embeds as methane with one tetrahedral conformer; an
//!   `N` in the string makes it methylamine instead

use std::thread;
use std::time::{Duration, Instant};

use super::{Ensemble, Error, Toolkit};
use crate::cancel::CancelToken;
use crate::model::atom::Atom;
use crate::model::system::{Bond, System};
use crate::model::types::{BondOrder, Element};
use crate::shape::config::ConformerSearch;

#[derive(Debug, Default)]
pub struct MockToolkit;

fn methane() -> System {
    let s = 0.63;
    let mut sys = System::new();
    sys.atoms.push(Atom::new(Element::C, [0.0, 0.0, 0.0]));
    for p in [[s, s, s], [s, -s, -s], [-s, s, -s], [-s, -s, s]] {
        sys.atoms.push(Atom::new(Element::H, p));
    }
    for h in 1..5 {
        sys.bonds.push(Bond::new(0, h, BondOrder::Single));
    }
    sys
}

fn methylamine() -> System {
    let mut sys = methane();
    sys.atoms[1] = Atom::new(Element::N, [0.85, 0.85, 0.85]);
    for p in [[1.2, 1.6, 0.4], [1.6, 0.4, 1.2]] {
        let idx = sys.atoms.len();
        sys.atoms.push(Atom::new(Element::H, p));
        sys.bonds.push(Bond::new(1, idx, BondOrder::Single));
    }
    sys
}

impl Toolkit for MockToolkit {
    fn name(&self) -> &str {
        "mock"
    }

    fn embed(&self, smiles: &str, cancel: &CancelToken) -> Result<System, Error> {
        match smiles {
            "fail" => Err(Error::embed(smiles, "unparseable")),
            "empty" => Ok(System {
                atoms: vec![Atom::new(Element::He, [0.0; 3])],
                bonds: Vec::new(),
            }),
            "panic" => panic!("mock toolkit panic"),
            "slow" => {
                let start = Instant::now();
                while start.elapsed() < Duration::from_secs(30) {
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    thread::sleep(Duration::from_millis(5));
                }
                Ok(methane())
            }
            "stuck" => {
                thread::sleep(Duration::from_secs(3));
                Ok(methane())
            }
            s if s.contains('N') => Ok(methylamine()),
            _ => Ok(methane()),
        }
    }

    fn generate_ensemble(
        &self,
        structure: &System,
        _search: &ConformerSearch,
        _cancel: &CancelToken,
    ) -> Result<Ensemble, Error> {
        if structure.atoms.len() == 1 {
            return Ok(Ensemble::new(structure.clone(), Vec::new()));
        }
        Ok(Ensemble::from_structures(
            structure.clone(),
            std::slice::from_ref(structure),
        ))
    }
}
