use serde::{Deserialize, Serialize};

/// Conformer-averaged descriptors for one input molecule.
///
/// Produced once per molecule by the pipeline and never mutated afterwards.
/// Serialized field names follow the single-molecule output table
/// (`smiles, formula, molwt, rb, glob, pbf, primary_amine`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorRecord {
    /// Source identifier (the SMILES string the record was computed from).
    #[serde(rename = "smiles")]
    pub source: String,
    /// Hill-order molecular formula.
    pub formula: String,
    /// Average molecular weight in g/mol.
    #[serde(rename = "molwt")]
    pub molecular_weight: f64,
    /// Number of rotatable bonds in the base topology.
    #[serde(rename = "rb")]
    pub rotatable_bonds: u32,
    /// Mean globularity over the ensemble; `-1` flags a degenerate geometry.
    #[serde(rename = "glob")]
    pub globularity: f64,
    /// Mean best-fit-plane deviation over the ensemble, in Ångströms.
    pub pbf: f64,
    /// `1` if the primary-amine pattern matched, `0` otherwise.
    pub primary_amine: u8,
}

impl DescriptorRecord {
    #[inline]
    pub fn has_primary_amine(&self) -> bool {
        self.primary_amine != 0
    }
}
