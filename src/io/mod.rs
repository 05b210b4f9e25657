//! File I/O for molecular structures and descriptor tables.
//!
//! - [`sdf`]: multi-record MDL SDF (V2000), the exchange format with the
//!   conformer-generation toolkit
//! - [`table`]: delimited tables with a header row, used for batch input
//!   and descriptor output

use std::fmt;

pub mod error;
pub mod table;
pub mod util;

pub mod sdf {
    pub mod reader;
    pub mod writer;

    pub use reader::{read, read_all};
    pub use writer::{write, write_all};
}

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sdf,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
        }
    }
}
