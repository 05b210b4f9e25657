use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

macro_rules! elements {
    ($($variant:ident = $z:literal, $mass:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Element {
            $($variant = $z,)+
        }

        impl Element {
            pub fn atomic_mass(&self) -> f64 {
                match self {
                    $(Element::$variant => $mass,)+
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(Element::$variant => stringify!($variant),)+
                }
            }
        }

        impl FromStr for Element {
            type Err = ParseElementError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Element::$variant),)+
                    _ => Err(ParseElementError(s.to_string())),
                }
            }
        }
    };
}

elements! {
    H = 1, 1.008;
    He = 2, 4.0026;
    Li = 3, 6.94;
    Be = 4, 9.0122;
    B = 5, 10.81;
    C = 6, 12.011;
    N = 7, 14.007;
    O = 8, 15.999;
    F = 9, 18.998;
    Ne = 10, 20.18;
    Na = 11, 22.99;
    Mg = 12, 24.305;
    Al = 13, 26.982;
    Si = 14, 28.085;
    P = 15, 30.974;
    S = 16, 32.06;
    Cl = 17, 35.45;
    Ar = 18, 39.948;
    K = 19, 39.098;
    Ca = 20, 40.078;
    Sc = 21, 44.956;
    Ti = 22, 47.867;
    V = 23, 50.942;
    Cr = 24, 51.996;
    Mn = 25, 54.938;
    Fe = 26, 55.845;
    Co = 27, 58.933;
    Ni = 28, 58.693;
    Cu = 29, 63.546;
    Zn = 30, 65.38;
    Ga = 31, 69.723;
    Ge = 32, 72.63;
    As = 33, 74.922;
    Se = 34, 78.971;
    Br = 35, 79.904;
    Kr = 36, 83.798;
    Rb = 37, 85.468;
    Sr = 38, 87.62;
    Y = 39, 88.906;
    Zr = 40, 91.224;
    Nb = 41, 92.906;
    Mo = 42, 95.96;
    Tc = 43, 98.0;
    Ru = 44, 101.07;
    Rh = 45, 102.91;
    Pd = 46, 106.42;
    Ag = 47, 107.87;
    Cd = 48, 112.41;
    In = 49, 114.82;
    Sn = 50, 118.71;
    Sb = 51, 121.76;
    Te = 52, 127.6;
    I = 53, 126.9;
    Xe = 54, 131.29;
    Pt = 78, 195.08;
    Au = 79, 196.97;
    Hg = 80, 200.59;
}

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    /// Anything other than hydrogen counts toward heavy-atom valence.
    #[inline]
    pub fn is_heavy(&self) -> bool {
        !matches!(self, Element::H)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

/// Orbital hybridization of an atom, numbered the way most toolkits report it
/// (1 = sp, 2 = sp², 3 = sp³, 0 = not assigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Hybridization {
    #[default]
    Unknown = 0,
    Sp = 1,
    Sp2 = 2,
    Sp3 = 3,
}

impl Hybridization {
    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Hybridization::Sp)
    }
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hybridization::Unknown => write!(f, "-"),
            Hybridization::Sp => write!(f, "sp"),
            Hybridization::Sp2 => write!(f, "sp2"),
            Hybridization::Sp3 => write!(f, "sp3"),
        }
    }
}
