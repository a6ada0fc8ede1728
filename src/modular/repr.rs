//! Runtime modulus representation.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// An error when parsing a modular integer or a modulus.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The input value contained invalid digits.
    #[error("invalid digits")]
    InvalidDigits,

    /// The modulus was zero or negative.
    #[error("modulus must be positive")]
    NonPositiveModulus,
}

/// A positive modulus, parsed and validated once, shared by every residue under it.
///
/// The representation width is decided here: a modulus that fits an unsigned 64 bit
/// word selects native arithmetic, anything larger selects arbitrary precision. The
/// width is a function of the magnitude alone and never changes after parsing.
///
/// # Examples
///
/// ```
/// use lattice_math::modular::Modulus;
///
/// let modulus: Modulus = "17".parse()?;
/// assert!(modulus.fits_word());
///
/// let modulus: Modulus = "18446744073709551616".parse()?;
/// assert!(!modulus.fits_word());
/// # Ok::<(), lattice_math::modular::ParseError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Modulus {
    pub(crate) kind: ModulusKind,
}

/// The width lane a modulus selects.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ModulusKind {
    /// Fits an unsigned 64 bit word.
    Narrow(u64),

    /// Exceeds the word range.
    Wide(BigUint),
}

impl Modulus {
    /// Parses a modulus from a base 10 numeral.
    pub fn from_decimal(input: &str) -> Result<Modulus, ParseError> {
        let parsed = BigInt::from_str(input).map_err(|_| ParseError::InvalidDigits)?;
        if parsed.sign() != Sign::Plus {
            return Err(ParseError::NonPositiveModulus);
        }
        let magnitude = parsed.magnitude();
        let kind = match magnitude.to_u64() {
            Some(word) => ModulusKind::Narrow(word),
            None => ModulusKind::Wide(magnitude.clone()),
        };
        Ok(Modulus { kind })
    }

    /// The unit modulus, under which every residue is zero.
    pub fn one() -> Modulus {
        Modulus { kind: ModulusKind::Narrow(1) }
    }

    /// Whether the modulus fits an unsigned 64 bit word.
    pub fn fits_word(&self) -> bool {
        matches!(self.kind, ModulusKind::Narrow(_))
    }

    /// The modulus value.
    pub fn to_biguint(&self) -> BigUint {
        match &self.kind {
            ModulusKind::Narrow(value) => BigUint::from(*value),
            ModulusKind::Wide(value) => value.clone(),
        }
    }
}

impl FromStr for Modulus {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Modulus::from_decimal(input)
    }
}

impl Display for Modulus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ModulusKind::Narrow(value) => write!(f, "{value}"),
            ModulusKind::Wide(value) => write!(f, "{value}"),
        }
    }
}
