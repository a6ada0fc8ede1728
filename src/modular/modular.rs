//! Modular integers under a runtime modulus.

use super::repr::{Modulus, ModulusKind, ParseError};
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;
use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// A number that performs modular arithmetic in every operation.
///
/// The modulus is a runtime value carried by each instance. Construction reduces the
/// input into the canonical range `[0, modulus)` using true mathematical modulo, so
/// negative inputs normalize to their positive residue. Arithmetic requires both
/// operands to share the same modulus and always produces a new instance; operands
/// are never mutated.
///
/// Under the hood, residues under a modulus that fits an unsigned 64 bit word use
/// native arithmetic, while larger moduli fall back to arbitrary precision. The lane
/// is inherited from the modulus and is invisible in the API.
///
/// # Examples
///
/// ```
/// use lattice_math::modular::ModularInteger;
///
/// let ten = ModularInteger::from_decimal("10", "17")?;
/// let fifteen = ModularInteger::from_decimal("15", "17")?;
/// let sum = (&ten + &fifteen)?;
///
/// assert_eq!(sum.to_string(), "8");
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// Negative numerals normalize into the canonical range:
///
/// ```
/// use lattice_math::modular::ModularInteger;
///
/// let value = ModularInteger::from_decimal("-3", "7")?;
/// assert_eq!(value.to_string(), "4");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct ModularInteger {
    pub(crate) repr: Repr,
}

/// Dual width storage, one arm per modulus lane.
#[derive(Clone, Eq, PartialEq)]
pub(crate) enum Repr {
    /// Native word arithmetic.
    Narrow {
        /// Residue in `[0, modulus)`.
        value: u64,
        /// The modulus, known to fit a word.
        modulus: u64,
    },

    /// Arbitrary precision arithmetic.
    Wide {
        /// Residue in `[0, modulus)`.
        value: BigUint,
        /// The modulus, known to exceed the word range.
        modulus: BigUint,
    },
}

impl ModularInteger {
    /// Constructs a modular integer from base 10 numerals for the value and the modulus.
    ///
    /// The value may carry a leading `-`; it is reduced into `[0, modulus)`. The
    /// modulus must be a positive numeral.
    pub fn from_decimal(value: &str, modulus: &str) -> Result<ModularInteger, ParseError> {
        let modulus = Modulus::from_decimal(modulus)?;
        let value = BigInt::from_str(value).map_err(|_| ParseError::InvalidDigits)?;
        Ok(ModularInteger::new(value, &modulus))
    }

    /// Constructs a modular integer from any integer value, reduced into `[0, modulus)`.
    pub fn new<V: Into<BigInt>>(value: V, modulus: &Modulus) -> ModularInteger {
        let value = value.into();
        let repr = match &modulus.kind {
            ModulusKind::Narrow(modulus) => {
                let wide_modulus = BigInt::from(*modulus);
                let reduced = ((value % &wide_modulus) + &wide_modulus) % &wide_modulus;
                // Safety: the reduced value is in [0, modulus) and the modulus fits a word.
                #[allow(clippy::unwrap_used)]
                let value = reduced.to_u64().unwrap();
                Repr::Narrow { value, modulus: *modulus }
            }
            ModulusKind::Wide(modulus) => {
                let wide_modulus = BigInt::from(modulus.clone());
                let reduced = ((value % &wide_modulus) + &wide_modulus) % &wide_modulus;
                Repr::Wide { value: reduced.magnitude().clone(), modulus: modulus.clone() }
            }
        };
        ModularInteger { repr }
    }

    /// The zero residue under the given modulus.
    pub fn zero(modulus: &Modulus) -> ModularInteger {
        let repr = match &modulus.kind {
            ModulusKind::Narrow(modulus) => Repr::Narrow { value: 0, modulus: *modulus },
            ModulusKind::Wide(modulus) => Repr::Wide { value: BigUint::zero(), modulus: modulus.clone() },
        };
        ModularInteger { repr }
    }

    /// The one residue under the given modulus.
    ///
    /// Under the unit modulus this collapses to zero.
    pub fn one(modulus: &Modulus) -> ModularInteger {
        let repr = match &modulus.kind {
            ModulusKind::Narrow(modulus) => Repr::Narrow { value: 1 % *modulus, modulus: *modulus },
            ModulusKind::Wide(modulus) => Repr::Wide { value: BigUint::one(), modulus: modulus.clone() },
        };
        ModularInteger { repr }
    }

    /// Generates a uniformly random residue using the provided random number generator.
    pub fn gen_random_with_rng<R: Rng>(modulus: &Modulus, rng: &mut R) -> ModularInteger {
        let repr = match &modulus.kind {
            ModulusKind::Narrow(modulus) => Repr::Narrow { value: rng.gen_range(0..*modulus), modulus: *modulus },
            ModulusKind::Wide(modulus) => {
                Repr::Wide { value: rng.gen_biguint_below(modulus), modulus: modulus.clone() }
            }
        };
        ModularInteger { repr }
    }

    /// Check if this modular integer is zero.
    pub fn is_zero(&self) -> bool {
        match &self.repr {
            Repr::Narrow { value, .. } => *value == 0,
            Repr::Wide { value, .. } => value.is_zero(),
        }
    }

    /// Check if this modular integer is one.
    pub fn is_one(&self) -> bool {
        match &self.repr {
            Repr::Narrow { value, modulus } => *value == 1 % *modulus,
            Repr::Wide { value, .. } => value.is_one(),
        }
    }

    /// Checks whether this residue lives under the given modulus.
    pub fn has_modulus(&self, modulus: &Modulus) -> bool {
        match (&self.repr, &modulus.kind) {
            (Repr::Narrow { modulus: own, .. }, ModulusKind::Narrow(other)) => own == other,
            (Repr::Wide { modulus: own, .. }, ModulusKind::Wide(other)) => own == other,
            _ => false,
        }
    }

    /// The modulus this residue lives under.
    pub fn modulus(&self) -> Modulus {
        let kind = match &self.repr {
            Repr::Narrow { modulus, .. } => ModulusKind::Narrow(*modulus),
            Repr::Wide { modulus, .. } => ModulusKind::Wide(modulus.clone()),
        };
        Modulus { kind }
    }

    /// The canonical value in `[0, modulus)`.
    pub fn to_biguint(&self) -> BigUint {
        match &self.repr {
            Repr::Narrow { value, .. } => BigUint::from(*value),
            Repr::Wide { value, .. } => value.clone(),
        }
    }
}

impl From<&ModularInteger> for BigUint {
    fn from(value: &ModularInteger) -> Self {
        value.to_biguint()
    }
}

impl From<&ModularInteger> for BigInt {
    fn from(value: &ModularInteger) -> Self {
        BigInt::from(value.to_biguint())
    }
}

// String conversions.

impl Debug for ModularInteger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = self.to_biguint();
        let modulus = self.modulus();
        write!(f, "{value} mod {modulus}")
    }
}

impl Display for ModularInteger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = self.to_biguint();
        write!(f, "{value}")
    }
}
