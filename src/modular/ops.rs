//! ModularInteger operations.

use super::modular::{ModularInteger, Repr};
use crate::errors::ModulusMismatch;
use std::ops::{Add, Mul, Sub};

impl Add<&ModularInteger> for ModularInteger {
    type Output = Result<ModularInteger, ModulusMismatch>;

    fn add(self, other: &ModularInteger) -> Self::Output {
        (&self).add(other)
    }
}

impl Add for &ModularInteger {
    type Output = Result<ModularInteger, ModulusMismatch>;

    fn add(self, other: &ModularInteger) -> Self::Output {
        match (&self.repr, &other.repr) {
            (Repr::Narrow { value: a, modulus: m }, Repr::Narrow { value: b, modulus: n }) if m == n => {
                let value = ((u128::from(*a) + u128::from(*b)) % u128::from(*m)) as u64;
                Ok(ModularInteger { repr: Repr::Narrow { value, modulus: *m } })
            }
            (Repr::Wide { value: a, modulus: m }, Repr::Wide { value: b, modulus: n }) if m == n => {
                let value = (a + b) % m;
                Ok(ModularInteger { repr: Repr::Wide { value, modulus: m.clone() } })
            }
            _ => Err(ModulusMismatch),
        }
    }
}

impl Sub<&ModularInteger> for ModularInteger {
    type Output = Result<ModularInteger, ModulusMismatch>;

    fn sub(self, other: &ModularInteger) -> Self::Output {
        (&self).sub(other)
    }
}

impl Sub for &ModularInteger {
    type Output = Result<ModularInteger, ModulusMismatch>;

    fn sub(self, other: &ModularInteger) -> Self::Output {
        match (&self.repr, &other.repr) {
            (Repr::Narrow { value: a, modulus: m }, Repr::Narrow { value: b, modulus: n }) if m == n => {
                // Adding the modulus first keeps the difference in the unsigned domain.
                let value = ((u128::from(*a) + u128::from(*m) - u128::from(*b)) % u128::from(*m)) as u64;
                Ok(ModularInteger { repr: Repr::Narrow { value, modulus: *m } })
            }
            (Repr::Wide { value: a, modulus: m }, Repr::Wide { value: b, modulus: n }) if m == n => {
                let value = ((a + m) - b) % m;
                Ok(ModularInteger { repr: Repr::Wide { value, modulus: m.clone() } })
            }
            _ => Err(ModulusMismatch),
        }
    }
}

impl Mul<&ModularInteger> for ModularInteger {
    type Output = Result<ModularInteger, ModulusMismatch>;

    fn mul(self, other: &ModularInteger) -> Self::Output {
        (&self).mul(other)
    }
}

impl Mul for &ModularInteger {
    type Output = Result<ModularInteger, ModulusMismatch>;

    fn mul(self, other: &ModularInteger) -> Self::Output {
        match (&self.repr, &other.repr) {
            (Repr::Narrow { value: a, modulus: m }, Repr::Narrow { value: b, modulus: n }) if m == n => {
                let value = ((u128::from(*a) * u128::from(*b)) % u128::from(*m)) as u64;
                Ok(ModularInteger { repr: Repr::Narrow { value, modulus: *m } })
            }
            (Repr::Wide { value: a, modulus: m }, Repr::Wide { value: b, modulus: n }) if m == n => {
                let value = (a * b) % m;
                Ok(ModularInteger { repr: Repr::Wide { value, modulus: m.clone() } })
            }
            _ => Err(ModulusMismatch),
        }
    }
}
