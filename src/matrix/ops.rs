//! Matrix operations.
//!
//! Additive and multiplicative operators lift both operands into the exact
//! engine, run the arithmetic there, and reduce the result back into the ring.
//! Dimension checks run before modulus checks.

use crate::{
    errors::ModulusMismatch,
    matrix::{
        exact::{BigIntMatrix, ExactMatrix},
        matrix::{MatrixError, ModularMatrix},
    },
    modular::ModularInteger,
};
use std::ops::{Add, Mul, Sub};

impl Add<&ModularMatrix> for ModularMatrix {
    type Output = Result<ModularMatrix, MatrixError>;

    fn add(self, other: &ModularMatrix) -> Self::Output {
        (&self).add(other)
    }
}

impl Add for &ModularMatrix {
    type Output = Result<ModularMatrix, MatrixError>;

    fn add(self, other: &ModularMatrix) -> Self::Output {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return Err(MatrixError::DimensionMismatch(self.nrows(), self.ncols(), other.nrows(), other.ncols()));
        }
        if self.modulus() != other.modulus() {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        let sum = self.to_exact::<BigIntMatrix>().add(&other.to_exact());
        ModularMatrix::from_exact(&sum, self.modulus())
    }
}

impl Sub<&ModularMatrix> for ModularMatrix {
    type Output = Result<ModularMatrix, MatrixError>;

    fn sub(self, other: &ModularMatrix) -> Self::Output {
        (&self).sub(other)
    }
}

impl Sub for &ModularMatrix {
    type Output = Result<ModularMatrix, MatrixError>;

    fn sub(self, other: &ModularMatrix) -> Self::Output {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return Err(MatrixError::DimensionMismatch(self.nrows(), self.ncols(), other.nrows(), other.ncols()));
        }
        if self.modulus() != other.modulus() {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        let difference = self.to_exact::<BigIntMatrix>().sub(&other.to_exact());
        ModularMatrix::from_exact(&difference, self.modulus())
    }
}

impl Mul<&ModularMatrix> for ModularMatrix {
    type Output = Result<ModularMatrix, MatrixError>;

    fn mul(self, other: &ModularMatrix) -> Self::Output {
        (&self).mul(other)
    }
}

impl Mul for &ModularMatrix {
    type Output = Result<ModularMatrix, MatrixError>;

    /// Matrix multiplication, `A: MxK * B: KxN -> C: MxN`.
    fn mul(self, other: &ModularMatrix) -> Self::Output {
        if self.ncols() != other.nrows() {
            return Err(MatrixError::DimensionMismatch(self.nrows(), self.ncols(), other.nrows(), other.ncols()));
        }
        if self.modulus() != other.modulus() {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        // The result shape must fit a usize before the engine allocates it.
        self.nrows().checked_mul(other.ncols()).ok_or(MatrixError::Arithmetic)?;
        let product = self.to_exact::<BigIntMatrix>().mul(&other.to_exact());
        ModularMatrix::from_exact(&product, self.modulus())
    }
}

impl ModularMatrix {
    /// Entrywise product with a scalar sharing the matrix modulus.
    pub fn scalar_mul(&self, scalar: &ModularInteger) -> Result<ModularMatrix, MatrixError> {
        if !scalar.has_modulus(self.modulus()) {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        let data = self.data().iter().map(|entry| entry * scalar).collect::<Result<Vec<_>, _>>()?;
        ModularMatrix::new(data, self.nrows(), self.ncols(), self.modulus())
    }

    /// Entrywise (Hadamard) product of two matrices of equal shape.
    pub fn hadamard(&self, other: &ModularMatrix) -> Result<ModularMatrix, MatrixError> {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return Err(MatrixError::DimensionMismatch(self.nrows(), self.ncols(), other.nrows(), other.ncols()));
        }
        if self.modulus() != other.modulus() {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        let data = self
            .data()
            .iter()
            .zip(other.data().iter())
            .map(|(a, b)| a * b)
            .collect::<Result<Vec<_>, _>>()?;
        ModularMatrix::new(data, self.nrows(), self.ncols(), self.modulus())
    }

    /// Inner product of two vectors of equal length.
    ///
    /// Both operands must be single-row or single-column matrices; row and
    /// column orientations may be mixed.
    pub fn dot(&self, other: &ModularMatrix) -> Result<ModularInteger, MatrixError> {
        if !self.is_vector() || !other.is_vector() || self.data().len() != other.data().len() {
            return Err(MatrixError::DimensionMismatch(self.nrows(), self.ncols(), other.nrows(), other.ncols()));
        }
        if self.modulus() != other.modulus() {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        let mut sum = ModularInteger::zero(self.modulus());
        for (a, b) in self.data().iter().zip(other.data().iter()) {
            let product = (a * b)?;
            sum = (&sum + &product)?;
        }
        Ok(sum)
    }

    /// Outer product of two vectors of lengths `m` and `n`, an `m x n` matrix.
    pub fn outer(&self, other: &ModularMatrix) -> Result<ModularMatrix, MatrixError> {
        if !self.is_vector() || !other.is_vector() {
            return Err(MatrixError::DimensionMismatch(self.nrows(), self.ncols(), other.nrows(), other.ncols()));
        }
        if self.modulus() != other.modulus() {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        let n = self.data().len().checked_mul(other.data().len()).ok_or(MatrixError::Arithmetic)?;
        let mut data = Vec::with_capacity(n);
        for a in self.data() {
            for b in other.data() {
                data.push((a * b)?);
            }
        }
        ModularMatrix::new(data, self.data().len(), other.data().len(), self.modulus())
    }
}
