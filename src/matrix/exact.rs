//! Exact integer matrices backing the modular arithmetic.

use num_bigint::BigInt;

/// A dense exact-integer matrix engine.
///
/// `ModularMatrix` lifts its entries into an engine, runs the heavy arithmetic
/// there over plain integers, and reduces the result back into the residue ring.
/// Engines know nothing about moduli; lifting and lowering are pure value
/// transformations, and round trips are lossless.
///
/// Shape preconditions are the caller's responsibility: the modular side checks
/// dimensions before delegating.
pub trait ExactMatrix: Sized {
    /// Builds an engine matrix from row major data; the length must be `nrows * ncols`.
    fn from_data(data: Vec<BigInt>, nrows: usize, ncols: usize) -> Self;

    /// Number of rows.
    fn nrows(&self) -> usize;

    /// Number of columns.
    fn ncols(&self) -> usize;

    /// The entry `M[row,col]` as a plain integer value.
    fn entry(&self, row: usize, col: usize) -> BigInt;

    /// Exact entrywise sum; shapes must match.
    fn add(&self, other: &Self) -> Self;

    /// Exact entrywise difference; shapes must match.
    fn sub(&self, other: &Self) -> Self;

    /// Exact product, `A: MxK * B: KxN -> C: MxN`; `self.ncols()` must equal `other.nrows()`.
    fn mul(&self, other: &Self) -> Self;
}

/// The bundled engine: a flat row major vector of big integers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BigIntMatrix {
    /// Matrix data.
    data: Vec<BigInt>,

    /// Number of rows.
    nrows: usize,

    /// Number of columns.
    ncols: usize,
}

impl ExactMatrix for BigIntMatrix {
    fn from_data(data: Vec<BigInt>, nrows: usize, ncols: usize) -> Self {
        debug_assert_eq!(data.len(), nrows * ncols);
        BigIntMatrix { data, nrows, ncols }
    }

    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn entry(&self, row: usize, col: usize) -> BigInt {
        debug_assert!(row < self.nrows && col < self.ncols);
        self.data.get(row * self.ncols + col).cloned().unwrap_or_default()
    }

    fn add(&self, other: &Self) -> Self {
        debug_assert_eq!((self.nrows, self.ncols), (other.nrows, other.ncols));
        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a + b).collect();
        BigIntMatrix { data, nrows: self.nrows, ncols: self.ncols }
    }

    fn sub(&self, other: &Self) -> Self {
        debug_assert_eq!((self.nrows, self.ncols), (other.nrows, other.ncols));
        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a - b).collect();
        BigIntMatrix { data, nrows: self.nrows, ncols: self.ncols }
    }

    fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.ncols, other.nrows);
        let mut data = Vec::with_capacity(self.nrows * other.ncols);
        for row in 0..self.nrows {
            let lhs_row = self.data.iter().skip(row * self.ncols).take(self.ncols);
            for col in 0..other.ncols {
                let rhs_col = other.data.iter().skip(col).step_by(other.ncols);
                let dot: BigInt = lhs_row.clone().zip(rhs_col).map(|(a, b)| a * b).sum();
                data.push(dot);
            }
        }
        BigIntMatrix { data, nrows: self.nrows, ncols: other.ncols }
    }
}
