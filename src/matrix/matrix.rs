//! Dense matrices over modular integers.

use crate::{
    errors::ModulusMismatch,
    matrix::exact::ExactMatrix,
    modular::{ModularInteger, Modulus},
    sampling::{NoiseSampler, SampleError},
};
use num_bigint::BigInt;
use rand::Rng;
use thiserror::Error;

/// A dense row major matrix whose entries share a single modulus.
///
/// Entry arithmetic happens in the residue ring; the heavy matrix arithmetic is
/// delegated to an exact-integer engine through [ExactMatrix] and reduced back on
/// the way out. Cloning deep-copies the entries; operations never mutate their
/// operands.
///
/// # Examples
///
/// ```
/// use lattice_math::{matrix::ModularMatrix, modular::Modulus};
///
/// # fn test() -> anyhow::Result<()> {
/// let modulus: Modulus = "17".parse()?;
/// let identity = ModularMatrix::identity(2, &modulus)?;
/// let doubled = (&identity + &identity)?;
/// assert_eq!(doubled.entry(0, 0)?.to_string(), "2");
/// assert_eq!(doubled.entry(0, 1)?.to_string(), "0");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModularMatrix {
    /// Matrix data.
    data: Vec<ModularInteger>,

    /// Number of rows.
    nrows: usize,

    /// Number of columns.
    ncols: usize,

    /// The modulus shared by every entry.
    modulus: Modulus,
}

impl ModularMatrix {
    /// New matrix from row major data.
    pub fn new(
        data: Vec<ModularInteger>,
        nrows: usize,
        ncols: usize,
        modulus: &Modulus,
    ) -> Result<ModularMatrix, MatrixError> {
        let n = nrows.checked_mul(ncols).ok_or(MatrixError::Arithmetic)?;
        if n != data.len() {
            return Err(MatrixError::Build(data.len(), n));
        }
        if data.iter().any(|entry| !entry.has_modulus(modulus)) {
            return Err(MatrixError::ModulusMismatch(ModulusMismatch));
        }
        Ok(ModularMatrix { data, nrows, ncols, modulus: modulus.clone() })
    }

    /// Zero matrix.
    pub fn zero(nrows: usize, ncols: usize, modulus: &Modulus) -> Result<ModularMatrix, MatrixError> {
        let n = nrows.checked_mul(ncols).ok_or(MatrixError::Arithmetic)?;
        let data = vec![ModularInteger::zero(modulus); n];
        Ok(ModularMatrix { data, nrows, ncols, modulus: modulus.clone() })
    }

    /// Identity matrix.
    pub fn identity(n: usize, modulus: &Modulus) -> Result<ModularMatrix, MatrixError> {
        let mut m = ModularMatrix::zero(n, n, modulus)?;
        for i in 0..n {
            *m.entry_mut(i, i)? = ModularInteger::one(modulus);
        }
        Ok(m)
    }

    /// Matrix with uniformly random entries under the modulus.
    pub fn random<R: Rng>(
        nrows: usize,
        ncols: usize,
        modulus: &Modulus,
        rng: &mut R,
    ) -> Result<ModularMatrix, MatrixError> {
        let n = nrows.checked_mul(ncols).ok_or(MatrixError::Arithmetic)?;
        let data = (0..n).map(|_| ModularInteger::gen_random_with_rng(modulus, rng)).collect();
        Ok(ModularMatrix { data, nrows, ncols, modulus: modulus.clone() })
    }

    /// Matrix with discretized Gaussian noise entries, reduced into the ring.
    ///
    /// Negative draws wrap to their positive residues, so small noise clusters
    /// around both ends of `[0, modulus)`.
    pub fn noise(
        nrows: usize,
        ncols: usize,
        modulus: &Modulus,
        sigma: f64,
        sampler: &mut NoiseSampler,
    ) -> Result<ModularMatrix, MatrixError> {
        let n = nrows.checked_mul(ncols).ok_or(MatrixError::Arithmetic)?;
        let mut data = Vec::with_capacity(n);
        for _ in 0..n {
            let error = sampler.gaussian_error(sigma)?;
            data.push(ModularInteger::new(error, modulus));
        }
        Ok(ModularMatrix { data, nrows, ncols, modulus: modulus.clone() })
    }

    /// Returns the reference to data.
    pub fn data(&self) -> &Vec<ModularInteger> {
        &self.data
    }

    /// Returns the data as a Vec consuming the matrix.
    pub fn to_vec(self) -> Vec<ModularInteger> {
        self.data
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// The modulus shared by every entry.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Whether the matrix is a single row or a single column.
    pub fn is_vector(&self) -> bool {
        self.nrows == 1 || self.ncols == 1
    }

    /// Get the matrix entry `M[row,col]`.
    ///
    /// The row bound is checked before the column bound.
    pub fn entry(&self, row: usize, col: usize) -> Result<&ModularInteger, MatrixError> {
        if row >= self.nrows {
            return Err(MatrixError::RowOutOfBounds(row, self.nrows));
        }
        if col >= self.ncols {
            return Err(MatrixError::ColumnOutOfBounds(col, self.ncols));
        }
        let index = row.checked_mul(self.ncols).and_then(|i| i.checked_add(col)).ok_or(MatrixError::Arithmetic)?;
        self.data.get(index).ok_or(MatrixError::Arithmetic)
    }

    /// Get the matrix entry `M[row,col]` mutably.
    ///
    /// The row bound is checked before the column bound.
    pub fn entry_mut(&mut self, row: usize, col: usize) -> Result<&mut ModularInteger, MatrixError> {
        if row >= self.nrows {
            return Err(MatrixError::RowOutOfBounds(row, self.nrows));
        }
        if col >= self.ncols {
            return Err(MatrixError::ColumnOutOfBounds(col, self.ncols));
        }
        let index = row.checked_mul(self.ncols).and_then(|i| i.checked_add(col)).ok_or(MatrixError::Arithmetic)?;
        self.data.get_mut(index).ok_or(MatrixError::Arithmetic)
    }

    /// Transposed copy of the matrix.
    pub fn transpose(&self) -> ModularMatrix {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.ncols {
            data.extend(self.data.iter().skip(col).step_by(self.ncols).cloned());
        }
        ModularMatrix { data, nrows: self.ncols, ncols: self.nrows, modulus: self.modulus.clone() }
    }

    /// Lifts the matrix into an exact-integer engine.
    ///
    /// The engine matrix has the same dimensions and carries the canonical entry
    /// values as plain integers; the modulus does not cross the bridge.
    pub fn to_exact<M: ExactMatrix>(&self) -> M {
        let data = self.data.iter().map(BigInt::from).collect();
        M::from_data(data, self.nrows, self.ncols)
    }

    /// Lowers an exact-integer engine matrix into the residue ring.
    ///
    /// Every entry is reduced into `[0, modulus)`; negative engine results
    /// normalize to their positive residues.
    pub fn from_exact<M: ExactMatrix>(exact: &M, modulus: &Modulus) -> Result<ModularMatrix, MatrixError> {
        let nrows = exact.nrows();
        let ncols = exact.ncols();
        let n = nrows.checked_mul(ncols).ok_or(MatrixError::Arithmetic)?;
        let mut data = Vec::with_capacity(n);
        for row in 0..nrows {
            for col in 0..ncols {
                data.push(ModularInteger::new(exact.entry(row, col), modulus));
            }
        }
        Ok(ModularMatrix { data, nrows, ncols, modulus: modulus.clone() })
    }
}

impl Default for ModularMatrix {
    fn default() -> Self {
        ModularMatrix { data: Vec::new(), nrows: 0, ncols: 0, modulus: Modulus::one() }
    }
}

/// Matrix Error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum MatrixError {
    /// Integer overflow or underflow.
    #[error("integer overflow/underflow")]
    Arithmetic,

    /// Error building matrix.
    #[error("error building matrix, given data has {0} entries which does not match nrows x ncols = {1}")]
    Build(usize, usize),

    /// Row index out of bounds.
    #[error("row index {0} out of bounds, matrix has {1} rows")]
    RowOutOfBounds(usize, usize),

    /// Column index out of bounds.
    #[error("column index {0} out of bounds, matrix has {1} columns")]
    ColumnOutOfBounds(usize, usize),

    /// Operand dimensions are incompatible.
    #[error("matrix dimensions {0}x{1} and {2}x{3} are incompatible")]
    DimensionMismatch(usize, usize, usize, usize),

    /// Operand moduli differ.
    #[error("operation error: {0}")]
    ModulusMismatch(#[from] ModulusMismatch),

    /// Sampling error.
    #[error("sampling error: {0}")]
    Sample(#[from] SampleError),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::matrix::exact::BigIntMatrix;
    use rand::SeedableRng;

    fn make_modulus() -> Modulus {
        Modulus::from_decimal("13").unwrap()
    }

    fn make_vector(values: &[u64]) -> Vec<ModularInteger> {
        let modulus = make_modulus();
        values.iter().map(|val| ModularInteger::new(*val, &modulus)).collect()
    }

    fn make_matrix(nrows: usize, ncols: usize, values: &[u64]) -> ModularMatrix {
        ModularMatrix::new(make_vector(values), nrows, ncols, &make_modulus()).unwrap()
    }

    #[test]
    fn build_rejects_wrong_length() {
        let result = ModularMatrix::new(make_vector(&[1, 2, 3]), 2, 2, &make_modulus());
        assert_eq!(result, Err(MatrixError::Build(3, 4)));
    }

    #[test]
    fn build_rejects_foreign_modulus() {
        let modulus = Modulus::from_decimal("17").unwrap();
        let result = ModularMatrix::new(make_vector(&[1, 2]), 1, 2, &modulus);
        assert_eq!(result, Err(MatrixError::ModulusMismatch(ModulusMismatch)));
    }

    #[test]
    fn zero_fills() {
        let matrix = ModularMatrix::zero(2, 3, &make_modulus()).unwrap();
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), 3);
        assert!(matrix.data().iter().all(ModularInteger::is_zero));
    }

    #[test]
    fn identity() {
        let result = ModularMatrix::identity(3, &make_modulus()).unwrap();
        let expected = make_matrix(3, 3, &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(result, expected);
    }

    #[test]
    fn default_is_empty_under_unit_modulus() {
        let matrix = ModularMatrix::default();
        assert_eq!(matrix.nrows(), 0);
        assert_eq!(matrix.ncols(), 0);
        assert_eq!(*matrix.modulus(), Modulus::one());
    }

    #[test]
    fn entry_access() {
        let matrix = make_matrix(2, 3, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(matrix.entry(0, 0).unwrap().to_string(), "1");
        assert_eq!(matrix.entry(1, 2).unwrap().to_string(), "6");
    }

    #[test]
    fn entry_mut_writes_through() {
        let mut matrix = make_matrix(2, 2, &[1, 2, 3, 4]);
        *matrix.entry_mut(1, 0).unwrap() = ModularInteger::new(9, &make_modulus());
        assert_eq!(matrix.entry(1, 0).unwrap().to_string(), "9");
    }

    #[test]
    fn to_vec_returns_row_major_entries() {
        let matrix = make_matrix(2, 2, &[1, 2, 3, 4]);
        assert_eq!(matrix.to_vec(), make_vector(&[1, 2, 3, 4]));
    }

    #[test]
    fn out_of_bounds_checks_row_first() {
        let matrix = make_matrix(2, 3, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(matrix.entry(5, 0), Err(MatrixError::RowOutOfBounds(5, 2)));
        assert_eq!(matrix.entry(1, 7), Err(MatrixError::ColumnOutOfBounds(7, 3)));
        assert_eq!(matrix.entry(7, 9), Err(MatrixError::RowOutOfBounds(7, 2)));
    }

    #[test]
    fn transpose_reindexes() {
        let matrix = make_matrix(2, 3, &[1, 2, 3, 4, 5, 6]);
        let transposed = matrix.transpose();
        let expected = make_matrix(3, 2, &[1, 4, 2, 5, 3, 6]);
        assert_eq!(transposed, expected);
        assert_eq!(transposed.transpose(), matrix);
    }

    #[test]
    fn is_vector() {
        assert!(make_matrix(1, 3, &[1, 2, 3]).is_vector());
        assert!(make_matrix(3, 1, &[1, 2, 3]).is_vector());
        assert!(make_matrix(1, 1, &[5]).is_vector());
        assert!(!make_matrix(2, 2, &[1, 2, 3, 4]).is_vector());
    }

    #[test]
    fn exact_bridge_round_trip() {
        let matrix = make_matrix(2, 2, &[1, 5, 12, 0]);
        let exact: BigIntMatrix = matrix.to_exact();
        assert_eq!(exact.entry(1, 0), BigInt::from(12));
        let back = ModularMatrix::from_exact(&exact, &make_modulus()).unwrap();
        assert_eq!(back, matrix);
    }

    #[test]
    fn from_exact_reduces_entries() {
        let data = vec![BigInt::from(15), BigInt::from(-1), BigInt::from(13), BigInt::from(3)];
        let exact = BigIntMatrix::from_data(data, 2, 2);
        let matrix = ModularMatrix::from_exact(&exact, &make_modulus()).unwrap();
        assert_eq!(matrix, make_matrix(2, 2, &[2, 12, 0, 3]));
    }

    #[test]
    fn random_entries_stay_under_modulus() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let modulus = make_modulus();
        let matrix = ModularMatrix::random(4, 5, &modulus, &mut sampler).unwrap();
        assert_eq!((matrix.nrows(), matrix.ncols()), (4, 5));
        assert!(matrix.data().iter().all(|entry| entry.to_biguint() < modulus.to_biguint()));
    }

    #[test]
    fn random_supports_wide_moduli() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let modulus = Modulus::from_decimal("340282366920938463463374607431768211456").unwrap();
        let matrix = ModularMatrix::random(3, 3, &modulus, &mut sampler).unwrap();
        assert!(matrix.data().iter().all(|entry| entry.to_biguint() < modulus.to_biguint()));
    }

    #[test]
    fn noise_with_zero_sigma_is_zero() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let matrix = ModularMatrix::noise(3, 3, &make_modulus(), 0.0, &mut sampler).unwrap();
        assert!(matrix.data().iter().all(ModularInteger::is_zero));
    }

    #[test]
    fn noise_entries_are_valid_residues() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let modulus = Modulus::from_decimal("1000003").unwrap();
        let matrix = ModularMatrix::noise(4, 4, &modulus, 3.2, &mut sampler).unwrap();
        assert!(matrix.data().iter().all(|entry| entry.to_biguint() < modulus.to_biguint()));
    }

    #[test]
    fn noise_rejects_invalid_sigma() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let result = ModularMatrix::noise(2, 2, &make_modulus(), -1.0, &mut sampler);
        assert_eq!(result, Err(MatrixError::Sample(SampleError::InvalidSigma)));
    }
}
