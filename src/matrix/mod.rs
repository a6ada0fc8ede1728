//! Matrix operations.

pub mod exact;
pub mod matrix;
pub mod ops;

pub use exact::{BigIntMatrix, ExactMatrix};
pub use matrix::{MatrixError, ModularMatrix};
#[allow(unused_imports)]
pub use ops::*;
