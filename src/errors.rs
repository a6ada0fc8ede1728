//! Crate errors.

use thiserror::Error;

/// The operands live under different moduli.
#[derive(Error, Debug, Eq, PartialEq)]
#[error("mismatched moduli")]
pub struct ModulusMismatch;
