//! Modular integers and their operations.

pub mod modular;
pub mod ops;
pub mod repr;

pub use modular::*;
#[allow(unused_imports)]
pub use ops::*;
pub use repr::*;
