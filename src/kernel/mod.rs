//! Kernel functions for SVM

pub mod dot;
pub mod polynomial;
pub mod traits;

pub use self::dot::dot;
pub use self::polynomial::*;
pub use self::traits::*;
