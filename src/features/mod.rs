//! Feature providers
//!
//! Implementations of the [`FeatureProvider`](crate::core::FeatureProvider)
//! trait consumed by kernels.

pub mod csv;
pub mod dense;

pub use self::dense::*;
