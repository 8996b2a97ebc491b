//! Core type definitions shared by kernels and labels

use serde::{Deserialize, Serialize};

/// Storage type reported by a feature provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// Dense 64-bit real vectors
    Real,
    /// Dense 32-bit real vectors
    ShortReal,
    /// Sparse real vectors
    Sparse,
    /// String features
    String,
}

/// Discriminant for label containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelType {
    /// Two-class labels, every entry is +1 or -1
    Binary,
    /// Dense real labels without a class constraint
    DenseGeneric,
    /// Real-valued regression targets
    Regression,
}

/// Dot product implementation used by kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotBackend {
    /// Single sequential accumulator
    #[default]
    Manual,
    /// Four independent accumulators over chunks of the input
    Unrolled,
}

/// Configuration for the polynomial kernel
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Exponent applied to the (biased) dot product
    pub degree: f64,
    /// Skip the unit bias before exponentiation
    pub homogeneous: bool,
    /// Fit a scale factor from the self-similarity of the data on init
    pub rescale: bool,
    /// Kernel cache size in bytes
    pub cache_size: usize,
    /// Dot product implementation
    pub dot_backend: DotBackend,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            degree: 2.0,
            homogeneous: false,
            rescale: false,
            cache_size: 10_000_000, // 10MB
            dot_backend: DotBackend::Manual,
        }
    }
}

impl KernelConfig {
    /// Check that the configuration describes a usable kernel
    pub fn validate(&self) -> crate::core::Result<()> {
        if !(self.degree.is_finite() && self.degree > 0.0) {
            return Err(crate::core::SVMError::InvalidParameter(format!(
                "Polynomial degree must be positive and finite, got {}",
                self.degree
            )));
        }
        Ok(())
    }
}
