//! Polynomial kernel engine and binary label containers for SVM pipelines
//!
//! Kernels evaluate similarities between indexed vectors of two feature
//! providers. Binary labels hold ±1 targets with optional classifier scores
//! that can be calibrated into probabilities with Platt scaling.

pub mod cache;
pub mod core;
pub mod features;
pub mod kernel;
pub mod labels;
pub mod persistence;
pub mod stats;

// Re-export main types for convenience
pub use crate::cache::{CacheStats, CachedKernel, KernelCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::features::DenseFeatures;
pub use crate::kernel::{Kernel, PolyKernel};
pub use crate::labels::{
    binary_from_binary, binary_from_dense, binary_labels, BinaryLabels, DenseLabels, Labels,
};
pub use crate::stats::{fit_sigmoid, SigmoidParams};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
