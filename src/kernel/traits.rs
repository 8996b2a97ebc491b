//! Kernel trait definition

use crate::core::{FeatureProvider, Result};
use std::io::{Read, Write};
use std::sync::Arc;

/// Kernel over two indexed feature providers
///
/// A kernel is bound to a left-hand and a right-hand provider with
/// [`Kernel::init`] and evaluates K(lhs\[i\], rhs\[j\]) by index.
pub trait Kernel: Send + Sync {
    /// Bind the kernel to `lhs` and `rhs`, replacing any previous binding
    fn init(&mut self, lhs: Arc<dyn FeatureProvider>, rhs: Arc<dyn FeatureProvider>)
        -> Result<()>;

    /// Release the provider bindings
    fn cleanup(&mut self);

    /// Check whether `features` can be consumed by this kernel
    fn check_features(&self, features: &dyn FeatureProvider) -> bool;

    /// Compute kernel value K(lhs\[i\], rhs\[j\])
    fn compute(&self, i: usize, j: usize) -> Result<f64>;

    /// Restore kernel initialization state from `src`
    fn load_init(&mut self, src: &mut dyn Read) -> bool;

    /// Store kernel initialization state to `dest`
    fn save_init(&self, dest: &mut dyn Write) -> bool;

    /// Number of vectors on the left-hand side (0 when unbound)
    fn num_lhs(&self) -> usize;

    /// Number of vectors on the right-hand side (0 when unbound)
    fn num_rhs(&self) -> usize;

    /// True when both sides are bound to the same provider
    fn is_symmetric(&self) -> bool {
        false
    }

    /// Full kernel matrix, one row per left-hand vector
    fn kernel_matrix(&self) -> Result<Vec<Vec<f64>>> {
        (0..self.num_lhs())
            .map(|i| {
                (0..self.num_rhs())
                    .map(|j| self.compute(i, j))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }
}
