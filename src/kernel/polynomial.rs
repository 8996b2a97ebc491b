//! Polynomial Kernel Implementation
//!
//! The polynomial kernel over dense real vectors is defined as:
//! K(x, y) = (<x, y> + c)^d / s
//!
//! Where:
//! - d (degree): real exponent of the polynomial
//! - c: 0 for the homogeneous kernel, 1 for the inhomogeneous one
//! - s (scale): normalization factor, 1.0 unless fit from the data
//!
//! With rescaling enabled, `s` is set on init to the mean self-similarity
//! Σ K(x_i, x_i) / m over the first m = min(|lhs|, |rhs|) index pairs, so the
//! average diagonal of the rescaled kernel is 1.
//!
//! A negative dot product raised to a non-integer degree yields NaN. This is
//! passed through unchanged.

use crate::core::{
    DotBackend, FeatureProvider, FeatureType, FeatureVector, KernelConfig, Result, SVMError,
};
use crate::kernel::dot::dot;
use crate::kernel::traits::Kernel;
use log::info;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

/// Polynomial kernel over dense real features
#[derive(Clone)]
pub struct PolyKernel {
    config: KernelConfig,
    scale: f64,
    lhs: Option<Arc<dyn FeatureProvider>>,
    rhs: Option<Arc<dyn FeatureProvider>>,
}

impl PolyKernel {
    /// Creates a new polynomial kernel
    ///
    /// # Arguments
    /// * `degree` - Exponent of the polynomial (must be positive)
    /// * `homogeneous` - Omit the unit bias before exponentiation
    /// * `rescale` - Fit the scale factor from the data on init
    ///
    /// # Examples
    /// ```
    /// use svmkern::kernel::PolyKernel;
    ///
    /// // Inhomogeneous quadratic kernel: (x·y + 1)²
    /// let kernel = PolyKernel::new(2.0, false, false);
    /// assert_eq!(kernel.degree(), 2.0);
    /// assert_eq!(kernel.scale(), 1.0);
    /// ```
    pub fn new(degree: f64, homogeneous: bool, rescale: bool) -> Self {
        assert!(
            degree.is_finite() && degree > 0.0,
            "Polynomial degree must be positive"
        );

        Self::from_config(KernelConfig {
            degree,
            homogeneous,
            rescale,
            ..KernelConfig::default()
        })
    }

    /// Creates a kernel from a configuration, validating it first
    pub fn with_config(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Fallible counterpart of [`PolyKernel::new`]
    pub fn try_new(degree: f64, homogeneous: bool, rescale: bool) -> Result<Self> {
        Self::with_config(KernelConfig {
            degree,
            homogeneous,
            rescale,
            ..KernelConfig::default()
        })
    }

    /// Creates an inhomogeneous quadratic kernel: (x·y + 1)²
    pub fn quadratic() -> Self {
        Self::new(2.0, false, false)
    }

    /// Creates an inhomogeneous cubic kernel: (x·y + 1)³
    pub fn cubic() -> Self {
        Self::new(3.0, false, false)
    }

    fn from_config(config: KernelConfig) -> Self {
        Self {
            config,
            scale: 1.0,
            lhs: None,
            rhs: None,
        }
    }

    /// Select the dot product implementation
    pub fn with_dot_backend(mut self, backend: DotBackend) -> Self {
        self.config.dot_backend = backend;
        self
    }

    /// Set the cache size used by [`PolyKernel::cached`], in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    /// Wrap this kernel in an LRU value cache sized from its configuration
    pub fn cached(self) -> crate::cache::CachedKernel<Self> {
        let cache_size = self.config.cache_size;
        crate::cache::CachedKernel::new(self, cache_size)
    }

    /// Fit the scale factor from the self-similarity of the bound data
    ///
    /// Resets the scale to 1.0, sums K(i, i) for i in 0..min(|lhs|, |rhs|)
    /// and sets scale = sum / count. Returns the new scale.
    ///
    /// The mean is stored as computed, even when it is zero, negative or NaN.
    /// Later `compute` calls divide by it unchanged.
    pub fn init_rescale(&mut self) -> Result<f64> {
        self.scale = 1.0;

        let count = self.num_lhs().min(self.num_rhs());
        if count == 0 {
            return Err(SVMError::EmptyFeatures);
        }

        let mut sum = 0.0;
        for i in 0..count {
            sum += self.compute(i, i)?;
        }

        let scale = sum / count as f64;
        self.scale = scale;
        info!("rescaling kernel by {scale} (sum: {sum} num: {count})");
        Ok(scale)
    }

    /// Degree of the polynomial
    pub fn degree(&self) -> f64 {
        self.config.degree
    }

    /// Whether the unit bias is omitted
    pub fn is_homogeneous(&self) -> bool {
        self.config.homogeneous
    }

    /// Whether the scale is fit on init
    pub fn rescales(&self) -> bool {
        self.config.rescale
    }

    /// Current normalization factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Kernel configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Whether both providers are bound
    pub fn is_initialized(&self) -> bool {
        self.lhs.is_some() && self.rhs.is_some()
    }
}

impl fmt::Debug for PolyKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolyKernel")
            .field("config", &self.config)
            .field("scale", &self.scale)
            .field("num_lhs", &self.num_lhs())
            .field("num_rhs", &self.num_rhs())
            .finish()
    }
}

impl Kernel for PolyKernel {
    fn init(
        &mut self,
        lhs: Arc<dyn FeatureProvider>,
        rhs: Arc<dyn FeatureProvider>,
    ) -> Result<()> {
        for features in [&lhs, &rhs] {
            if !self.check_features(features.as_ref()) {
                return Err(SVMError::FeatureTypeMismatch {
                    expected: FeatureType::Real,
                    actual: features.feature_type(),
                });
            }
        }

        self.lhs = Some(lhs);
        self.rhs = Some(rhs);

        if self.config.rescale {
            self.init_rescale()?;
        }

        Ok(())
    }

    fn cleanup(&mut self) {
        self.lhs = None;
        self.rhs = None;
    }

    fn check_features(&self, features: &dyn FeatureProvider) -> bool {
        features.feature_type() == FeatureType::Real
    }

    fn compute(&self, i: usize, j: usize) -> Result<f64> {
        let (lhs, rhs) = match (&self.lhs, &self.rhs) {
            (Some(lhs), Some(rhs)) => (lhs.as_ref(), rhs.as_ref()),
            _ => return Err(SVMError::NotInitialized),
        };

        let a = FeatureVector::acquire(lhs, i)?;
        let b = FeatureVector::acquire(rhs, j)?;

        assert_eq!(
            a.len(),
            b.len(),
            "Feature vectors {i} and {j} differ in dimensionality"
        );

        let mut result = dot(&a, &b, self.config.dot_backend);

        if !self.config.homogeneous {
            result += 1.0;
        }

        Ok(result.powf(self.config.degree) / self.scale)
    }

    fn load_init(&mut self, _src: &mut dyn Read) -> bool {
        false
    }

    fn save_init(&self, _dest: &mut dyn Write) -> bool {
        false
    }

    fn num_lhs(&self) -> usize {
        self.lhs.as_ref().map_or(0, |f| f.num_vectors())
    }

    fn num_rhs(&self) -> usize {
        self.rhs.as_ref().map_or(0, |f| f.num_vectors())
    }

    fn is_symmetric(&self) -> bool {
        match (&self.lhs, &self.rhs) {
            (Some(lhs), Some(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::DenseFeatures;
    use approx::assert_relative_eq;
    use std::borrow::Cow;

    fn features(rows: &[Vec<f64>]) -> Arc<DenseFeatures> {
        Arc::new(DenseFeatures::from_rows(rows).unwrap())
    }

    fn reference(a: &[f64], b: &[f64], homogeneous: bool, degree: f64, scale: f64) -> f64 {
        let mut sum = 0.0;
        for k in 0..a.len() {
            sum += a[k] * b[k];
        }
        if !homogeneous {
            sum += 1.0;
        }
        sum.powf(degree) / scale
    }

    struct SparseStub;

    impl FeatureProvider for SparseStub {
        fn num_vectors(&self) -> usize {
            1
        }

        fn num_features(&self) -> usize {
            1
        }

        fn feature_type(&self) -> FeatureType {
            FeatureType::Sparse
        }

        fn get_feature_vector(&self, _index: usize) -> Result<Cow<'_, [f64]>> {
            Ok(Cow::Owned(vec![1.0]))
        }
    }

    #[test]
    fn test_poly_kernel_creation() {
        let kernel = PolyKernel::new(3.0, true, true);
        assert_eq!(kernel.degree(), 3.0);
        assert!(kernel.is_homogeneous());
        assert!(kernel.rescales());
        assert_eq!(kernel.scale(), 1.0);
        assert!(!kernel.is_initialized());
        assert_eq!(kernel.config().dot_backend, DotBackend::Manual);
    }

    #[test]
    fn test_quadratic_and_cubic() {
        let quad = PolyKernel::quadratic();
        assert_eq!(quad.degree(), 2.0);
        assert!(!quad.is_homogeneous());

        let cubic = PolyKernel::cubic();
        assert_eq!(cubic.degree(), 3.0);
        assert!(!cubic.rescales());
    }

    #[test]
    fn test_inhomogeneous_computation() {
        let mut kernel = PolyKernel::new(2.0, false, false);
        let lhs = features(&[vec![1.0, 2.0]]);
        let rhs = features(&[vec![2.0, 1.0]]);
        kernel.init(lhs, rhs).unwrap();

        // Dot product: 1*2 + 2*1 = 4
        // Kernel: (4 + 1)² = 25
        assert_relative_eq!(kernel.compute(0, 0).unwrap(), 25.0, epsilon = 1e-10);
    }

    #[test]
    fn test_homogeneous_computation() {
        let mut kernel = PolyKernel::new(3.0, true, false);
        let data = features(&[vec![3.0, 4.0]]);
        kernel.init(data.clone(), data).unwrap();

        // Dot product: 3² + 4² = 25
        // Kernel: 25³ = 15625
        assert_relative_eq!(kernel.compute(0, 0).unwrap(), 15625.0, epsilon = 1e-6);
    }

    #[test]
    fn test_matches_reference_loop() {
        let rows: Vec<Vec<f64>> = (0..6)
            .map(|r| (0..7).map(|k| ((r * 7 + k) as f64 * 0.3).sin()).collect())
            .collect();
        let data = features(&rows);

        for backend in [DotBackend::Manual, DotBackend::Unrolled] {
            for homogeneous in [true, false] {
                let mut kernel = PolyKernel::new(3.0, homogeneous, false).with_dot_backend(backend);
                kernel.init(data.clone(), data.clone()).unwrap();

                for i in 0..rows.len() {
                    for j in 0..rows.len() {
                        let expected = reference(&rows[i], &rows[j], homogeneous, 3.0, 1.0);
                        let actual = kernel.compute(i, j).unwrap();
                        assert_relative_eq!(actual, expected, max_relative = 1e-9, epsilon = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_symmetry() {
        let data = features(&[vec![1.0, -2.0, 0.5], vec![0.3, 0.7, -1.1]]);
        let mut kernel = PolyKernel::new(2.0, false, false);
        kernel.init(data.clone(), data).unwrap();
        assert!(kernel.is_symmetric());
        assert_relative_eq!(
            kernel.compute(0, 1).unwrap(),
            kernel.compute(1, 0).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rescale_reconstructs_sum() {
        let rows = vec![vec![1.0, 2.0], vec![0.5, -1.0], vec![3.0, 0.0]];
        let data = features(&rows);
        let mut kernel = PolyKernel::new(2.0, false, true);
        kernel.init(data.clone(), data).unwrap();

        let raw_sum: f64 = rows
            .iter()
            .map(|r| reference(r, r, false, 2.0, 1.0))
            .sum();
        // (5+1)² + (1.25+1)² + (9+1)² = 36 + 5.0625 + 100
        assert_relative_eq!(raw_sum, 141.0625, epsilon = 1e-12);
        assert_relative_eq!(kernel.scale(), raw_sum / 3.0, epsilon = 1e-12);

        let rescaled_sum: f64 = (0..3).map(|i| kernel.compute(i, i).unwrap()).sum();
        assert_relative_eq!(rescaled_sum * kernel.scale(), raw_sum, max_relative = 1e-12);
        assert_relative_eq!(rescaled_sum, 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rescale_uses_overlapping_range() {
        let lhs = features(&[vec![1.0], vec![2.0], vec![3.0]]);
        let rhs = features(&[vec![1.0], vec![2.0]]);
        let mut kernel = PolyKernel::new(1.0, true, true);
        kernel.init(lhs, rhs).unwrap();

        // m = 2: (1*1 + 2*2) / 2
        assert_relative_eq!(kernel.scale(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rescale_is_idempotent() {
        let data = features(&[vec![1.0, 1.0], vec![2.0, 0.0]]);
        let mut kernel = PolyKernel::new(2.0, false, true);
        kernel.init(data.clone(), data.clone()).unwrap();
        let first = kernel.scale();

        kernel.init(data.clone(), data).unwrap();
        assert_relative_eq!(kernel.scale(), first, epsilon = 1e-12);
        assert_relative_eq!(kernel.init_rescale().unwrap(), first, epsilon = 1e-12);
    }

    #[test]
    fn test_rescale_empty_features() {
        let empty = features(&[]);
        let mut kernel = PolyKernel::new(2.0, false, true);
        let err = kernel.init(empty.clone(), empty).unwrap_err();
        assert!(matches!(err, SVMError::EmptyFeatures));
        assert_eq!(kernel.scale(), 1.0);
    }

    #[test]
    fn test_rescale_negative_scale_passes_through() {
        let lhs = features(&[vec![1.0]]);
        let rhs = features(&[vec![-2.0]]);
        let mut kernel = PolyKernel::new(1.0, true, true);
        kernel.init(lhs, rhs).unwrap();

        assert_relative_eq!(kernel.scale(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(kernel.compute(0, 0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rescale_zero_and_nan_scale_pass_through() {
        let zeros = features(&[vec![0.0, 0.0]]);
        let mut kernel = PolyKernel::new(2.0, true, true);
        kernel.init(zeros.clone(), zeros).unwrap();
        assert_eq!(kernel.scale(), 0.0);
        assert!(kernel.compute(0, 0).unwrap().is_nan());

        let lhs = features(&[vec![1.0]]);
        let rhs = features(&[vec![-2.0]]);
        let mut kernel = PolyKernel::new(1.5, true, true);
        kernel.init(lhs, rhs).unwrap();
        assert!(kernel.scale().is_nan());
    }

    #[test]
    fn test_feature_type_mismatch() {
        let mut kernel = PolyKernel::new(2.0, false, false);
        let dense = features(&[vec![1.0]]);
        let err = kernel.init(dense, Arc::new(SparseStub)).unwrap_err();
        assert!(matches!(
            err,
            SVMError::FeatureTypeMismatch {
                expected: FeatureType::Real,
                actual: FeatureType::Sparse
            }
        ));
        assert!(!kernel.is_initialized());
        assert!(!kernel.check_features(&SparseStub));
    }

    #[test]
    fn test_compute_requires_init() {
        let kernel = PolyKernel::new(2.0, false, false);
        assert!(matches!(kernel.compute(0, 0), Err(SVMError::NotInitialized)));
    }

    #[test]
    fn test_cleanup_unbinds() {
        let data = features(&[vec![1.0]]);
        let mut kernel = PolyKernel::new(2.0, false, false);
        kernel.init(data.clone(), data.clone()).unwrap();
        assert_eq!(kernel.num_lhs(), 1);

        kernel.cleanup();
        assert!(!kernel.is_initialized());
        assert_eq!(kernel.num_lhs(), 0);
        assert_eq!(Arc::strong_count(&data), 1);
        assert!(matches!(kernel.compute(0, 0), Err(SVMError::NotInitialized)));
    }

    #[test]
    fn test_compute_releases_vectors() {
        let data = features(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let mut kernel = PolyKernel::new(2.0, false, false);
        kernel.init(data.clone(), data.clone()).unwrap();

        kernel.compute(0, 1).unwrap();
        assert_eq!(data.outstanding(), 0);

        // Left fetch succeeds, right fetch fails: the left vector is still released
        assert!(kernel.compute(0, 9).is_err());
        assert_eq!(data.outstanding(), 0);
    }

    #[test]
    fn test_length_mismatch_panics_and_releases() {
        let lhs = features(&[vec![1.0, 2.0]]);
        let rhs = features(&[vec![1.0, 2.0, 3.0]]);
        let mut kernel = PolyKernel::new(2.0, false, false);
        kernel.init(lhs.clone(), rhs.clone()).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| kernel.compute(0, 0)));
        assert!(result.is_err());
        assert_eq!(lhs.outstanding(), 0);
        assert_eq!(rhs.outstanding(), 0);
    }

    #[test]
    fn test_non_integer_degree_negative_dot_is_nan() {
        let lhs = features(&[vec![1.0]]);
        let rhs = features(&[vec![-2.0]]);
        let mut kernel = PolyKernel::new(1.5, true, false);
        kernel.init(lhs, rhs).unwrap();
        assert!(kernel.compute(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_integer_degree_negative_dot() {
        let lhs = features(&[vec![1.0]]);
        let rhs = features(&[vec![-3.0]]);
        let mut kernel = PolyKernel::new(3.0, false, false);
        kernel.init(lhs, rhs).unwrap();
        // (-3 + 1)³ = -8
        assert_relative_eq!(kernel.compute(0, 0).unwrap(), -8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_persistence_unsupported() {
        let mut kernel = PolyKernel::new(2.0, false, false);
        let mut buf: Vec<u8> = Vec::new();
        assert!(!kernel.save_init(&mut buf));
        assert!(!kernel.load_init(&mut std::io::empty()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_kernel_matrix() {
        let lhs = features(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]);
        let rhs = features(&[vec![1.0, 1.0], vec![2.0, 0.0]]);
        let mut kernel = PolyKernel::new(2.0, false, false);
        kernel.init(lhs, rhs).unwrap();

        let matrix = kernel.kernel_matrix().unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix[0].len(), 2);
        assert_relative_eq!(matrix[0][0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[0][1], 9.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[2][0], 9.0, epsilon = 1e-12);
        assert!(!kernel.is_symmetric());
    }

    #[test]
    fn test_try_new_rejects_bad_degree() {
        assert!(PolyKernel::try_new(0.0, false, false).is_err());
        assert!(PolyKernel::try_new(-2.0, true, false).is_err());
        assert!(PolyKernel::try_new(2.5, true, false).is_ok());
    }

    #[test]
    #[should_panic(expected = "Polynomial degree must be positive")]
    fn test_invalid_degree() {
        PolyKernel::new(0.0, false, false);
    }
}
