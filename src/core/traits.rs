//! Core traits for feature access

use crate::core::{FeatureType, Result};
use std::borrow::Cow;
use std::ops::Deref;

/// Indexed source of dense real feature vectors
///
/// Kernels never own the vectors they read. Each access goes through
/// [`FeatureVector::acquire`], which hands the buffer back to the provider
/// via [`FeatureProvider::free_feature_vector`] when it goes out of scope.
pub trait FeatureProvider: Send + Sync {
    /// Number of feature vectors
    fn num_vectors(&self) -> usize;

    /// Dimensionality of every vector
    fn num_features(&self) -> usize;

    /// Storage type of the vectors
    fn feature_type(&self) -> FeatureType;

    /// Borrow or materialize the vector at `index`
    fn get_feature_vector(&self, index: usize) -> Result<Cow<'_, [f64]>>;

    /// Return a buffer obtained from `get_feature_vector`
    ///
    /// Borrowed and owned buffers are both passed here; the default simply drops it.
    fn free_feature_vector(&self, _index: usize, _vector: Cow<'_, [f64]>) {}

    /// Check if the provider holds no vectors
    fn is_empty(&self) -> bool {
        self.num_vectors() == 0
    }
}

/// Scoped feature vector, released back to its provider on drop
pub struct FeatureVector<'a> {
    provider: &'a dyn FeatureProvider,
    index: usize,
    data: Option<Cow<'a, [f64]>>,
}

impl<'a> FeatureVector<'a> {
    /// Fetch vector `index` from `provider`
    pub fn acquire(provider: &'a dyn FeatureProvider, index: usize) -> Result<Self> {
        let data = provider.get_feature_vector(index)?;
        Ok(Self {
            provider,
            index,
            data: Some(data),
        })
    }

    /// Index this vector was fetched from
    pub fn index(&self) -> usize {
        self.index
    }

    /// True if the provider materialized a fresh buffer for this access
    pub fn is_owned(&self) -> bool {
        matches!(self.data, Some(Cow::Owned(_)))
    }
}

impl Deref for FeatureVector<'_> {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        self.data.as_deref().unwrap_or(&[])
    }
}

impl Drop for FeatureVector<'_> {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            self.provider.free_feature_vector(self.index, data);
        }
    }
}
