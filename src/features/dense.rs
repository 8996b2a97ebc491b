//! In-memory dense real feature matrix

use crate::core::{FeatureProvider, FeatureType, Result, SVMError};
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Row-major dense feature matrix
///
/// Each row is one feature vector of `num_features` reals. With unit
/// normalization enabled, every fetch materializes a scaled copy of the row
/// instead of borrowing the stored one.
#[derive(Debug)]
pub struct DenseFeatures {
    data: Vec<f64>,
    num_features: usize,
    num_vectors: usize,
    normalize: bool,
    outstanding: AtomicUsize,
}

impl DenseFeatures {
    /// Create a feature matrix from row-major data
    pub fn new(data: Vec<f64>, num_features: usize) -> Result<Self> {
        if num_features == 0 {
            if !data.is_empty() {
                return Err(SVMError::InvalidParameter(
                    "Zero-width feature matrix cannot hold data".to_string(),
                ));
            }
            return Ok(Self::from_parts(data, 0, 0));
        }

        if data.len() % num_features != 0 {
            return Err(SVMError::LengthMismatch {
                expected: (data.len() / num_features + 1) * num_features,
                actual: data.len(),
            });
        }

        let num_vectors = data.len() / num_features;
        Ok(Self::from_parts(data, num_features, num_vectors))
    }

    /// Create a feature matrix from equally sized rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let num_features = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * num_features);

        for row in rows {
            if row.len() != num_features {
                return Err(SVMError::LengthMismatch {
                    expected: num_features,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self::from_parts(data, num_features, rows.len()))
    }

    fn from_parts(data: Vec<f64>, num_features: usize, num_vectors: usize) -> Self {
        Self {
            data,
            num_features,
            num_vectors,
            normalize: false,
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Scale every fetched vector to unit L2 norm (zero vectors stay zero)
    pub fn with_unit_norm(mut self) -> Self {
        self.normalize = true;
        self
    }

    /// Stored row at `index`, without going through the fetch path
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.num_vectors {
            return None;
        }
        let start = index * self.num_features;
        Some(&self.data[start..start + self.num_features])
    }

    /// Number of fetched vectors not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

impl FeatureProvider for DenseFeatures {
    fn num_vectors(&self) -> usize {
        self.num_vectors
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn feature_type(&self) -> FeatureType {
        FeatureType::Real
    }

    fn get_feature_vector(&self, index: usize) -> Result<Cow<'_, [f64]>> {
        let row = self.row(index).ok_or(SVMError::IndexOutOfBounds {
            index,
            len: self.num_vectors,
        })?;

        self.outstanding.fetch_add(1, Ordering::SeqCst);

        if self.normalize {
            let norm = row.iter().map(|&v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                return Ok(Cow::Owned(row.iter().map(|&v| v / norm).collect()));
            }
        }

        Ok(Cow::Borrowed(row))
    }

    fn free_feature_vector(&self, _index: usize, vector: Cow<'_, [f64]>) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        drop(vector);
    }
}
