//! Dense real-valued labels with optional confidence values

use crate::core::{LabelType, Result, SVMError};
use crate::labels::subset::SubsetStack;

/// Dense label vector, parallel confidence values and a subset view
///
/// Storage is never reordered. Subsets only change which entries are visible
/// through the accessors that take visible positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseLabels {
    labels: Vec<f64>,
    values: Option<Vec<f64>>,
    subsets: SubsetStack,
}

impl DenseLabels {
    /// Create labels without confidence values
    pub fn new(labels: Vec<f64>) -> Self {
        Self {
            labels,
            values: None,
            subsets: SubsetStack::new(),
        }
    }

    /// Create labels from storage whose values, if any, match in length
    pub(crate) fn from_parts(labels: Vec<f64>, values: Option<Vec<f64>>) -> Self {
        debug_assert!(values.as_ref().map_or(true, |v| v.len() == labels.len()));
        Self {
            labels,
            values,
            subsets: SubsetStack::new(),
        }
    }

    /// Create `num_labels` zero labels
    pub fn with_len(num_labels: usize) -> Self {
        Self::new(vec![0.0; num_labels])
    }

    /// Create labels with a parallel value vector
    pub fn with_values(labels: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        let mut result = Self::new(labels);
        result.set_values(values)?;
        Ok(result)
    }

    /// Label type tag
    pub fn label_type(&self) -> LabelType {
        LabelType::DenseGeneric
    }

    /// Number of visible labels
    pub fn num_labels(&self) -> usize {
        self.subsets.num_visible(self.labels.len())
    }

    /// Check if no label is visible
    pub fn is_empty(&self) -> bool {
        self.num_labels() == 0
    }

    /// Label at visible position `i`
    pub fn label(&self, i: usize) -> Option<f64> {
        if i >= self.num_labels() {
            return None;
        }
        Some(self.labels[self.subsets.subset_idx_conversion(i)])
    }

    /// Overwrite the label at visible position `i`
    pub fn set_label(&mut self, i: usize, label: f64) -> Result<()> {
        let len = self.num_labels();
        if i >= len {
            return Err(SVMError::IndexOutOfBounds { index: i, len });
        }
        let real_i = self.subsets.subset_idx_conversion(i);
        self.labels[real_i] = label;
        Ok(())
    }

    /// Copy of the visible labels, in visible order
    pub fn labels(&self) -> Vec<f64> {
        (0..self.num_labels())
            .map(|i| self.labels[self.subsets.subset_idx_conversion(i)])
            .collect()
    }

    /// Underlying label storage, ignoring subsets
    pub fn raw_labels(&self) -> &[f64] {
        &self.labels
    }

    /// Replace the label storage
    ///
    /// Not allowed while a subset is active. Values of a different length are dropped.
    pub fn set_labels(&mut self, labels: Vec<f64>) -> Result<()> {
        if self.subsets.has_subsets() {
            return Err(SVMError::InvalidParameter(
                "A subset is set, cannot set labels".to_string(),
            ));
        }
        if self.values.as_ref().is_some_and(|v| v.len() != labels.len()) {
            self.values = None;
        }
        self.labels = labels;
        Ok(())
    }

    /// Copy of the visible values, if values are set
    pub fn values(&self) -> Option<Vec<f64>> {
        let values = self.values.as_ref()?;
        Some(
            (0..self.num_labels())
                .map(|i| values[self.subsets.subset_idx_conversion(i)])
                .collect(),
        )
    }

    /// Underlying value storage, ignoring subsets
    pub fn raw_values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    pub(crate) fn raw_values_mut(&mut self) -> Option<&mut [f64]> {
        self.values.as_deref_mut()
    }

    /// Set the value vector, which must match the label storage in length
    pub fn set_values(&mut self, values: Vec<f64>) -> Result<()> {
        if values.len() != self.labels.len() {
            return Err(SVMError::LengthMismatch {
                expected: self.labels.len(),
                actual: values.len(),
            });
        }
        self.values = Some(values);
        Ok(())
    }

    /// Remove the value vector
    pub fn clear_values(&mut self) {
        self.values = None;
    }

    /// Restrict the visible labels to `indices` of the current view
    pub fn add_subset(&mut self, indices: &[usize]) -> Result<()> {
        self.subsets.add_subset(indices, self.labels.len())
    }

    /// Drop the most recent subset
    pub fn remove_subset(&mut self) {
        self.subsets.remove_subset();
    }

    /// Drop every subset
    pub fn remove_all_subsets(&mut self) {
        self.subsets.remove_all_subsets();
    }

    /// Subset stack of this container
    pub fn subset_stack(&self) -> &SubsetStack {
        &self.subsets
    }

    /// Check storage consistency
    pub fn ensure_valid(&self) -> Result<()> {
        if let Some(values) = &self.values {
            if values.len() != self.labels.len() {
                return Err(SVMError::LengthMismatch {
                    expected: self.labels.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }
}
