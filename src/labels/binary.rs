//! Binary labels with score-to-probability calibration
//!
//! Every label of a valid [`BinaryLabels`] container is exactly +1.0 or -1.0.
//! The optional value vector holds real-valued classifier outputs (or
//! confidences) for each example and can be calibrated in place into
//! probabilities with a fitted sigmoid.

use crate::core::{LabelType, Result, SVMError};
use crate::labels::dense::DenseLabels;
use crate::labels::Labels;
use crate::stats;
use log::{debug, warn};
use std::sync::Arc;

const NAME: &str = "BinaryLabels";

/// Two-class labels (+1 / -1) with optional confidence values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryLabels {
    dense: DenseLabels,
}

impl BinaryLabels {
    /// Create `num_labels` zero labels, to be filled in later
    pub fn with_len(num_labels: usize) -> Self {
        Self {
            dense: DenseLabels::with_len(num_labels),
        }
    }

    /// Create labels from a float vector, without values
    pub fn from_labels(labels: Vec<f64>) -> Self {
        Self {
            dense: DenseLabels::new(labels),
        }
    }

    /// Create labels from integer labels; values equal the labels
    pub fn from_int_labels(src: &[i32]) -> Self {
        let labels: Vec<f64> = src.iter().map(|&l| f64::from(l)).collect();
        Self::with_equal_values(labels)
    }

    /// Create labels from 64-bit integer labels; values equal the labels
    pub fn from_i64_labels(src: &[i64]) -> Self {
        let labels: Vec<f64> = src.iter().map(|&l| l as f64).collect();
        Self::with_equal_values(labels)
    }

    fn with_equal_values(labels: Vec<f64>) -> Self {
        let values = labels.clone();
        Self {
            dense: DenseLabels::from_parts(labels, Some(values)),
        }
    }

    /// Binarize `scores` at `threshold`: +1 where score >= threshold, else -1
    ///
    /// The scores are kept as values.
    ///
    /// # Examples
    /// ```
    /// use svmkern::labels::BinaryLabels;
    ///
    /// let labels = BinaryLabels::from_scores(&[0.2, 0.6, -0.1], 0.5);
    /// assert_eq!(labels.labels(), vec![-1.0, 1.0, -1.0]);
    /// assert_eq!(labels.values(), Some(vec![0.2, 0.6, -0.1]));
    /// ```
    pub fn from_scores(scores: &[f64], threshold: f64) -> Self {
        let labels = scores
            .iter()
            .map(|&s| if s >= threshold { 1.0 } else { -1.0 })
            .collect();
        Self {
            dense: DenseLabels::from_parts(labels, Some(scores.to_vec())),
        }
    }

    pub(crate) fn from_dense(dense: DenseLabels) -> Self {
        Self { dense }
    }

    /// Label type tag
    pub fn label_type(&self) -> LabelType {
        LabelType::Binary
    }

    /// Check that every visible label is +1 or -1
    ///
    /// A label of any other value is an error naming its visible index. A
    /// missing class only produces a warning.
    ///
    /// With no visible labels both the positive and negative warnings fire.
    pub fn ensure_valid(&self, context: Option<&str>) -> Result<()> {
        self.dense.ensure_valid()?;

        let prefix = match context {
            Some(ctx) => format!("{ctx}: {NAME}::ensure_valid(): "),
            None => format!("{NAME}::ensure_valid(): "),
        };

        let mut found_plus_one = false;
        let mut found_minus_one = false;

        for i in 0..self.dense.num_labels() {
            let real_i = self.dense.subset_stack().subset_idx_conversion(i);
            let label = self.dense.raw_labels()[real_i];

            if label == 1.0 {
                found_plus_one = true;
            } else if label == -1.0 {
                found_minus_one = true;
            } else {
                return Err(SVMError::InvalidLabel {
                    index: i,
                    value: label,
                    context: prefix,
                });
            }
        }

        if !found_plus_one {
            warn!("{prefix}Not a two class labeling - no positively labeled examples found");
        }

        if !found_minus_one {
            warn!("{prefix}Not a two class labeling - no negatively labeled examples found");
        }

        Ok(())
    }

    /// Convert the values into probabilities of the positive class
    ///
    /// With `a == 0 && b == 0` the sigmoid is fit to the current values
    /// first. Every value v becomes 1 / (1 + exp(v * a + b)).
    pub fn scores_to_probabilities(&mut self, a: f64, b: f64) -> Result<()> {
        debug!("entering {NAME}::scores_to_probabilities()");

        let values = self.dense.raw_values_mut().ok_or(SVMError::MissingValues)?;

        let (a, b) = if a == 0.0 && b == 0.0 {
            let params = stats::fit_sigmoid(values)?;
            (params.a, params.b)
        } else {
            (a, b)
        };

        debug!("using sigmoid: a={a}, b={b}");

        for value in values.iter_mut() {
            *value = stats::logistic(*value * a + b);
        }

        debug!("leaving {NAME}::scores_to_probabilities()");
        Ok(())
    }

    /// New container over a copy of the label storage
    ///
    /// If a subset is active, only the last one on the stack is applied to
    /// the copy. Values are not copied.
    pub fn shallow_subset_copy(&self) -> Result<Arc<BinaryLabels>> {
        let mut copy = BinaryLabels::from_labels(self.dense.raw_labels().to_vec());

        if let Some(subset) = self.dense.subset_stack().last_subset() {
            copy.dense.add_subset(subset.subset_idx())?;
        }

        Ok(Arc::new(copy))
    }

    /// Visible labels as integers
    pub fn int_labels(&self) -> Vec<i32> {
        self.dense.labels().iter().map(|&l| l as i32).collect()
    }

    /// Number of visible labels
    pub fn num_labels(&self) -> usize {
        self.dense.num_labels()
    }

    /// Check if no label is visible
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Label at visible position `i`
    pub fn label(&self, i: usize) -> Option<f64> {
        self.dense.label(i)
    }

    /// Copy of the visible labels
    pub fn labels(&self) -> Vec<f64> {
        self.dense.labels()
    }

    /// Copy of the visible values, if set
    pub fn values(&self) -> Option<Vec<f64>> {
        self.dense.values()
    }

    /// Set the value vector
    pub fn set_values(&mut self, values: Vec<f64>) -> Result<()> {
        self.dense.set_values(values)
    }

    /// Restrict the visible labels to `indices` of the current view
    pub fn add_subset(&mut self, indices: &[usize]) -> Result<()> {
        self.dense.add_subset(indices)
    }

    /// Drop the most recent subset
    pub fn remove_subset(&mut self) {
        self.dense.remove_subset();
    }

    /// Drop every subset
    pub fn remove_all_subsets(&mut self) {
        self.dense.remove_all_subsets();
    }

    /// Underlying dense labels
    pub fn as_dense(&self) -> &DenseLabels {
        &self.dense
    }

    /// Mutable access to the underlying dense labels
    pub fn as_dense_mut(&mut self) -> &mut DenseLabels {
        &mut self.dense
    }
}

/// Identity conversion, sharing the same container
pub fn binary_from_binary(orig: Arc<BinaryLabels>) -> Arc<BinaryLabels> {
    orig
}

/// Build binary labels from the visible entries of dense labels
///
/// Every visible label must be exactly +1.0 or -1.0.
pub fn binary_from_dense(orig: &DenseLabels) -> Result<Arc<BinaryLabels>> {
    let labels = orig.labels();
    for (i, &label) in labels.iter().enumerate() {
        if label != 1.0 && label != -1.0 {
            return Err(SVMError::InvalidLabel {
                index: i,
                value: label,
                context: String::new(),
            });
        }
    }

    let dense = DenseLabels::from_parts(labels, orig.values());
    Ok(Arc::new(BinaryLabels::from_dense(dense)))
}

/// Convert any label container into binary labels
pub fn binary_labels(orig: &Labels) -> Result<Arc<BinaryLabels>> {
    let result = match orig {
        Labels::Binary(binary) => Ok(binary_from_binary(Arc::clone(binary))),
        Labels::DenseGeneric(dense) => binary_from_dense(dense),
        Labels::Regression(_) => Err(SVMError::NotImplemented(orig.label_type())),
    };

    result.map_err(|e| SVMError::ConversionFailed {
        from: orig.label_type(),
        source: Box::new(e),
    })
}
