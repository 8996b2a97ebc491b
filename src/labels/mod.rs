//! Label containers
//!
//! Labels are shared through `Arc` handles. A container owns its storage and
//! its subset stack; neither is shared between containers.

pub mod binary;
pub mod dense;
pub mod subset;

pub use self::binary::*;
pub use self::dense::*;
pub use self::subset::*;

use crate::core::LabelType;
use std::sync::Arc;

/// Any label container, tagged by its type
#[derive(Debug, Clone)]
pub enum Labels {
    Binary(Arc<BinaryLabels>),
    DenseGeneric(Arc<DenseLabels>),
    Regression(Arc<DenseLabels>),
}

impl Labels {
    /// Type tag of the wrapped container
    pub fn label_type(&self) -> LabelType {
        match self {
            Labels::Binary(_) => LabelType::Binary,
            Labels::DenseGeneric(_) => LabelType::DenseGeneric,
            Labels::Regression(_) => LabelType::Regression,
        }
    }

    /// Number of visible labels
    pub fn num_labels(&self) -> usize {
        match self {
            Labels::Binary(labels) => labels.num_labels(),
            Labels::DenseGeneric(labels) | Labels::Regression(labels) => labels.num_labels(),
        }
    }
}

impl From<BinaryLabels> for Labels {
    fn from(labels: BinaryLabels) -> Self {
        Labels::Binary(Arc::new(labels))
    }
}

impl From<DenseLabels> for Labels {
    fn from(labels: DenseLabels) -> Self {
        Labels::DenseGeneric(Arc::new(labels))
    }
}
