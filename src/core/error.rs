//! Error types for kernel evaluation and label handling

use crate::core::{FeatureType, LabelType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Feature type mismatch: expected {expected:?}, got {actual:?}")]
    FeatureTypeMismatch {
        expected: FeatureType,
        actual: FeatureType,
    },

    #[error("Cannot rescale kernel: no feature vectors available")]
    EmptyFeatures,

    #[error("Kernel not initialized")]
    NotInitialized,

    #[error("Index {index} out of bounds for {len} vectors")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("{context}Not a two class labeling label[{index}]={value} (only +1/-1 allowed)")]
    InvalidLabel {
        index: usize,
        value: f64,
        context: String,
    },

    #[error("scores_to_probabilities() requires values vector")]
    MissingValues,

    #[error("Not implemented for label type {0:?}")]
    NotImplemented(LabelType),

    #[error("Cannot convert {from:?} to binary labels: {source}")]
    ConversionFailed {
        from: LabelType,
        #[source]
        source: Box<SVMError>,
    },

    #[error("Subset index {index} out of range for {len} visible entries")]
    InvalidSubset { index: usize, len: usize },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SVMError>;
