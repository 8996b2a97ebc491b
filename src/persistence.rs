//! Label serialization and persistence
//!
//! Label containers are stored as JSON with their raw storage and metadata.
//! Subsets are a view and are not saved. Kernels keep no persistent state.

use crate::core::{LabelType, Result, SVMError};
use crate::labels::{binary_labels, BinaryLabels, DenseLabels, Labels};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Serializable representation of a label container
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableLabels {
    /// Label type tag
    pub label_type: LabelType,
    /// Raw label storage
    pub labels: Vec<f64>,
    /// Raw value storage, if any
    pub values: Option<Vec<f64>>,
    /// File metadata
    pub metadata: LabelMetadata,
}

/// Metadata for tracking and validation
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelMetadata {
    /// Library version used to write the file
    pub library_version: String,
    /// Number of stored labels
    pub num_labels: usize,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableLabels {
    fn from_dense(label_type: LabelType, dense: &DenseLabels) -> Self {
        Self {
            label_type,
            labels: dense.raw_labels().to_vec(),
            values: dense.raw_values().map(<[f64]>::to_vec),
            metadata: LabelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                num_labels: dense.raw_labels().len(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Create a serializable copy of any label container
    pub fn from_labels(labels: &Labels) -> Self {
        match labels {
            Labels::Binary(binary) => Self::from_dense(LabelType::Binary, binary.as_dense()),
            Labels::DenseGeneric(dense) => Self::from_dense(LabelType::DenseGeneric, dense),
            Labels::Regression(dense) => Self::from_dense(LabelType::Regression, dense),
        }
    }

    /// Create a serializable copy of binary labels
    pub fn from_binary(labels: &BinaryLabels) -> Self {
        Self::from_dense(LabelType::Binary, labels.as_dense())
    }

    /// Rebuild the label container
    pub fn to_labels(&self) -> Result<Labels> {
        if self.metadata.num_labels != self.labels.len() {
            return Err(SVMError::LengthMismatch {
                expected: self.metadata.num_labels,
                actual: self.labels.len(),
            });
        }

        let mut dense = DenseLabels::new(self.labels.clone());
        if let Some(values) = &self.values {
            dense.set_values(values.clone())?;
        }

        Ok(match self.label_type {
            LabelType::Binary => Labels::Binary(Arc::new(BinaryLabels::from_dense(dense))),
            LabelType::DenseGeneric => Labels::DenseGeneric(Arc::new(dense)),
            LabelType::Regression => Labels::Regression(Arc::new(dense)),
        })
    }

    /// Write as JSON to `writer`
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read JSON from `reader`
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(SVMError::IoError)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl BinaryLabels {
    /// Load binary labels from a JSON label file
    ///
    /// Dense labels of the right shape are converted; any other stored type fails.
    pub fn from_loader<R: Read>(reader: R) -> Result<Arc<BinaryLabels>> {
        let stored = SerializableLabels::from_reader(reader)?;
        binary_labels(&stored.to_labels()?)
    }
}
