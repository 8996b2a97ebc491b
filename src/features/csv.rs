//! CSV loading for dense feature matrices
//!
//! Every column is a feature. The first row may be a header (automatically
//! detected), blank lines and `#` comments are skipped.

use crate::core::{Result, SVMError};
use crate::features::DenseFeatures;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl DenseFeatures {
    /// Load a feature matrix from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a feature matrix from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut seen_data = false;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if !seen_data && is_header_line(line) {
                seen_data = true;
                continue;
            }
            seen_data = true;

            let row = parse_row(line).map_err(|e| {
                SVMError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(SVMError::ParseError(format!(
                        "Line {} has {} columns, expected {}",
                        line_num + 1,
                        row.len(),
                        first.len()
                    )));
                }
            }

            rows.push(row);
        }

        Self::from_rows(&rows)
    }
}

/// Check if a line appears to be a header
fn is_header_line(line: &str) -> bool {
    let fields: Vec<&str> = line.split(',').collect();
    let non_numeric_count = fields
        .iter()
        .filter(|field| field.trim().parse::<f64>().is_err())
        .count();

    non_numeric_count * 2 > fields.len()
}

fn parse_row(line: &str) -> std::result::Result<Vec<f64>, String> {
    line.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(col, field)| {
            field
                .parse::<f64>()
                .map_err(|_| format!("Invalid feature value at column {}: {}", col + 1, field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FeatureProvider;
    use std::io::Cursor;

    #[test]
    fn test_csv_with_header() {
        let data = "x,y,z\n1.0,2.0,3.0\n4.0,5.0,6.0\n";
        let features = DenseFeatures::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(features.num_vectors(), 2);
        assert_eq!(features.num_features(), 3);
        assert_eq!(features.row(1), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn test_csv_without_header() {
        let data = "# comment\n\n1,2\n3,4\n";
        let features = DenseFeatures::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(features.num_vectors(), 2);
        assert_eq!(features.row(0), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_csv_invalid_value() {
        let data = "1.0,2.0\n3.0,abc\n";
        let err = DenseFeatures::from_reader(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, SVMError::ParseError(ref msg) if msg.contains("line 2")));
    }

    #[test]
    fn test_csv_ragged_rows() {
        let data = "1.0,2.0\n3.0\n";
        assert!(matches!(
            DenseFeatures::from_reader(Cursor::new(data)),
            Err(SVMError::ParseError(_))
        ));
    }

    #[test]
    fn test_header_detection() {
        assert!(is_header_line("a,b,c"));
        assert!(!is_header_line("1.0,2.0,3.0"));
        assert!(!is_header_line("1.0,b,3.0"));
    }
}
