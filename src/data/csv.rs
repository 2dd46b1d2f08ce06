//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label
//! - All other columns are dense features
//! - First row can be headers (automatically detected) and names the columns

use crate::core::{validate_labels, FeatureMatrix, Result, SVMError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Options controlling how a CSV file is read
#[derive(Debug, Clone, Copy)]
pub struct CSVOptions {
    /// Detect a header row and use it for column names
    pub auto_detect_header: bool,
    /// Map a 0/1 label encoding onto -1/+1
    pub remap_zero_one: bool,
}

impl Default for CSVOptions {
    fn default() -> Self {
        Self {
            auto_detect_header: true,
            remap_zero_one: false,
        }
    }
}

/// Labeled dataset loaded from a CSV file
#[derive(Debug, Clone)]
pub struct CSVDataset {
    features: FeatureMatrix,
    labels: Vec<f64>,
}

impl CSVDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_options(path, CSVOptions::default())
    }

    pub fn from_file_with_options<P: AsRef<Path>>(path: P, options: CSVOptions) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        Self::from_reader_with_options(BufReader::new(file), options)
    }

    /// Load a dataset from a reader with default options
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, CSVOptions::default())
    }

    /// Load a dataset from a reader with explicit options
    pub fn from_reader_with_options<R: BufRead>(reader: R, options: CSVOptions) -> Result<Self> {
        let mut header: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut first_data_line = true;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if first_data_line {
                first_data_line = false;
                if options.auto_detect_header && Self::is_header_line(line) {
                    header = Some(Self::parse_header(line));
                    continue;
                }
            }

            let (features, label) = Self::parse_data_line(line, line_no + 1)?;
            rows.push(features);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        if options.remap_zero_one {
            for label in &mut labels {
                if *label == 0.0 {
                    *label = -1.0;
                }
            }
        }
        validate_labels(&labels)?;

        let width = rows[0].len();
        let features = match header {
            Some(names) => {
                if names.len() != width {
                    return Err(SVMError::ParseError(format!(
                        "Header names {} feature columns but data has {}",
                        names.len(),
                        width
                    )));
                }
                FeatureMatrix::with_columns(names, rows)?
            }
            None => FeatureMatrix::from_rows(rows)?,
        };

        Ok(CSVDataset { features, labels })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        // Most feature fields are non-numeric (the label column is ignored)
        let feature_fields = fields.len() - 1;
        let non_numeric_count = fields
            .iter()
            .take(feature_fields)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count * 2 > feature_fields
    }

    /// Feature column names from a header line (the label column is dropped)
    fn parse_header(line: &str) -> Vec<String> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        fields[..fields.len() - 1]
            .iter()
            .map(|f| f.to_string())
            .collect()
    }

    /// Parse a CSV data line into dense features and a label
    fn parse_data_line(line: &str, line_no: usize) -> Result<(Vec<f64>, f64)> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() < 2 {
            return Err(SVMError::ParseError(format!(
                "Line {line_no} has too few fields: {line}"
            )));
        }

        let label_str = fields[fields.len() - 1];
        let label = label_str.parse::<f64>().map_err(|_| {
            SVMError::ParseError(format!("Invalid label on line {line_no}: {label_str}"))
        })?;

        let features = fields[..fields.len() - 1]
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    SVMError::ParseError(format!(
                        "Invalid feature value on line {line_no}, column {}: {field}",
                        idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok((features, label))
    }

    /// Feature matrix (no intercept column)
    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Split into the feature matrix and the label vector
    pub fn into_parts(self) -> (FeatureMatrix, Vec<f64>) {
        (self.features, self.labels)
    }
}
