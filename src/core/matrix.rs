//! Dense feature matrix with named columns

use crate::core::{Result, SVMError};
use std::collections::HashSet;

/// Name given to the constant column appended for the bias term
pub const INTERCEPT_COLUMN: &str = "intercept";

/// Dense, row-major feature matrix.
///
/// Every column carries a name so that feature selection can report which
/// inputs were removed. Columns can be dropped in place; rows are fixed once
/// the matrix is built.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    n_samples: usize,
    columns: Vec<String>,
}

impl FeatureMatrix {
    /// Build a matrix from rows, naming the columns `x0`, `x1`, ...
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.len());
        let columns = (0..width).map(|j| format!("x{j}")).collect();
        Self::with_columns(columns, rows)
    }

    /// Build a matrix from rows with explicit column names
    pub fn with_columns(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(SVMError::InvalidDataset(format!(
                    "Duplicate column name: {name}"
                )));
            }
        }

        let width = columns.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in &rows {
            if row.len() != width {
                return Err(SVMError::DimensionMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            n_samples: rows.len(),
            columns,
        })
    }

    /// Number of samples (rows)
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of features (columns)
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples == 0
    }

    /// Feature values of sample `i`
    ///
    /// # Panics
    /// Panics if `i >= n_samples()`
    pub fn row(&self, i: usize) -> &[f64] {
        let width = self.n_features();
        &self.data[i * width..(i + 1) * width]
    }

    /// Iterate over all samples in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_samples).map(move |i| self.row(i))
    }

    /// Copy out column `j`
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.rows().map(|row| row[j]).collect()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Position of the column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Remove the given columns in place, keeping the order of the survivors.
    ///
    /// Duplicate indices are ignored. Returns the names of the removed
    /// columns in their original column order.
    pub fn drop_columns(&mut self, indices: &[usize]) -> Result<Vec<String>> {
        let width = self.n_features();
        let mut drop = vec![false; width];
        for &j in indices {
            if j >= width {
                return Err(SVMError::InvalidParameter(format!(
                    "Column index {j} out of range for {width} columns"
                )));
            }
            drop[j] = true;
        }

        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks(width.max(1)).take(self.n_samples) {
            data.extend(
                row.iter()
                    .zip(&drop)
                    .filter(|(_, &d)| !d)
                    .map(|(&v, _)| v),
            );
        }

        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(width);
        for (name, &d) in self.columns.drain(..).zip(&drop) {
            if d {
                dropped.push(name);
            } else {
                kept.push(name);
            }
        }

        self.columns = kept;
        self.data = data;
        Ok(dropped)
    }

    /// Remove a single column by name
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let j = self
            .column_index(name)
            .ok_or_else(|| SVMError::InvalidParameter(format!("Unknown column: {name}")))?;
        self.drop_columns(&[j])?;
        Ok(())
    }

    /// Append a column holding `value` for every sample
    pub fn push_constant_column(&mut self, name: &str, value: f64) -> Result<()> {
        if self.column_index(name).is_some() {
            return Err(SVMError::InvalidDataset(format!(
                "Duplicate column name: {name}"
            )));
        }

        let width = self.n_features();
        let mut data = Vec::with_capacity(self.n_samples * (width + 1));
        for i in 0..self.n_samples {
            data.extend_from_slice(&self.data[i * width..(i + 1) * width]);
            data.push(value);
        }

        self.data = data;
        self.columns.push(name.to_string());
        Ok(())
    }

    /// Copy of this matrix with a trailing `intercept` column of ones
    pub fn with_intercept(&self) -> Result<Self> {
        let mut augmented = self.clone();
        augmented.push_constant_column(INTERCEPT_COLUMN, 1.0)?;
        Ok(augmented)
    }

    /// New matrix holding the given samples, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let width = self.n_features();
        let mut data = Vec::with_capacity(indices.len() * width);
        for &i in indices {
            if i >= self.n_samples {
                return Err(SVMError::InvalidParameter(format!(
                    "Row index {i} out of range for {} samples",
                    self.n_samples
                )));
            }
            data.extend_from_slice(self.row(i));
        }

        Ok(Self {
            data,
            n_samples: indices.len(),
            columns: self.columns.clone(),
        })
    }
}

/// Dot product of two equally sized dense vectors
#[inline]
pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> FeatureMatrix {
        FeatureMatrix::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows_names_columns() {
        let x = sample_matrix();
        assert_eq!(x.n_samples(), 2);
        assert_eq!(x.n_features(), 3);
        assert_eq!(x.column_names(), &["x0", "x1", "x2"]);
        assert_eq!(x.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(x.column(2), vec![3.0, 6.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FeatureMatrix::with_columns(
            vec!["a".into(), "a".into()],
            vec![vec![1.0, 2.0]],
        );
        assert!(matches!(result, Err(SVMError::InvalidDataset(_))));
    }

    #[test]
    fn test_drop_columns_keeps_order() {
        let mut x = sample_matrix();
        let dropped = x.drop_columns(&[1, 1]).unwrap();

        assert_eq!(dropped, vec!["x1".to_string()]);
        assert_eq!(x.column_names(), &["x0", "x2"]);
        assert_eq!(x.row(0), &[1.0, 3.0]);
        assert_eq!(x.row(1), &[4.0, 6.0]);
    }

    #[test]
    fn test_drop_all_columns() {
        let mut x = sample_matrix();
        x.drop_columns(&[0, 1, 2]).unwrap();
        assert_eq!(x.n_features(), 0);
        assert_eq!(x.n_samples(), 2);
        assert!(x.row(1).is_empty());
    }

    #[test]
    fn test_drop_column_by_name() {
        let mut x = sample_matrix();
        x.drop_column("x0").unwrap();
        assert_eq!(x.column_names(), &["x1", "x2"]);
        assert!(x.drop_column("missing").is_err());
    }

    #[test]
    fn test_with_intercept() {
        let x = sample_matrix();
        let augmented = x.with_intercept().unwrap();

        assert_eq!(augmented.n_features(), 4);
        assert_eq!(augmented.column_names()[3], INTERCEPT_COLUMN);
        assert_eq!(augmented.row(0), &[1.0, 2.0, 3.0, 1.0]);
        assert_eq!(augmented.row(1), &[4.0, 5.0, 6.0, 1.0]);
        // The source matrix is untouched
        assert_eq!(x.n_features(), 3);
        // A second intercept would clash by name
        assert!(augmented.with_intercept().is_err());
    }

    #[test]
    fn test_select_rows() {
        let x = sample_matrix();
        let picked = x.select_rows(&[1, 0, 1]).unwrap();
        assert_eq!(picked.n_samples(), 3);
        assert_eq!(picked.row(0), &[4.0, 5.0, 6.0]);
        assert_eq!(picked.row(1), &[1.0, 2.0, 3.0]);
        assert!(x.select_rows(&[2]).is_err());
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[], &[]), 0.0);
    }
}
