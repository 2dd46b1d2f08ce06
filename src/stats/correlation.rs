//! Pearson correlation between feature columns

use crate::core::{FeatureMatrix, Result, SVMError};

/// Pearson product-moment correlation coefficient between `x` and `y`.
///
/// Returns 0.0 if either series is constant (zero variance).
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(SVMError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(SVMError::InvalidDataset(
            "correlation needs at least 2 observations".into(),
        ));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(cov / denom)
}

/// Pairwise Pearson correlation matrix over the columns of a [`FeatureMatrix`]
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Flat storage (row-major, n×n)
    data: Vec<f64>,
    size: usize,
}

impl CorrelationMatrix {
    /// Correlate every pair of columns of `x`
    pub fn from_features(x: &FeatureMatrix) -> Result<Self> {
        let columns: Vec<Vec<f64>> = (0..x.n_features()).map(|j| x.column(j)).collect();

        let n = columns.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let r = pearson(&columns[i], &columns[j])?;
                data[i * n + j] = r;
                data[j * n + i] = r;
            }
        }

        Ok(Self { data, size: n })
    }

    /// Correlation between column `i` and column `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    /// Number of columns
    pub fn n(&self) -> usize {
        self.size
    }
}
