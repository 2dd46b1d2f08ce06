//! Ordinary least squares with per-coefficient significance
//!
//! The regression has no implicit constant term: the design matrix is used
//! exactly as given, so a caller wanting an intercept adds the column
//! itself.

use crate::core::{dot, FeatureMatrix, Result, SVMError, SignificanceTest};
use crate::stats::distribution::t_two_tailed_p;

/// Relative pivot size below which the normal equations are treated as singular
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Fitted OLS regression
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_values: Vec<f64>,
    pub p_values: Vec<f64>,
    /// Residual sum of squares divided by the residual degrees of freedom
    pub residual_variance: f64,
    pub df_residual: usize,
}

impl OlsFit {
    /// Index and value of the largest p-value, `None` for an empty fit
    pub fn max_p_value(&self) -> Option<(usize, f64)> {
        max_p_value(&self.p_values)
    }
}

/// Index and value of the largest entry; the first one wins ties
pub fn max_p_value(p_values: &[f64]) -> Option<(usize, f64)> {
    p_values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (j, p)| match best {
            Some((_, q)) if q >= p => best,
            _ => Some((j, p)),
        })
}

/// Regress `y` on the columns of `x`
pub fn fit(x: &FeatureMatrix, y: &[f64]) -> Result<OlsFit> {
    let n = x.n_samples();
    let p = x.n_features();

    if p == 0 {
        return Err(SVMError::EmptyFeatureSet);
    }
    if y.len() != n {
        return Err(SVMError::DimensionMismatch {
            expected: n,
            actual: y.len(),
        });
    }
    if n <= p {
        return Err(SVMError::InvalidDataset(format!(
            "OLS needs more samples than columns ({n} samples, {p} columns)"
        )));
    }

    // Normal equations: X'X and X'y
    let mut xtx = vec![0.0; p * p];
    let mut xty = vec![0.0; p];
    for (row, &target) in x.rows().zip(y) {
        for i in 0..p {
            xty[i] += row[i] * target;
            for j in i..p {
                xtx[i * p + j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            xtx[i * p + j] = xtx[j * p + i];
        }
    }

    let inverse = invert(&xtx, p)?;
    let coefficients: Vec<f64> = (0..p)
        .map(|i| dot(&inverse[i * p..(i + 1) * p], &xty))
        .collect();

    let rss: f64 = x
        .rows()
        .zip(y)
        .map(|(row, &target)| {
            let residual = target - dot(row, &coefficients);
            residual * residual
        })
        .sum();
    let df_residual = n - p;
    let residual_variance = rss / df_residual as f64;

    let mut std_errors = Vec::with_capacity(p);
    let mut t_values = Vec::with_capacity(p);
    let mut p_values = Vec::with_capacity(p);
    for (j, &beta) in coefficients.iter().enumerate() {
        let (se, t, p_value) =
            significance(beta, inverse[j * p + j], residual_variance, df_residual)?;
        std_errors.push(se);
        t_values.push(t);
        p_values.push(p_value);
    }

    Ok(OlsFit {
        coefficients,
        std_errors,
        t_values,
        p_values,
        residual_variance,
        df_residual,
    })
}

/// Standard error, t value and p-value of one coefficient.
///
/// `inv_diag` is the matching diagonal entry of `(X'X)^-1`. Rounding on a
/// nearly collinear design can push it below zero, which leaves the standard
/// error undefined; that is reported as a singular design.
fn significance(
    beta: f64,
    inv_diag: f64,
    residual_variance: f64,
    df_residual: usize,
) -> Result<(f64, f64, f64)> {
    if !(inv_diag >= 0.0) || !inv_diag.is_finite() {
        return Err(SVMError::SingularMatrix);
    }
    let se = (residual_variance * inv_diag).sqrt();
    if se.is_nan() {
        return Err(SVMError::SingularMatrix);
    }

    if se > 0.0 {
        let t = beta / se;
        Ok((se, t, t_two_tailed_p(t, df_residual as f64)?))
    } else if beta == 0.0 {
        // Exact fit with a zero coefficient carries no evidence
        Ok((se, 0.0, 1.0))
    } else {
        Ok((se, beta.signum() * f64::INFINITY, 0.0))
    }
}

/// Gauss-Jordan inversion of a symmetric positive semi-definite `n×n` matrix
fn invert(matrix: &[f64], n: usize) -> Result<Vec<f64>> {
    let scale = (0..n)
        .map(|i| matrix[i * n + i].abs())
        .fold(0.0_f64, f64::max);
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(SVMError::SingularMatrix);
    }

    let mut a = matrix.to_vec();
    let mut inv = vec![0.0; n * n];
    for i in 0..n {
        inv[i * n + i] = 1.0;
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r, &s| a[r * n + col].abs().total_cmp(&a[s * n + col].abs()))
            .unwrap_or(col);
        if a[pivot_row * n + col].abs() <= PIVOT_TOLERANCE * scale {
            return Err(SVMError::SingularMatrix);
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap(pivot_row * n + k, col * n + k);
                inv.swap(pivot_row * n + k, col * n + k);
            }
        }

        let pivot = a[col * n + col];
        for k in 0..n {
            a[col * n + k] /= pivot;
            inv[col * n + k] /= pivot;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[r * n + col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[r * n + k] -= factor * a[col * n + k];
                inv[r * n + k] -= factor * inv[col * n + k];
            }
        }
    }

    Ok(inv)
}

/// [`SignificanceTest`] backed by an OLS fit
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinaryLeastSquares;

impl SignificanceTest for OrdinaryLeastSquares {
    fn p_values(&self, x: &FeatureMatrix, y: &[f64]) -> Result<Vec<f64>> {
        Ok(fit(x, y)?.p_values)
    }
}
