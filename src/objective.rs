//! Regularized hinge-loss objective
//!
//! ```text
//! cost(w) = ½‖w‖² + C · mean_i max(0, 1 − y_i ⟨x_i, w⟩)
//! ```
//!
//! The hinge is not differentiable at a zero margin, so [`HingeObjective`]
//! exposes a subgradient: the regularizer alone for samples on or beyond the
//! margin, and the regularizer plus the data term for margin violators.

use crate::core::{dot, FeatureMatrix, Result, SVMError};

/// Hinge-loss objective with L2 regularization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeObjective {
    regularization: f64,
}

impl HingeObjective {
    pub fn new(regularization: f64) -> Self {
        Self { regularization }
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// `1 − y ⟨x, w⟩`; positive when the sample violates the margin
    #[inline]
    pub fn margin(w: &[f64], x: &[f64], y: f64) -> f64 {
        1.0 - y * dot(x, w)
    }

    /// Objective value of `w` over the whole dataset
    pub fn cost(&self, w: &[f64], x: &FeatureMatrix, y: &[f64]) -> Result<f64> {
        check_shapes(w, x, y)?;
        if x.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        Ok(self.cost_unchecked(w, x, y))
    }

    pub(crate) fn cost_unchecked(&self, w: &[f64], x: &FeatureMatrix, y: &[f64]) -> f64 {
        let hinge_sum: f64 = x
            .rows()
            .zip(y)
            .map(|(row, &label)| Self::margin(w, row, label).max(0.0))
            .sum();
        let hinge_loss = self.regularization * (hinge_sum / x.n_samples() as f64);
        0.5 * dot(w, w) + hinge_loss
    }

    /// Batch-averaged subgradient at `w`
    pub fn gradient(&self, w: &[f64], x: &FeatureMatrix, y: &[f64]) -> Result<Vec<f64>> {
        check_shapes(w, x, y)?;
        if x.is_empty() {
            return Err(SVMError::NumericInstability(
                "subgradient of an empty batch".into(),
            ));
        }

        let mut total = vec![0.0; w.len()];
        let mut sample = vec![0.0; w.len()];
        for (row, &label) in x.rows().zip(y) {
            self.sample_gradient_into(w, row, label, &mut sample);
            for (t, s) in total.iter_mut().zip(&sample) {
                *t += s;
            }
        }

        let n = x.n_samples() as f64;
        for t in &mut total {
            *t /= n;
        }
        Ok(total)
    }

    /// Subgradient contributed by one sample, written into `out`.
    ///
    /// A margin of exactly zero counts as satisfied and yields `w` alone.
    #[inline]
    pub fn sample_gradient_into(&self, w: &[f64], x: &[f64], y: f64, out: &mut [f64]) {
        debug_assert_eq!(w.len(), out.len());
        if Self::margin(w, x, y).max(0.0) == 0.0 {
            out.copy_from_slice(w);
        } else {
            let scale = self.regularization * y;
            for ((o, &wi), &xi) in out.iter_mut().zip(w).zip(x) {
                *o = wi - scale * xi;
            }
        }
    }
}

fn check_shapes(w: &[f64], x: &FeatureMatrix, y: &[f64]) -> Result<()> {
    if w.len() != x.n_features() {
        return Err(SVMError::DimensionMismatch {
            expected: x.n_features(),
            actual: w.len(),
        });
    }
    if y.len() != x.n_samples() {
        return Err(SVMError::DimensionMismatch {
            expected: x.n_samples(),
            actual: y.len(),
        });
    }
    Ok(())
}
