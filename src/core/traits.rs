//! Core traits for SVM training

use crate::core::{FeatureMatrix, Prediction, Result};

/// Trained linear model
pub trait SVMModel {
    /// Raw decision value for one sample
    fn decision_function(&self, features: &[f64]) -> f64;

    /// Number of features the model expects (intercept included)
    fn n_features(&self) -> usize;

    /// Predict a single sample
    fn predict_one(&self, features: &[f64]) -> Prediction {
        Prediction::from_decision_value(self.decision_function(features))
    }

    /// Predict every sample of a matrix
    fn predict_batch(&self, x: &FeatureMatrix) -> Vec<Prediction> {
        x.rows().map(|row| self.predict_one(row)).collect()
    }
}

/// Per-coefficient significance of a regression of `y` on the columns of `x`
///
/// Used by significance pruning to decide which column to drop next.
pub trait SignificanceTest {
    /// One p-value per column of `x`, in column order
    fn p_values(&self, x: &FeatureMatrix, y: &[f64]) -> Result<Vec<f64>>;
}
