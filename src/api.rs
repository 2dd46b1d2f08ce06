//! High-level API for training and evaluating the linear SVM
//!
//! This module ties feature selection, the SGD optimizer, prediction and
//! evaluation together behind a builder.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sgd_svm::api::SVM;
//! use sgd_svm::data::{train_test_split, CSVDataset};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (mut x, y) = CSVDataset::from_file("data.csv")?.into_parts();
//!
//! let svm = SVM::new().with_learning_rate(0.00001).with_seed(42);
//! svm.select_features(&mut x, &y)?;
//!
//! let mut split = train_test_split(&x, &y, 0.2, Some(42))?;
//! let model = svm.train(&mut split)?;
//!
//! let metrics = model.evaluate(&split.x_test, &split.y_test)?;
//! println!("Accuracy: {:.2}%", metrics.accuracy() * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{
    dot, FeatureMatrix, OptimizationResult, OptimizerConfig, Prediction, Result, SVMError,
    SVMModel, INTERCEPT_COLUMN,
};
use crate::data::TrainTestSplit;
use crate::optimizer::{SgdOptimizer, TrainedSVM};
use crate::selection::{self, SelectionReport};
use crate::stats::OrdinaryLeastSquares;
use log::info;
use serde::Serialize;
use std::sync::atomic::AtomicBool;

/// High-level SVM interface with builder pattern
#[derive(Debug, Clone, Default)]
pub struct SVM {
    config: OptimizerConfig,
}

impl SVM {
    /// Create a new SVM with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every hyperparameter at once
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the weight of the hinge term
    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.config.regularization = regularization;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    /// Set the epoch budget (epochs run are `1..max_epochs`)
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.config.max_epochs = max_epochs;
        self
    }

    /// Set the relative cost improvement that counts as converged
    pub fn with_cost_threshold(mut self, cost_threshold: f64) -> Self {
        self.config.cost_threshold = cost_threshold;
        self
    }

    pub fn with_correlation_threshold(mut self, threshold: f64) -> Self {
        self.config.correlation_threshold = threshold;
        self
    }

    pub fn with_significance_level(mut self, level: f64) -> Self {
        self.config.significance_level = level;
        self
    }

    /// Fix the shuffle seed for reproducible training
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Prune correlated, then insignificant, columns of `x` in place
    pub fn select_features(&self, x: &mut FeatureMatrix, y: &[f64]) -> Result<SelectionReport> {
        self.config.validate()?;
        selection::select_features(
            x,
            y,
            self.config.correlation_threshold,
            self.config.significance_level,
            &OrdinaryLeastSquares,
        )
    }

    /// Append the intercept column to both halves of `split`, then train on
    /// the training half
    pub fn train(&self, split: &mut TrainTestSplit) -> Result<TrainedModel> {
        require_features(&split.x_train)?;
        split.x_train.push_constant_column(INTERCEPT_COLUMN, 1.0)?;
        split.x_test.push_constant_column(INTERCEPT_COLUMN, 1.0)?;
        self.train_augmented(&split.x_train, &split.y_train)
    }

    /// Train on `x` without modifying it; the intercept is added internally
    pub fn fit(&self, x: &FeatureMatrix, y: &[f64]) -> Result<TrainedModel> {
        require_features(x)?;
        self.train_augmented(&x.with_intercept()?, y)
    }

    /// Like [`fit`](Self::fit), stopping at the next epoch boundary once
    /// `cancel` is set
    pub fn fit_with_cancel(
        &self,
        x: &FeatureMatrix,
        y: &[f64],
        cancel: &AtomicBool,
    ) -> Result<TrainedModel> {
        require_features(x)?;
        let x = x.with_intercept()?;
        let optimizer = SgdOptimizer::new(self.config.clone());
        let result = optimizer.optimize_with_cancel(&x, y, cancel)?;
        Ok(TrainedModel {
            model: TrainedSVM::new(x.column_names().to_vec(), result),
        })
    }

    fn train_augmented(&self, x: &FeatureMatrix, y: &[f64]) -> Result<TrainedModel> {
        info!("Training started");
        let optimizer = SgdOptimizer::new(self.config.clone());
        let model = optimizer.train(x, y)?;
        info!(
            "Training completed after {} epochs ({:?})",
            model.result().epochs,
            model.result().termination
        );
        info!("Weights: {:?}", model.weights());
        Ok(TrainedModel { model })
    }
}

/// Trained SVM model with high-level prediction interface
#[derive(Debug, Clone)]
pub struct TrainedModel {
    model: TrainedSVM,
}

impl TrainedModel {
    /// Trained weights; the last one belongs to the intercept column
    pub fn weights(&self) -> &[f64] {
        self.model.weights()
    }

    pub fn result(&self) -> &OptimizationResult {
        self.model.result()
    }

    /// True only when training met the stoppage criterion
    pub fn converged(&self) -> bool {
        self.model.converged()
    }

    /// Decision value of one augmented sample
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.model.decision_function(features)
    }

    /// Predict every sample of a matrix that already has the intercept column
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Prediction>> {
        check_width(x, self.model.n_features())?;
        Ok(self.model.predict_batch(x))
    }

    /// Predict samples given without the intercept column
    pub fn predict_raw(&self, x: &FeatureMatrix) -> Result<Vec<Prediction>> {
        self.predict(&x.with_intercept()?)
    }

    /// Predict an augmented matrix and score it against `y`
    pub fn evaluate(&self, x: &FeatureMatrix, y: &[f64]) -> Result<EvaluationMetrics> {
        let predicted = predict(x, self.weights())?;
        let metrics = evaluate(y, &predicted)?;
        info!(
            "accuracy={:.4} recall={:.4} precision={:.4}",
            metrics.accuracy(),
            metrics.recall(),
            metrics.precision()
        );
        Ok(metrics)
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            feature_names: self.model.feature_names().to_vec(),
            weights: self.model.weights().to_vec(),
            bias: self.model.bias(),
            epochs: self.model.result().epochs,
            converged: self.model.converged(),
        }
    }

}

/// The intercept alone is not a model; selection may have removed every column
fn require_features(x: &FeatureMatrix) -> Result<()> {
    if x.n_features() == 0 {
        return Err(SVMError::EmptyFeatureSet);
    }
    Ok(())
}

fn check_width(x: &FeatureMatrix, expected: usize) -> Result<()> {
    if x.n_features() != expected {
        return Err(SVMError::DimensionMismatch {
            expected,
            actual: x.n_features(),
        });
    }
    Ok(())
}

/// Label every sample of `x` by the sign of `⟨x_i, w⟩`; zero maps to +1
pub fn predict(x: &FeatureMatrix, weights: &[f64]) -> Result<Vec<f64>> {
    check_width(x, weights.len())?;
    Ok(x.rows()
        .map(|row| Prediction::from_decision_value(dot(row, weights)).label)
        .collect())
}

/// Compare predicted labels against the truth, +1 being the positive class
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<EvaluationMetrics> {
    if y_true.len() != y_pred.len() {
        return Err(SVMError::DimensionMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }

    let mut tp = 0; // True positives
    let mut tn = 0; // True negatives
    let mut fp = 0; // False positives
    let mut fn_ = 0; // False negatives

    for (&predicted, &actual) in y_pred.iter().zip(y_true) {
        match (predicted > 0.0, actual > 0.0) {
            (true, true) => tp += 1,
            (false, false) => tn += 1,
            (true, false) => fp += 1,
            (false, true) => fn_ += 1,
        }
    }

    Ok(EvaluationMetrics::new(tp, tn, fp, fn_))
}

/// Detailed evaluation metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

/// Model information
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: Option<f64>,
    pub epochs: usize,
    pub converged: bool,
}
