//! Stochastic subgradient descent for the linear SVM
//!
//! Each epoch visits every training sample once in a freshly shuffled order
//! and applies a single-sample update `w ← w − η · ∂cost`. The full-dataset
//! cost is only evaluated on epochs 1, 2, 4, 8, ... and on the last epoch;
//! training stops as soon as the cost changes by less than
//! `cost_threshold` relative to the previous check.

use crate::core::{
    validate_labels, FeatureMatrix, OptimizationResult, OptimizerConfig, Result, SVMError,
    SVMModel, Termination, INTERCEPT_COLUMN,
};
use crate::objective::HingeObjective;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};

/// SGD optimizer for the hinge-loss objective
#[derive(Debug, Clone)]
pub struct SgdOptimizer {
    objective: HingeObjective,
    config: OptimizerConfig,
}

impl SgdOptimizer {
    /// Create a new optimizer with the given configuration
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            objective: HingeObjective::new(config.regularization),
            config,
        }
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn objective(&self) -> &HingeObjective {
        &self.objective
    }

    /// Train a model on `x` (intercept column already appended) and `y`
    pub fn train(&self, x: &FeatureMatrix, y: &[f64]) -> Result<TrainedSVM> {
        let result = self.optimize(x, y)?;
        Ok(TrainedSVM::new(x.column_names().to_vec(), result))
    }

    /// Run SGD until convergence or until the epoch budget is spent
    pub fn optimize(&self, x: &FeatureMatrix, y: &[f64]) -> Result<OptimizationResult> {
        self.run(x, y, None)
    }

    /// Like [`optimize`](Self::optimize), but stops early once `cancel` is set.
    ///
    /// The flag is read at every epoch boundary, never inside an epoch.
    pub fn optimize_with_cancel(
        &self,
        x: &FeatureMatrix,
        y: &[f64],
        cancel: &AtomicBool,
    ) -> Result<OptimizationResult> {
        self.run(x, y, Some(cancel))
    }

    fn run(
        &self,
        x: &FeatureMatrix,
        y: &[f64],
        cancel: Option<&AtomicBool>,
    ) -> Result<OptimizationResult> {
        self.config.validate()?;
        if x.n_features() == 0 {
            return Err(SVMError::EmptyFeatureSet);
        }
        if x.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        if y.len() != x.n_samples() {
            return Err(SVMError::DimensionMismatch {
                expected: x.n_samples(),
                actual: y.len(),
            });
        }
        validate_labels(y)?;

        let max_epochs = self.config.max_epochs;
        let learning_rate = self.config.learning_rate;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Running SGD on {} samples x {} features (C={}, lr={}, max_epochs={})",
            x.n_samples(),
            x.n_features(),
            self.config.regularization,
            learning_rate,
            max_epochs
        );

        let mut weights = vec![0.0; x.n_features()];
        let mut gradient = vec![0.0; x.n_features()];
        let mut order: Vec<usize> = (0..x.n_samples()).collect();
        let mut prev_cost = f64::INFINITY;
        let mut next_check = 1usize;
        let mut nth = 0u32;
        let mut cost_history = Vec::new();

        for epoch in 1..max_epochs {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                let cost = self.objective.cost_unchecked(&weights, x, y);
                info!("Training cancelled before epoch {epoch}");
                return Ok(OptimizationResult {
                    weights,
                    epochs: epoch - 1,
                    termination: Termination::Cancelled { epoch },
                    cost,
                    cost_history,
                });
            }

            order.shuffle(&mut rng);
            for &i in &order {
                self.objective
                    .sample_gradient_into(&weights, x.row(i), y[i], &mut gradient);
                for (w, g) in weights.iter_mut().zip(&gradient) {
                    *w -= learning_rate * g;
                }
            }

            if weights.iter().any(|w| !w.is_finite()) {
                return Err(SVMError::NumericInstability(format!(
                    "non-finite weights after epoch {epoch}"
                )));
            }

            if epoch != next_check && epoch != max_epochs - 1 {
                continue;
            }

            let cost = self.objective.cost_unchecked(&weights, x, y);
            debug!("Epoch {epoch}: cost {cost:.6}");
            if !cost.is_finite() {
                return Err(SVMError::NumericInstability(format!(
                    "non-finite cost at epoch {epoch}"
                )));
            }
            cost_history.push((epoch, cost));

            if (prev_cost - cost).abs() < self.config.cost_threshold * prev_cost {
                info!("Converged at epoch {epoch} with cost {cost:.6}");
                return Ok(OptimizationResult {
                    weights,
                    epochs: epoch,
                    termination: Termination::Converged { epoch },
                    cost,
                    cost_history,
                });
            }

            prev_cost = cost;
            nth += 1;
            next_check = 1usize.checked_shl(nth).unwrap_or(usize::MAX);
        }

        warn!(
            "Stopped after {} epochs without meeting the stoppage criterion",
            max_epochs - 1
        );
        Ok(OptimizationResult {
            weights,
            epochs: max_epochs - 1,
            termination: Termination::MaxEpochsReached,
            cost: prev_cost,
            cost_history,
        })
    }
}

/// A trained linear SVM
#[derive(Debug, Clone)]
pub struct TrainedSVM {
    feature_names: Vec<String>,
    result: OptimizationResult,
}

impl TrainedSVM {
    pub(crate) fn new(feature_names: Vec<String>, result: OptimizationResult) -> Self {
        Self {
            feature_names,
            result,
        }
    }

    /// Trained weights, one per feature
    pub fn weights(&self) -> &[f64] {
        &self.result.weights
    }

    /// Names of the features the weights apply to
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Weight of the intercept column, if the model has one
    pub fn bias(&self) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|name| name == INTERCEPT_COLUMN)
            .map(|j| self.result.weights[j])
    }

    /// Full optimizer output
    pub fn result(&self) -> &OptimizationResult {
        &self.result
    }

    pub fn converged(&self) -> bool {
        self.result.converged()
    }
}

impl SVMModel for TrainedSVM {
    fn decision_function(&self, features: &[f64]) -> f64 {
        crate::core::dot(features, &self.result.weights)
    }

    fn n_features(&self) -> usize {
        self.result.weights.len()
    }
}
