//! Core type definitions for SVM training

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Build a prediction from a decision value.
    ///
    /// A decision value of exactly zero is classified as +1.
    pub fn from_decision_value(decision_value: f64) -> Self {
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Self::new(label, decision_value)
    }
}

/// Hyperparameters for one training run.
///
/// All fields are fixed when training starts. Missing fields in a JSON
/// config fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Weight of the hinge term against the L2 regularizer
    pub regularization: f64,
    /// Step size of each per-sample update
    pub learning_rate: f64,
    /// Epochs run are `1..max_epochs`
    pub max_epochs: usize,
    /// Pairs with |corr| at or above this are pruned
    pub correlation_threshold: f64,
    /// Columns with an OLS p-value above this are pruned
    pub significance_level: f64,
    /// Relative cost improvement below which training stops
    pub cost_threshold: f64,
    /// Shuffle seed; `None` draws a fresh seed from the OS
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            regularization: 10_000.0,
            learning_rate: 0.000_001,
            max_epochs: 5000,
            correlation_threshold: 0.9,
            significance_level: 0.05,
            cost_threshold: 0.01,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every hyperparameter is in its valid range
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SVMError::InvalidParameter(format!(
                    "{name} must be a positive finite number, got: {value}"
                )))
            }
        }

        positive("regularization", self.regularization)?;
        positive("learning_rate", self.learning_rate)?;
        positive("cost_threshold", self.cost_threshold)?;

        if self.max_epochs < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "max_epochs must be at least 2, got: {}",
                self.max_epochs
            )));
        }
        if !(self.correlation_threshold > 0.0 && self.correlation_threshold <= 1.0) {
            return Err(SVMError::InvalidParameter(format!(
                "correlation_threshold must be in (0, 1], got: {}",
                self.correlation_threshold
            )));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(SVMError::InvalidParameter(format!(
                "significance_level must be in (0, 1), got: {}",
                self.significance_level
            )));
        }
        Ok(())
    }
}

/// How a training run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Termination {
    /// The relative cost improvement fell below the threshold at `epoch`
    Converged { epoch: usize },
    /// Every epoch ran without meeting the stoppage criterion
    MaxEpochsReached,
    /// A cancellation request was observed before `epoch` started
    Cancelled { epoch: usize },
}

/// Result of the optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Trained weights, one per feature (intercept included)
    pub weights: Vec<f64>,
    /// Number of completed epochs
    pub epochs: usize,
    pub termination: Termination,
    /// Cost at the last convergence check
    pub cost: f64,
    /// `(epoch, cost)` for every convergence check
    pub cost_history: Vec<(usize, f64)>,
}

impl OptimizationResult {
    /// True only when the stoppage criterion was met
    pub fn converged(&self) -> bool {
        matches!(self.termination, Termination::Converged { .. })
    }
}

/// Check that every label is exactly -1 or +1
pub fn validate_labels(labels: &[f64]) -> Result<()> {
    match labels
        .iter()
        .enumerate()
        .find(|(_, &label)| label != 1.0 && label != -1.0)
    {
        Some((index, &label)) => Err(SVMError::InvalidLabelEncoding { index, label }),
        None => Ok(()),
    }
}
