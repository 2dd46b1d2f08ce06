//! Linear soft-margin Support Vector Machine trained by stochastic
//! subgradient descent
//!
//! Training runs in three stages: feature selection (correlation and
//! significance pruning), SGD on the regularized hinge loss, and
//! prediction by the sign of the decision value.

pub mod api;
pub mod core;
pub mod data;
pub mod objective;
pub mod optimizer;
pub mod selection;
pub mod stats;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, ModelInfo, TrainedModel, SVM};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{FeatureMatrix, Result, SVMError, INTERCEPT_COLUMN};
pub use crate::data::{train_test_split, CSVDataset, CSVOptions, TrainTestSplit};
pub use crate::objective::HingeObjective;
pub use crate::optimizer::{SgdOptimizer, TrainedSVM};
pub use crate::selection::SelectionReport;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
