//! Feature selection run before training
//!
//! Two passes, applied in order: [`remove_correlated_features`] drops columns
//! that duplicate an earlier column, then [`remove_insignificant_features`]
//! drops columns whose regression coefficient is not significant.

pub mod correlation;
pub mod significance;

pub use self::correlation::remove_correlated_features;
pub use self::significance::remove_insignificant_features;

use crate::core::{FeatureMatrix, Result, SVMError, SignificanceTest};
use log::info;
use serde::Serialize;

/// Columns removed by each selection pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionReport {
    /// Removed by correlation pruning, in column order
    pub correlated: Vec<String>,
    /// Removed by significance pruning, in removal order
    pub insignificant: Vec<String>,
}

impl SelectionReport {
    /// Every removed column
    pub fn dropped(&self) -> impl Iterator<Item = &String> {
        self.correlated.iter().chain(&self.insignificant)
    }
}

/// Run both pruning passes on `x` in place
pub fn select_features<T: SignificanceTest + ?Sized>(
    x: &mut FeatureMatrix,
    y: &[f64],
    correlation_threshold: f64,
    significance_level: f64,
    test: &T,
) -> Result<SelectionReport> {
    if y.len() != x.n_samples() {
        return Err(SVMError::DimensionMismatch {
            expected: x.n_samples(),
            actual: y.len(),
        });
    }

    let correlated = remove_correlated_features(x, correlation_threshold)?;
    if !correlated.is_empty() {
        info!("Correlation pruning removed {correlated:?}");
    }

    let insignificant = remove_insignificant_features(x, y, significance_level, test)?;
    if !insignificant.is_empty() {
        info!("Significance pruning removed {insignificant:?}");
    }

    info!("{} features remain after selection", x.n_features());
    Ok(SelectionReport {
        correlated,
        insignificant,
    })
}
