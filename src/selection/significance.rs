//! Backward elimination of statistically insignificant columns

use crate::core::{FeatureMatrix, Result, SVMError, SignificanceTest};
use crate::stats::ols::max_p_value;
use log::debug;

/// Repeatedly drop the column with the largest p-value while it exceeds
/// `significance_level`.
///
/// Each round refits `test` on the surviving columns. Stops when every
/// remaining p-value is at or below the level, or when no columns remain.
/// Returns the dropped column names in removal order.
pub fn remove_insignificant_features<T: SignificanceTest + ?Sized>(
    x: &mut FeatureMatrix,
    y: &[f64],
    significance_level: f64,
    test: &T,
) -> Result<Vec<String>> {
    if x.n_features() == 0 {
        return Err(SVMError::EmptyFeatureSet);
    }

    let mut dropped = Vec::new();
    while x.n_features() > 0 {
        let p_values = test.p_values(x, y)?;
        if p_values.len() != x.n_features() {
            return Err(SVMError::DimensionMismatch {
                expected: x.n_features(),
                actual: p_values.len(),
            });
        }
        if p_values.iter().any(|p| p.is_nan()) {
            return Err(SVMError::NumericInstability(
                "regression produced a NaN p-value".into(),
            ));
        }

        let Some((worst, p_max)) = max_p_value(&p_values) else {
            break;
        };

        if p_max <= significance_level {
            break;
        }

        let name = x.column_names()[worst].clone();
        debug!("Dropping {name} (p = {p_max:.4})");
        x.drop_columns(&[worst])?;
        dropped.push(name);
    }

    Ok(dropped)
}
