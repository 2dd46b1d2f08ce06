//! Redundancy pruning by pairwise correlation

use crate::core::{FeatureMatrix, Result};
use crate::stats::CorrelationMatrix;
use log::debug;

/// Drop every column that is strongly correlated with an earlier column.
///
/// For each pair `i < j` with `|corr(i, j)| >= threshold`, column `j` is
/// marked; all marks are computed on the original matrix before anything is
/// removed, so a column can be marked through a partner that is itself
/// marked. Returns the names of the removed columns in column order.
pub fn remove_correlated_features(x: &mut FeatureMatrix, threshold: f64) -> Result<Vec<String>> {
    if x.n_features() < 2 {
        return Ok(Vec::new());
    }

    let corr = CorrelationMatrix::from_features(x)?;
    let mut marked = Vec::new();
    for i in 0..corr.n() {
        for j in (i + 1)..corr.n() {
            if corr.get(i, j).abs() >= threshold {
                debug!(
                    "{} correlates with {} (r = {:.4})",
                    x.column_names()[j],
                    x.column_names()[i],
                    corr.get(i, j)
                );
                marked.push(j);
            }
        }
    }

    x.drop_columns(&marked)
}
