//! Random train/test splitting

use crate::core::{FeatureMatrix, Result, SVMError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Features and labels divided into a training and a held-out half
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

/// Shuffle samples jointly and hold out `test_ratio` of them.
///
/// The test half gets `ceil(n * test_ratio)` samples. Both halves must end up
/// non-empty. `seed: None` draws a fresh seed from the OS.
pub fn train_test_split(
    x: &FeatureMatrix,
    y: &[f64],
    test_ratio: f64,
    seed: Option<u64>,
) -> Result<TrainTestSplit> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(SVMError::InvalidParameter(format!(
            "Test ratio must be between 0 and 1, got: {test_ratio}"
        )));
    }
    if y.len() != x.n_samples() {
        return Err(SVMError::DimensionMismatch {
            expected: x.n_samples(),
            actual: y.len(),
        });
    }

    let n = x.n_samples();
    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(SVMError::InvalidDataset(format!(
            "Cannot split {n} samples with test ratio {test_ratio}"
        )));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: x.select_rows(train_idx)?,
        x_test: x.select_rows(test_idx)?,
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}
