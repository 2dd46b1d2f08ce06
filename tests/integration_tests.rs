//! Integration tests for the sgd-svm library
//!
//! These tests verify end-to-end functionality across multiple modules
//! and validate real-world usage scenarios.

use sgd_svm::api::{evaluate, predict, SVM};
use sgd_svm::data::{train_test_split, CSVDataset, TrainTestSplit};
use sgd_svm::objective::HingeObjective;
use sgd_svm::selection::{remove_correlated_features, remove_insignificant_features};
use sgd_svm::stats::{ols, OrdinaryLeastSquares};
use sgd_svm::{FeatureMatrix, OptimizerConfig, SVMError, SgdOptimizer, Termination};
use std::io::Write;
use tempfile::NamedTempFile;

/// 50 points per class scattered within ~1.4 of (0, 0) and (10, 10)
fn two_clusters() -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for k in 0..50 {
        let k = k as f64;
        rows.push(vec![(k * 0.7).sin(), (k * 1.3).cos()]);
        labels.push(-1.0);
        rows.push(vec![10.0 + (k * 1.1).sin(), 10.0 + (k * 0.9).cos()]);
        labels.push(1.0);
    }
    (rows, labels)
}

/// Every fifth sample is held out
fn held_out_split(rows: Vec<Vec<f64>>, labels: Vec<f64>) -> TrainTestSplit {
    let mut train = (Vec::new(), Vec::new());
    let mut test = (Vec::new(), Vec::new());
    for (i, (row, label)) in rows.into_iter().zip(labels).enumerate() {
        let half = if i % 5 == 4 { &mut test } else { &mut train };
        half.0.push(row);
        half.1.push(label);
    }
    TrainTestSplit {
        x_train: FeatureMatrix::from_rows(train.0).unwrap(),
        x_test: FeatureMatrix::from_rows(test.0).unwrap(),
        y_train: train.1,
        y_test: test.1,
    }
}

#[test]
fn test_four_point_scenario() {
    let mut split = TrainTestSplit {
        x_train: FeatureMatrix::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
            vec![5.0, 6.0],
        ])
        .unwrap(),
        x_test: FeatureMatrix::from_rows(vec![vec![0.0, 0.5], vec![5.0, 5.5]]).unwrap(),
        y_train: vec![-1.0, -1.0, 1.0, 1.0],
        y_test: vec![-1.0, 1.0],
    };

    // Deliberately not the default hyperparameters: with the default step of
    // 1e-6 four samples meet the stoppage criterion at epoch 2, before the
    // classes are separated, and both test points come out +1
    let model = SVM::new()
        .with_learning_rate(0.00001)
        .with_seed(2024)
        .train(&mut split)
        .expect("Training should succeed");

    assert!(model.converged());
    let labels = predict(&split.x_test, model.weights()).unwrap();
    assert_eq!(labels, vec![-1.0, 1.0]);
}

#[test]
fn test_two_cluster_convergence() {
    let (rows, labels) = two_clusters();
    let mut split = held_out_split(rows, labels);

    let model = SVM::new()
        .with_seed(17)
        .train(&mut split)
        .expect("Training should succeed");

    match model.result().termination {
        Termination::Converged { epoch } => assert!(epoch < 4999),
        other => panic!("expected convergence, got {other:?}"),
    }

    let metrics = model
        .evaluate(&split.x_test, &split.y_test)
        .expect("Evaluation should succeed");
    assert!(
        metrics.accuracy() >= 0.95,
        "Accuracy should be at least 95%, got: {}",
        metrics.accuracy()
    );
    assert!(metrics.precision() >= 0.9);
    assert!(metrics.recall() >= 0.9);
}

#[test]
fn test_same_seed_reproduces_weights() {
    let (rows, labels) = two_clusters();
    let x = FeatureMatrix::from_rows(rows).unwrap();

    let train = |seed| {
        SVM::new()
            .with_seed(seed)
            .fit(&x, &labels)
            .expect("Training should succeed")
    };
    let bits = |w: &[f64]| w.iter().map(|v| v.to_bits()).collect::<Vec<_>>();

    let a = train(99);
    let b = train(99);
    assert_eq!(bits(a.weights()), bits(b.weights()));
    assert_eq!(a.result().cost_history, b.result().cost_history);
}

#[test]
fn test_no_margin_violations_gradient_is_w() {
    let (rows, labels) = two_clusters();
    let x = FeatureMatrix::from_rows(rows).unwrap().with_intercept().unwrap();

    // Decision value x0 + x1 - 10 gives margins far beyond 1 for both clusters
    let w = [1.0, 1.0, -10.0];
    let objective = HingeObjective::new(10000.0);
    assert_eq!(objective.gradient(&w, &x, &labels).unwrap(), w.to_vec());
    assert_eq!(objective.cost(&w, &x, &labels).unwrap(), 0.5 * 102.0);
}

#[test]
fn test_exhausted_epochs_are_reported() {
    let (rows, labels) = two_clusters();
    let x = FeatureMatrix::from_rows(rows).unwrap().with_intercept().unwrap();

    let optimizer = SgdOptimizer::new(OptimizerConfig {
        max_epochs: 3,
        seed: Some(5),
        ..Default::default()
    });
    let result = optimizer.optimize(&x, &labels).unwrap();

    assert_eq!(result.termination, Termination::MaxEpochsReached);
    assert!(!result.converged());
    assert_eq!(result.epochs, 2);
}

#[test]
fn test_invalid_labels_fail_fast() {
    let x = FeatureMatrix::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
    let result = SVM::new().with_seed(1).fit(&x, &[1.0, 2.0]);
    assert!(matches!(
        result,
        Err(SVMError::InvalidLabelEncoding { index: 1, label }) if label == 2.0
    ));
}

#[test]
fn test_feature_selection_properties() {
    // signal drives y, twin duplicates signal, noise is unrelated
    let rows: Vec<Vec<f64>> = (0..30)
        .map(|i| {
            let t = i as f64;
            let signal = if i % 2 == 0 { 1.0 } else { -1.0 } * (1.0 + (t * 0.37).sin().abs());
            vec![signal, 2.0 * signal + 0.01 * (t * 1.7).cos(), (t * 2.3).sin()]
        })
        .collect();
    let y: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    let mut x = FeatureMatrix::with_columns(
        vec!["signal".into(), "twin".into(), "noise".into()],
        rows,
    )
    .unwrap();

    let correlated = remove_correlated_features(&mut x, 0.9).unwrap();
    assert_eq!(correlated, vec!["twin".to_string()]);

    // Idempotent once pruned
    assert!(remove_correlated_features(&mut x, 0.9).unwrap().is_empty());

    remove_insignificant_features(&mut x, &y, 0.05, &OrdinaryLeastSquares).unwrap();
    assert!(x.column_index("signal").is_some());
    if x.n_features() > 0 {
        let fit = ols::fit(&x, &y).unwrap();
        assert!(fit.p_values.iter().all(|&p| p <= 0.05));
    }
}

#[test]
fn test_complete_workflow_csv() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(temp_file, "a,b,label").expect("Failed to write");
    let (rows, labels) = two_clusters();
    for (row, label) in rows.iter().zip(&labels) {
        writeln!(temp_file, "{},{},{}", row[0], row[1], label).expect("Failed to write");
    }
    temp_file.flush().expect("Failed to flush");

    let (mut x, y) = CSVDataset::from_file(temp_file.path())
        .expect("Failed to load dataset")
        .into_parts();
    assert_eq!(x.column_names(), &["a", "b"]);

    let svm = SVM::new().with_seed(8);
    let report = svm.select_features(&mut x, &y).expect("Selection should succeed");
    // The two coordinates move together across clusters
    assert_eq!(report.correlated, vec!["b".to_string()]);

    let mut split = train_test_split(&x, &y, 0.2, Some(8)).expect("Split should succeed");
    let model = svm.train(&mut split).expect("Training should succeed");
    let y_pred = predict(&split.x_test, model.weights()).unwrap();
    let metrics = evaluate(&split.y_test, &y_pred).unwrap();

    assert!(model.converged());
    assert!(metrics.accuracy() >= 0.95);
}
