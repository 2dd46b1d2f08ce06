//! sgd-svm Command Line Interface
//!
//! Trains a linear SVM on a labeled CSV file: feature selection, a random
//! train/test split, SGD training, and evaluation on the held-out half.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use serde::Serialize;
use sgd_svm::api::{EvaluationMetrics, SVM};
use sgd_svm::core::{OptimizerConfig, Result, Termination};
use sgd_svm::data::{train_test_split, CSVDataset, CSVOptions};
use sgd_svm::selection::SelectionReport;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "sgd-svm")]
#[command(about = "Linear SVM trained by stochastic subgradient descent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "sgd-svm contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Select features, train on a random split and evaluate on the rest
    Train(TrainArgs),
    /// Run feature selection only and list the dropped columns
    Select(SelectArgs),
}

#[derive(Args)]
struct DataArgs {
    /// CSV file; the last column holds -1/+1 labels
    #[arg(long)]
    data: PathBuf,

    /// Treat 0/1 labels as -1/+1
    #[arg(long)]
    zero_one_labels: bool,
}

#[derive(Args)]
struct HyperArgs {
    /// JSON file with hyperparameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Regularization parameter C
    #[arg(short = 'C', long)]
    regularization: Option<f64>,

    /// SGD step size
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Epoch budget
    #[arg(long)]
    max_epochs: Option<usize>,

    /// Relative cost improvement that counts as converged
    #[arg(long)]
    cost_threshold: Option<f64>,

    /// Absolute correlation at which a later column is dropped
    #[arg(long)]
    correlation_threshold: Option<f64>,

    /// p-value above which a column is dropped
    #[arg(long)]
    significance_level: Option<f64>,

    /// Seed for shuffling and splitting
    #[arg(long)]
    seed: Option<u64>,
}

impl HyperArgs {
    fn to_config(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading hyperparameters from {path:?}");
                OptimizerConfig::from_json_file(path)?
            }
            None => OptimizerConfig::default(),
        };

        if let Some(v) = self.regularization {
            config.regularization = v;
        }
        if let Some(v) = self.learning_rate {
            config.learning_rate = v;
        }
        if let Some(v) = self.max_epochs {
            config.max_epochs = v;
        }
        if let Some(v) = self.cost_threshold {
            config.cost_threshold = v;
        }
        if let Some(v) = self.correlation_threshold {
            config.correlation_threshold = v;
        }
        if let Some(v) = self.significance_level {
            config.significance_level = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
struct TrainArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    hyper: HyperArgs,

    /// Fraction of samples held out for evaluation
    #[arg(long, default_value = "0.2")]
    test_ratio: f64,

    /// Train on every column, skipping feature selection
    #[arg(long)]
    skip_selection: bool,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SelectArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    hyper: HyperArgs,
}

#[derive(Serialize)]
struct TrainingReport {
    trained_at: DateTime<Utc>,
    samples: usize,
    features: Vec<String>,
    selection: SelectionReport,
    termination: Termination,
    epochs: usize,
    cost: f64,
    metrics: EvaluationMetrics,
    accuracy: f64,
    precision: f64,
    recall: f64,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Select(args) => select_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn load(args: &DataArgs) -> Result<CSVDataset> {
    info!("Loading dataset from {:?}", args.data);
    let options = CSVOptions {
        remap_zero_one: args.zero_one_labels,
        ..Default::default()
    };
    let dataset = CSVDataset::from_file_with_options(&args.data, options)?;
    info!(
        "Loaded {} samples with {} features",
        dataset.len(),
        dataset.features().n_features()
    );
    Ok(dataset)
}

fn train_command(args: TrainArgs) -> Result<()> {
    let config = args.hyper.to_config()?;
    let seed = config.seed;
    let svm = SVM::new().with_config(config);

    let (mut x, y) = load(&args.data)?.into_parts();
    let samples = x.n_samples();

    let selection = if args.skip_selection {
        SelectionReport::default()
    } else {
        svm.select_features(&mut x, &y)?
    };

    let mut split = train_test_split(&x, &y, args.test_ratio, seed)?;
    let model = svm.train(&mut split)?;
    let metrics = model.evaluate(&split.x_test, &split.y_test)?;
    let result = model.result();

    if args.json {
        let report = TrainingReport {
            trained_at: Utc::now(),
            samples,
            features: x.column_names().to_vec(),
            selection,
            termination: result.termination,
            epochs: result.epochs,
            cost: result.cost,
            accuracy: metrics.accuracy(),
            precision: metrics.precision(),
            recall: metrics.recall(),
            metrics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Training Results ===");
    println!("Samples: {samples}");
    print_selection(&selection);
    println!("Features used: {:?}", x.column_names());
    match result.termination {
        Termination::Converged { epoch } => println!("Converged at epoch {epoch}"),
        Termination::MaxEpochsReached => {
            println!("Did not converge within {} epochs", result.epochs)
        }
        Termination::Cancelled { epoch } => println!("Cancelled before epoch {epoch}"),
    }
    println!("Final cost: {:.6}", result.cost);

    println!("\nTest Results:");
    println!("  Accuracy:  {:.4}", metrics.accuracy());
    println!("  Recall:    {:.4}", metrics.recall());
    println!("  Precision: {:.4}", metrics.precision());

    Ok(())
}

fn select_command(args: SelectArgs) -> Result<()> {
    let svm = SVM::new().with_config(args.hyper.to_config()?);
    let (mut x, y) = load(&args.data)?.into_parts();

    let selection = svm.select_features(&mut x, &y)?;

    print_selection(&selection);
    println!("Remaining: {:?}", x.column_names());
    Ok(())
}

fn print_selection(selection: &SelectionReport) {
    println!("Dropped (correlated): {:?}", selection.correlated);
    println!("Dropped (insignificant): {:?}", selection.insignificant);
}
