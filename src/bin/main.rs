//! svmkern Command Line Interface
//!
//! Computes polynomial kernel matrices over CSV feature files and turns
//! classifier scores into validated binary labels and calibrated probabilities.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use svmkern::core::{DotBackend, FeatureProvider, KernelConfig, Result, SVMError};
use svmkern::persistence::SerializableLabels;
use svmkern::{BinaryLabels, DenseFeatures, Kernel, PolyKernel};

#[derive(Parser)]
#[command(name = "svmkern")]
#[command(about = "Polynomial kernels and calibrated binary labels")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "svmkern contributors")]
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
    /// Compute a polynomial kernel matrix
    Kernel(KernelArgs),
    /// Build binary labels from scores and optionally calibrate them
    Labels(LabelArgs),
}

#[derive(Args)]
struct KernelArgs {
    /// Left-hand feature file (CSV)
    #[arg(long)]
    data: PathBuf,

    /// Right-hand feature file (CSV), defaults to the left-hand one
    #[arg(long)]
    rhs: Option<PathBuf>,

    /// Polynomial degree
    #[arg(long, default_value = "2.0")]
    degree: f64,

    /// Use the homogeneous kernel (no unit bias)
    #[arg(long)]
    homogeneous: bool,

    /// Normalize by the mean self-similarity of the data
    #[arg(long)]
    rescale: bool,

    /// Dot product implementation
    #[arg(long, default_value = "manual")]
    backend: CliDotBackend,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliDotBackend {
    /// Sequential accumulation
    #[value(name = "manual")]
    Manual,
    /// Four-way unrolled accumulation
    #[value(name = "unrolled")]
    Unrolled,
}

impl From<CliDotBackend> for DotBackend {
    fn from(cli_backend: CliDotBackend) -> Self {
        match cli_backend {
            CliDotBackend::Manual => DotBackend::Manual,
            CliDotBackend::Unrolled => DotBackend::Unrolled,
        }
    }
}

#[derive(Args)]
struct LabelArgs {
    /// Score file, one score per line
    #[arg(long)]
    scores: PathBuf,

    /// Scores at or above the threshold are labeled +1
    #[arg(short, long, default_value = "0.0")]
    threshold: f64,

    /// Convert scores into probabilities
    #[arg(long)]
    calibrate: bool,

    /// Sigmoid slope (fit from the scores when both a and b are 0)
    #[arg(short, default_value = "0.0", allow_hyphen_values = true)]
    a: f64,

    /// Sigmoid offset (fit from the scores when both a and b are 0)
    #[arg(short, default_value = "0.0", allow_hyphen_values = true)]
    b: f64,

    /// Save the labels as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
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
        Commands::Kernel(args) => kernel_command(args),
        Commands::Labels(args) => labels_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn kernel_command(args: KernelArgs) -> Result<()> {
    info!("Loading features from: {:?}", args.data);
    let lhs: Arc<dyn FeatureProvider> = Arc::new(DenseFeatures::from_file(&args.data)?);

    let rhs: Arc<dyn FeatureProvider> = match &args.rhs {
        Some(path) => {
            info!("Loading right-hand features from: {path:?}");
            Arc::new(DenseFeatures::from_file(path)?)
        }
        None => Arc::clone(&lhs),
    };

    info!(
        "Parameters: degree={}, homogeneous={}, rescale={}, backend={:?}",
        args.degree, args.homogeneous, args.rescale, args.backend
    );

    let mut kernel = PolyKernel::with_config(KernelConfig {
        degree: args.degree,
        homogeneous: args.homogeneous,
        rescale: args.rescale,
        dot_backend: args.backend.into(),
        ..KernelConfig::default()
    })?;

    kernel.init(lhs, rhs)?;
    let matrix = kernel.kernel_matrix()?;
    kernel.cleanup();

    println!("# Kernel matrix {}x{}", matrix.len(), matrix.first().map_or(0, Vec::len));
    println!("# Scale: {:.6}", kernel.scale());
    for row in &matrix {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        println!("{}", line.join(" "));
    }

    Ok(())
}

fn labels_command(args: LabelArgs) -> Result<()> {
    info!("Loading scores from: {:?}", args.scores);
    let scores = read_scores(&args.scores)?;

    let mut labels = BinaryLabels::from_scores(&scores, args.threshold);
    labels.ensure_valid(Some("cli"))?;

    if args.calibrate {
        info!("Calibrating scores with a={}, b={}", args.a, args.b);
        labels.scores_to_probabilities(args.a, args.b)?;
    }

    let values = labels.values().ok_or(SVMError::MissingValues)?;

    println!("# Labels for {} samples", labels.num_labels());
    println!(
        "# Format: sample_index label {}",
        if args.calibrate { "probability" } else { "score" }
    );
    for (i, (label, value)) in labels.labels().iter().zip(&values).enumerate() {
        println!("{i} {label:.0} {value:.6}");
    }

    if let Some(output_path) = args.output {
        SerializableLabels::from_binary(&labels).save_to_file(&output_path)?;
        info!("Labels saved to: {output_path:?}");
    }

    Ok(())
}

fn read_scores(path: &Path) -> Result<Vec<f64>> {
    let file = File::open(path).map_err(SVMError::IoError)?;
    parse_scores(BufReader::new(file))
}

fn parse_scores<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    let mut scores = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(SVMError::IoError)?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let score = line.parse::<f64>().map_err(|_| {
            SVMError::ParseError(format!("Invalid score on line {}: {}", line_num + 1, line))
        })?;
        scores.push(score);
    }

    Ok(scores)
}
