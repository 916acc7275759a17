//! Graph Propagator - CLI
//!
//! Builds the propagation matrix for an edge list and reports on it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graph_propagator::io::{
    EdgeListFile, FeatureJsonFile, FeatureSource, GraphSource, TargetCsvFile, TargetSource,
};
use graph_propagator::report::parameter_table;
use graph_propagator::{compute_propagator, Matrix, PropagationMode, Propagator, RunConfig};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "propagator")]
#[command(about = "Build personalized-propagation matrices from graph edge lists")]
struct Cli {
    /// YAML config file (default: ./propagator.yaml if present)
    #[arg(long, env = "PROPAGATOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the propagator for an edge list
    Compute {
        /// Edge list CSV (header row, two endpoint columns)
        #[arg(long)]
        edges: Option<PathBuf>,

        /// Feature JSON (node id -> feature indices)
        #[arg(long)]
        features: Option<PathBuf>,

        /// Target CSV
        #[arg(long)]
        target: Option<PathBuf>,

        /// Teleport probability in (0, 1]
        #[arg(short, long)]
        alpha: Option<f32>,

        /// exact | approximate
        #[arg(short, long)]
        mode: Option<PropagationMode>,

        /// Keep edges as listed instead of reading them as undirected
        #[arg(long)]
        directed: bool,

        /// Write the propagator as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective parameters
    Params,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,graph_propagator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = RunConfig::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Compute {
            edges,
            features,
            target,
            alpha,
            mode,
            directed,
            output,
        } => {
            if let Some(path) = edges {
                config.edge_path = path;
            }
            if features.is_some() {
                config.features_path = features;
            }
            if target.is_some() {
                config.target_path = target;
            }
            if let Some(alpha) = alpha {
                config.alpha = alpha;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if directed {
                config.undirected = false;
            }
            run_compute(&config, output)
        }
        Commands::Params => {
            print!("{}", parameter_table(&config));
            Ok(())
        }
    }
}

fn run_compute(config: &RunConfig, output: Option<PathBuf>) -> Result<()> {
    print!("{}", parameter_table(config));

    let propagation = config.propagation()?;

    let graph = EdgeListFile::new(&config.edge_path, config.undirected)
        .load_graph()
        .with_context(|| format!("loading graph from {}", config.edge_path.display()))?;
    tracing::info!(
        "Loaded graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    if let Some(path) = &config.features_path {
        let features = FeatureJsonFile::new(path)
            .load_features()
            .with_context(|| format!("loading features from {}", path.display()))?;
        let (rows, cols) = features.shape();
        tracing::info!("Loaded features: {} x {}", rows, cols);
        if rows != graph.node_count() {
            tracing::warn!(
                "Feature rows ({}) do not match graph nodes ({})",
                rows,
                graph.node_count()
            );
        }
    }

    if let Some(path) = &config.target_path {
        let target = TargetCsvFile::new(path, config.target_column.as_str())
            .load_target()
            .with_context(|| format!("loading target from {}", path.display()))?;
        tracing::info!("Loaded {} target values", target.len());
        if target.len() != graph.node_count() {
            tracing::warn!(
                "Target length ({}) does not match graph nodes ({})",
                target.len(),
                graph.node_count()
            );
        }
    }

    let start = Instant::now();
    let propagator = compute_propagator(&graph, &propagation)?;
    tracing::info!(
        "Computed {} propagator in {:?}",
        propagator.mode(),
        start.elapsed()
    );
    log_summary(&propagator);

    if let Some(path) = output {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer(std::io::BufWriter::new(file), &propagator)
            .with_context(|| format!("writing propagator to {}", path.display()))?;
        tracing::info!("Wrote propagator to {}", path.display());
    }

    Ok(())
}

fn log_summary(propagator: &Propagator) {
    let values = propagator.matrix().as_slice();
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let n = propagator.dimension();
    tracing::info!(
        "Propagator {}x{}: min {:.6}, max {:.6}, trace {:.6}",
        n,
        n,
        min,
        max,
        propagator.matrix().trace()
    );
}
