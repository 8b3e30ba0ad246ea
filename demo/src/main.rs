use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kdsearch::{io, persist, BuildConfig, KdTree, LinearIndex, NearestNeighbor, SplitPolicy};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build a KD-tree once, query it many times", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index the points of a CSV file and persist the tree.
    Build {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        tree: PathBuf,
        #[arg(long, value_enum, default_value_t = SplitPolicy::Variance)]
        policy: SplitPolicy,
    },
    /// Answer nearest neighbor queries against a persisted tree.
    Query {
        #[arg(long)]
        tree: PathBuf,
        #[arg(long)]
        queries: PathBuf,
        #[arg(long, default_value = "query_results.csv")]
        output: PathBuf,
    },
    /// Answer the same queries with a linear scan, for checking results.
    Brute {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        queries: PathBuf,
        #[arg(long, default_value = "query_results_truth.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Build {
            input,
            tree,
            policy,
        } => {
            let points = io::read_points(&input)
                .with_context(|| format!("failed to load points from {}", input.display()))?;
            let index = KdTree::build(points, BuildConfig::new(policy))
                .with_context(|| format!("failed to index points from {}", input.display()))?;
            persist::write_tree(&index, &tree)
                .with_context(|| format!("failed to write tree to {}", tree.display()))?;
        }
        Commands::Query {
            tree,
            queries,
            output,
        } => {
            let index = persist::read_tree(&tree)
                .with_context(|| format!("failed to read tree from {}", tree.display()))?;
            let query_points = io::read_points(&queries)
                .with_context(|| format!("failed to load queries from {}", queries.display()))?;
            let results = index
                .query(&query_points)
                .with_context(|| format!("failed to answer queries from {}", queries.display()))?;
            io::write_results(&output, &results)
                .with_context(|| format!("failed to write results to {}", output.display()))?;
        }
        Commands::Brute {
            input,
            queries,
            output,
        } => {
            let points = io::read_points(&input)
                .with_context(|| format!("failed to load points from {}", input.display()))?;
            let index = LinearIndex::new(points)
                .with_context(|| format!("failed to index points from {}", input.display()))?;
            let query_points = io::read_points(&queries)
                .with_context(|| format!("failed to load queries from {}", queries.display()))?;
            let results = index
                .query(&query_points)
                .with_context(|| format!("failed to answer queries from {}", queries.display()))?;
            io::write_results(&output, &results)
                .with_context(|| format!("failed to write results to {}", output.display()))?;
        }
    }
    info!("done");
    Ok(())
}
