//! aspu: permutation-calibrated SPU / aSPU pathway tests.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "aspu",
    version,
    about = "Adaptive Sum of Powered Score tests for pathway association",
    long_about = "Tests a gene pathway for association with a binary or continuous trait\n\
                  using SPU statistics over a range of powers, calibrated by permutation."
)]
struct Cli {
    /// Number of threads to use (0 = all cores)
    #[arg(long, default_value = "0", global = true)]
    threads: usize,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the SPU / aSPU test for one pathway
    Pathway(commands::pathway::PathwayArgs),

    /// List the SNPs assigned to each gene window
    MapGenes(commands::map_genes::MapGenesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .ok();

    tracing::info!("aspu v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {} threads", rayon::current_num_threads());

    match cli.command {
        Commands::Pathway(args) => commands::pathway::run(args),
        Commands::MapGenes(args) => commands::map_genes::run(args),
    }
}
