//! LocalStack on k3d installer CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use l8k::commands;
use l8k::config::InstallConfig;

/// LocalStack on k3d - local Kubernetes deployment helper.
#[derive(Parser)]
#[command(
    name = "l8k",
    version,
    about = "Run LocalStack on a local k3d Kubernetes cluster",
    long_about = "Provision a local k3d cluster inside Docker, install the\n\
                  LocalStack Helm chart, and wait until the stack is ready.\n\n\
                  Every step is idempotent - re-running the same command picks\n\
                  up where a previous run left off."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the cluster and install LocalStack.
    Install,

    /// Deploy the demo serverless application against LocalStack.
    Deploy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("l8k=debug")
    } else {
        EnvFilter::new("l8k=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = InstallConfig::from_env();

    match cli.command {
        Commands::Install => commands::install::run(&config).await,
        Commands::Deploy => commands::deploy::run(&config).await,
    }
}
