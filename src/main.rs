//! kapacity: capacity reporting across a fleet of Kubernetes clusters

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use kapacity_core::CapacityService;
use kapacity_core::error::CapacityError;
use kapacity_core::source::ClusterDirectory;
use kapacity_kube::KubeBackend;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// kapacity: capacity reports for Kubernetes clusters
#[derive(Parser, Debug)]
#[command(name = "kapacity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to kubeconfig file (default: $KUBECONFIG, then ~/.kube/config)
    #[arg(long)]
    kubeconfig: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capacity summary for every cluster in the kubeconfig
    Clusters,
    /// Per-node capacity detail for one cluster
    Nodes {
        /// Cluster id (kubeconfig context name)
        cluster: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Logs go to stderr; stdout stays pure JSON. Quiet down noisy HTTP deps.
    let filter = if cli.debug {
        EnvFilter::from_default_env()
            .add_directive(Level::DEBUG.into())
            .add_directive("hyper=info".parse().unwrap())
            .add_directive("tower=info".parse().unwrap())
            .add_directive("rustls=info".parse().unwrap())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    // Install crypto provider (needed for rustls)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let backend = load_backend(cli.kubeconfig)?;
    let service = CapacityService::new(backend.clone(), backend.clone());

    match cli.command {
        Command::Clusters => {
            let report = service.fleet_capacity().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Nodes { cluster } => {
            let cluster_ref = backend
                .list_clusters()
                .await?
                .into_iter()
                .find(|c| c.id == cluster)
                .ok_or_else(|| eyre!("cluster {cluster:?} not found in kubeconfig"))?;
            let details = service.node_capacity(&cluster_ref).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
    }

    Ok(())
}

/// Build the kube backend from the CLI flag, falling back to the ambient
/// kubeconfig resolution.
fn load_backend(kubeconfig: Option<String>) -> Result<KubeBackend, CapacityError> {
    match resolve_kubeconfig_path(kubeconfig) {
        Some(path) => KubeBackend::from_file(path),
        None => KubeBackend::from_default_config(),
    }
}

/// Resolve an explicit kubeconfig path from the CLI flag, if any
fn resolve_kubeconfig_path(kubeconfig: Option<String>) -> Option<PathBuf> {
    kubeconfig.map(PathBuf::from)
}
