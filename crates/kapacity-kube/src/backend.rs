//! Kubeconfig-backed cluster directory and connection resolver
//!
//! Each kubeconfig context is treated as one registered cluster: the context
//! name is the cluster id, the referenced cluster entry supplies the display
//! name. Resolution builds a fresh authenticated client per call; nothing is
//! cached.

use crate::connection::KubeConnection;
use kapacity_core::error::CapacityError;
use kapacity_core::source::{ClusterDirectory, ConnectionResolver};
use kapacity_core::types::ClusterRef;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

/// Kubeconfig-driven backend for the capacity service
#[derive(Clone, Debug)]
pub struct KubeBackend {
    kubeconfig: Kubeconfig,
}

impl KubeBackend {
    pub fn new(kubeconfig: Kubeconfig) -> Self {
        Self { kubeconfig }
    }

    /// Load from an explicit kubeconfig file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CapacityError> {
        let kubeconfig = Kubeconfig::read_from(path.as_ref())
            .map_err(|e| CapacityError::Directory(e.to_string()))?;
        Ok(Self::new(kubeconfig))
    }

    /// Load from `$KUBECONFIG`, falling back to `~/.kube/config`
    pub fn from_default_config() -> Result<Self, CapacityError> {
        if let Ok(path) = std::env::var("KUBECONFIG") {
            return Self::from_file(path);
        }
        let home = dirs_next::home_dir()
            .ok_or_else(|| CapacityError::Directory("could not determine home directory".into()))?;
        Self::from_file(home.join(".kube").join("config"))
    }

    /// Parse a kubeconfig from YAML text
    pub fn from_yaml(text: &str) -> Result<Self, CapacityError> {
        let kubeconfig: Kubeconfig =
            serde_yaml::from_str(text).map_err(|e| CapacityError::Directory(e.to_string()))?;
        Ok(Self::new(kubeconfig))
    }
}

impl ClusterDirectory for KubeBackend {
    async fn list_clusters(&self) -> Result<Vec<ClusterRef>, CapacityError> {
        let clusters = self
            .kubeconfig
            .contexts
            .iter()
            .map(|named| {
                let display = named
                    .context
                    .as_ref()
                    .map(|ctx| ctx.cluster.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| named.name.clone());
                ClusterRef {
                    id: named.name.clone(),
                    name: display,
                }
            })
            .collect();
        Ok(clusters)
    }
}

impl ConnectionResolver for KubeBackend {
    type Conn = KubeConnection;

    async fn resolve(&self, cluster: &ClusterRef) -> Result<KubeConnection, CapacityError> {
        let unreachable = |reason: String| CapacityError::ClusterUnreachable {
            cluster: cluster.id.clone(),
            reason,
        };

        let options = KubeConfigOptions {
            context: Some(cluster.id.clone()),
            ..KubeConfigOptions::default()
        };
        let config = Config::from_custom_kubeconfig(self.kubeconfig.clone(), &options)
            .await
            .map_err(|e| unreachable(e.to_string()))?;
        let client = Client::try_from(config).map_err(|e| unreachable(e.to_string()))?;

        tracing::debug!(cluster = %cluster.id, "resolved cluster connection");
        Ok(KubeConnection::new(cluster.id.clone(), client))
    }
}
