//! Seam traits for the collaborators the aggregators read from
//!
//! A backend (the kube client in `kapacity-kube`, in-memory fakes in tests)
//! implements these; the aggregators stay free of any wire concerns. Record
//! types carry quantities as raw Kubernetes quantity strings; normalization
//! happens in the aggregators via [`crate::quantity::ResourceQuantity`].

use crate::error::CapacityError;
use crate::types::ClusterRef;
use std::collections::BTreeMap;

/// One node from the inventory listing
#[derive(Debug, Clone, Default)]
pub struct NodeRecord {
    pub name: String,
    /// Resource name to quantity string, e.g. `"cpu" -> "4"`
    pub capacity: BTreeMap<String, String>,
    pub allocatable: BTreeMap<String, String>,
    pub taints: Vec<NodeTaint>,
    /// Kubelet software version reported in node status
    pub kubelet_version: String,
    pub conditions: Vec<NodeCondition>,
}

/// A scheduling taint on a node
#[derive(Debug, Clone)]
pub struct NodeTaint {
    pub key: String,
    pub value: Option<String>,
    pub effect: String,
}

/// A node status condition
#[derive(Debug, Clone)]
pub struct NodeCondition {
    /// Condition type, e.g. `Ready` or `MemoryPressure`
    pub kind: String,
    pub status: String,
    pub reason: Option<String>,
}

/// One pod from the cross-namespace placement listing
#[derive(Debug, Clone, Default)]
pub struct PodRecord {
    /// Assigned node name; `None` while the pod is unscheduled
    pub node_name: Option<String>,
}

/// Live usage reading for one node
#[derive(Debug, Clone, Default)]
pub struct NodeUsageRecord {
    pub node_name: String,
    /// Resource name to quantity string, e.g. `"cpu" -> "231754416n"`
    pub usage: BTreeMap<String, String>,
}

/// Enumerates the registered clusters
#[allow(async_fn_in_trait)]
pub trait ClusterDirectory {
    async fn list_clusters(&self) -> Result<Vec<ClusterRef>, CapacityError>;
}

/// Resolves an authenticated connection to one cluster's control plane
#[allow(async_fn_in_trait)]
pub trait ConnectionResolver {
    type Conn: ClusterConnection;

    async fn resolve(&self, cluster: &ClusterRef) -> Result<Self::Conn, CapacityError>;
}

/// Read access to one connected cluster
///
/// The three listings are independently fetched and independently failable:
/// node and pod listing failures surface as
/// [`CapacityError::ClusterUnreachable`], a usage listing failure as
/// [`CapacityError::MetricsUnavailable`]. A node merely absent from an
/// otherwise successful usage listing is not an error.
#[allow(async_fn_in_trait)]
pub trait ClusterConnection {
    async fn list_nodes(&self) -> Result<Vec<NodeRecord>, CapacityError>;

    async fn list_all_pods(&self) -> Result<Vec<PodRecord>, CapacityError>;

    async fn list_node_usage(&self) -> Result<Vec<NodeUsageRecord>, CapacityError>;
}
