//! Report types produced by the capacity aggregators
//!
//! These are built fresh per aggregation call and serialized straight to the
//! caller; nothing here is persisted.

use crate::quantity::ResourceQuantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to a registered cluster
///
/// Owned by the cluster directory; reports carry a copy for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRef {
    /// Opaque identifier understood by the directory and resolver
    pub id: String,
    /// Display name
    pub name: String,
}

/// Capacity summary for one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCapacityDetails {
    pub cluster: ClusterRef,
    pub node_count: usize,
    /// Kubelet version per node, in node listing order
    pub node_versions: Vec<String>,
    pub cpu_capacity: ResourceQuantity,
    pub memory_capacity: ResourceQuantity,
    pub cpu_allocatable: ResourceQuantity,
    pub memory_allocatable: ResourceQuantity,
}

/// Per-node capacity detail for one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCapacityDetails {
    pub name: String,
    /// Node condition type mapped to the reported reason
    pub status_reasons: BTreeMap<String, String>,
    pub pod_count: usize,
    pub taint_count: usize,
    pub cpu_capacity: ResourceQuantity,
    pub memory_capacity: ResourceQuantity,
    pub cpu_allocatable: ResourceQuantity,
    pub memory_allocatable: ResourceQuantity,
    /// Live usage; `None` when the metrics listing had no row for this node.
    /// Distinct from a node genuinely reporting zero usage.
    pub cpu_usage: Option<ResourceQuantity>,
    pub memory_usage: Option<ResourceQuantity>,
}

/// Fleet-wide capacity report: per-cluster successes plus per-cluster
/// failure annotations
///
/// One unreachable cluster never erases the other clusters' results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCapacityReport {
    pub clusters: Vec<ClusterCapacityDetails>,
    pub failures: Vec<ClusterFailure>,
}

/// Error annotation for a cluster that could not be aggregated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterFailure {
    pub cluster: ClusterRef,
    pub error: String,
}

/// Reserved per-resource-type breakdown shape
///
/// Not yet populated by any aggregator; kept for a future per-resource view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetric {
    pub resource_type: String,
    pub allocatable: String,
    pub utilization: String,
    pub request: String,
    pub limit: String,
}
