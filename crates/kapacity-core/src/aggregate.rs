//! Capacity aggregation over cluster, node, and fleet views
//!
//! [`CapacityService`] joins three independently fetched datasets (node
//! inventory, pod placement, live usage) into consolidated reports. It is a
//! stateless service object holding only its injected collaborators; every
//! call resolves a fresh connection and builds its result from scratch.

use crate::error::CapacityError;
use crate::quantity::{ResourceClass, ResourceQuantity};
use crate::source::{ClusterConnection, ClusterDirectory, ConnectionResolver, NodeRecord};
use crate::types::{
    ClusterCapacityDetails, ClusterFailure, ClusterRef, FleetCapacityReport, NodeCapacityDetails,
};
use futures::future;
use std::collections::{BTreeMap, HashMap};

/// Aggregates capacity reports for one or many clusters
pub struct CapacityService<D, R> {
    directory: D,
    resolver: R,
}

/// Normalized usage reading for one node
struct NodeUsage {
    cpu: ResourceQuantity,
    memory: ResourceQuantity,
}

impl<D, R> CapacityService<D, R>
where
    D: ClusterDirectory,
    R: ConnectionResolver,
{
    pub fn new(directory: D, resolver: R) -> Self {
        Self {
            directory,
            resolver,
        }
    }

    /// Fleet-wide capacity report, best effort
    ///
    /// Fans out one aggregation per registered cluster and merges the
    /// outcomes. Unreachable clusters land in `failures`; they never abort
    /// the call or hide other clusters' results. Output order follows
    /// directory enumeration order.
    pub async fn fleet_capacity(&self) -> Result<FleetCapacityReport, CapacityError> {
        let clusters = self.directory.list_clusters().await?;
        tracing::debug!(count = clusters.len(), "aggregating fleet capacity");

        let outcomes = future::join_all(
            clusters
                .into_iter()
                .map(|cluster| async move { (self.cluster_capacity(&cluster).await, cluster) }),
        )
        .await;

        let mut report = FleetCapacityReport {
            clusters: Vec::new(),
            failures: Vec::new(),
        };
        for (outcome, cluster) in outcomes {
            match outcome {
                Ok(details) => report.clusters.push(details),
                Err(err) => {
                    tracing::warn!(cluster = %cluster.id, error = %err, "skipping cluster in fleet report");
                    report.failures.push(ClusterFailure {
                        cluster,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Capacity summary for one cluster
    ///
    /// A single node listing; capacity and allocatable totals are the exact
    /// sums of the per-node quantities. No partial result on failure.
    pub async fn cluster_capacity(
        &self,
        cluster: &ClusterRef,
    ) -> Result<ClusterCapacityDetails, CapacityError> {
        let conn = self.resolver.resolve(cluster).await?;
        let nodes = conn.list_nodes().await?;

        let mut cpu_capacity = ResourceQuantity::zero(ResourceClass::Cpu);
        let mut memory_capacity = ResourceQuantity::zero(ResourceClass::Memory);
        let mut cpu_allocatable = ResourceQuantity::zero(ResourceClass::Cpu);
        let mut memory_allocatable = ResourceQuantity::zero(ResourceClass::Memory);
        let mut node_versions = Vec::with_capacity(nodes.len());

        for node in &nodes {
            node_versions.push(node.kubelet_version.clone());
            cpu_capacity =
                cpu_capacity.checked_add(&quantity_entry(&node.capacity, ResourceClass::Cpu)?)?;
            memory_capacity = memory_capacity
                .checked_add(&quantity_entry(&node.capacity, ResourceClass::Memory)?)?;
            cpu_allocatable = cpu_allocatable
                .checked_add(&quantity_entry(&node.allocatable, ResourceClass::Cpu)?)?;
            memory_allocatable = memory_allocatable
                .checked_add(&quantity_entry(&node.allocatable, ResourceClass::Memory)?)?;
        }

        Ok(ClusterCapacityDetails {
            cluster: cluster.clone(),
            node_count: nodes.len(),
            node_versions,
            cpu_capacity,
            memory_capacity,
            cpu_allocatable,
            memory_allocatable,
        })
    }

    /// Per-node capacity detail for one cluster
    ///
    /// Joins the node inventory with pod placement and live usage. A metrics
    /// backend failure aborts the whole call; a node merely missing from the
    /// usage listing only degrades that node's usage fields to `None`.
    pub async fn node_capacity(
        &self,
        cluster: &ClusterRef,
    ) -> Result<Vec<NodeCapacityDetails>, CapacityError> {
        let conn = self.resolver.resolve(cluster).await?;

        let usage_rows = conn.list_node_usage().await?;
        let mut usage_by_node: HashMap<String, NodeUsage> = HashMap::new();
        for row in usage_rows {
            let usage = NodeUsage {
                cpu: quantity_entry(&row.usage, ResourceClass::Cpu)?,
                memory: quantity_entry(&row.usage, ResourceClass::Memory)?,
            };
            usage_by_node.insert(row.node_name, usage);
        }

        let nodes = conn.list_nodes().await?;
        let pods = conn.list_all_pods().await?;

        // Group pods by assigned node in one pass; unscheduled pods have no
        // node name and are skipped.
        let mut pods_by_node: HashMap<&str, usize> = HashMap::new();
        for pod in &pods {
            if let Some(node_name) = pod.node_name.as_deref() {
                *pods_by_node.entry(node_name).or_insert(0) += 1;
            }
        }

        let mut details = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let usage = usage_by_node.get(&node.name);
            details.push(NodeCapacityDetails {
                name: node.name.clone(),
                status_reasons: status_reasons(node),
                pod_count: pods_by_node.get(node.name.as_str()).copied().unwrap_or(0),
                taint_count: node.taints.len(),
                cpu_capacity: quantity_entry(&node.capacity, ResourceClass::Cpu)?,
                memory_capacity: quantity_entry(&node.capacity, ResourceClass::Memory)?,
                cpu_allocatable: quantity_entry(&node.allocatable, ResourceClass::Cpu)?,
                memory_allocatable: quantity_entry(&node.allocatable, ResourceClass::Memory)?,
                cpu_usage: usage.map(|u| u.cpu),
                memory_usage: usage.map(|u| u.memory),
            });
        }
        Ok(details)
    }
}

/// Parse the quantity for a class from a resource map
///
/// A missing entry counts as zero, matching the zero-value lookup the
/// listings rely on for exotic resource names.
fn quantity_entry(
    map: &BTreeMap<String, String>,
    class: ResourceClass,
) -> Result<ResourceQuantity, CapacityError> {
    let key = match class {
        ResourceClass::Cpu => "cpu",
        ResourceClass::Memory => "memory",
    };
    match map.get(key) {
        Some(text) => ResourceQuantity::parse(class, text),
        None => Ok(ResourceQuantity::zero(class)),
    }
}

/// Map node condition types to their reported reasons
fn status_reasons(node: &NodeRecord) -> BTreeMap<String, String> {
    node.conditions
        .iter()
        .map(|condition| {
            let reason = condition
                .reason
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| condition.status.clone());
            (condition.kind.clone(), reason)
        })
        .collect()
}
