//! Listings against one connected cluster
//!
//! Thin adapters from the Kubernetes wire types to the core record types.
//! Quantity strings pass through untouched; normalization belongs to the
//! aggregators.

use crate::metrics::NodeMetrics;
use k8s_openapi::api::core::v1::{Node, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kapacity_core::error::CapacityError;
use kapacity_core::source::{
    ClusterConnection, NodeCondition, NodeRecord, NodeTaint, NodeUsageRecord, PodRecord,
};
use kube::api::{Api, ListParams};
use kube::Client;
use std::collections::BTreeMap;

/// An authenticated connection to one cluster
pub struct KubeConnection {
    cluster: String,
    client: Client,
}

impl std::fmt::Debug for KubeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeConnection")
            .field("cluster", &self.cluster)
            .finish_non_exhaustive()
    }
}

impl KubeConnection {
    pub fn new(cluster: String, client: Client) -> Self {
        Self { cluster, client }
    }
}

impl ClusterConnection for KubeConnection {
    async fn list_nodes(&self) -> Result<Vec<NodeRecord>, CapacityError> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .map_err(|e| CapacityError::ClusterUnreachable {
                cluster: self.cluster.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(cluster = %self.cluster, count = list.items.len(), "listed nodes");
        Ok(list.items.into_iter().map(node_record).collect())
    }

    async fn list_all_pods(&self) -> Result<Vec<PodRecord>, CapacityError> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| CapacityError::ClusterUnreachable {
                cluster: self.cluster.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(cluster = %self.cluster, count = list.items.len(), "listed pods");
        Ok(list.items.into_iter().map(pod_record).collect())
    }

    async fn list_node_usage(&self) -> Result<Vec<NodeUsageRecord>, CapacityError> {
        let metrics: Api<NodeMetrics> = Api::all(self.client.clone());
        let list = metrics
            .list(&ListParams::default())
            .await
            .map_err(|e| CapacityError::MetricsUnavailable {
                cluster: self.cluster.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(cluster = %self.cluster, count = list.items.len(), "listed node metrics");
        Ok(list.items.into_iter().map(usage_record).collect())
    }
}

fn quantity_map(map: Option<BTreeMap<String, Quantity>>) -> BTreeMap<String, String> {
    map.unwrap_or_default()
        .into_iter()
        .map(|(name, quantity)| (name, quantity.0))
        .collect()
}

fn node_record(node: Node) -> NodeRecord {
    let status = node.status.unwrap_or_default();
    let spec = node.spec.unwrap_or_default();
    NodeRecord {
        name: node.metadata.name.unwrap_or_default(),
        capacity: quantity_map(status.capacity),
        allocatable: quantity_map(status.allocatable),
        taints: spec
            .taints
            .unwrap_or_default()
            .into_iter()
            .map(|taint| NodeTaint {
                key: taint.key,
                value: taint.value,
                effect: taint.effect,
            })
            .collect(),
        kubelet_version: status
            .node_info
            .map(|info| info.kubelet_version)
            .unwrap_or_default(),
        conditions: status
            .conditions
            .unwrap_or_default()
            .into_iter()
            .map(|condition| NodeCondition {
                kind: condition.type_,
                status: condition.status,
                reason: condition.reason,
            })
            .collect(),
    }
}

fn pod_record(pod: Pod) -> PodRecord {
    PodRecord {
        node_name: pod.spec.and_then(|spec| spec.node_name),
    }
}

fn usage_record(metrics: NodeMetrics) -> NodeUsageRecord {
    NodeUsageRecord {
        node_name: metrics.metadata.name.unwrap_or_default(),
        usage: quantity_map(Some(metrics.usage)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{NodeSpec, NodeStatus, NodeSystemInfo, PodSpec, Taint};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn quantities(entries: &[(&str, &str)]) -> BTreeMap<String, Quantity> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), Quantity(value.to_string())))
            .collect()
    }

    #[test]
    fn converts_node_to_record() {
        let node = Node {
            metadata: ObjectMeta {
                name: Some("worker-1".to_string()),
                ..ObjectMeta::default()
            },
            spec: Some(NodeSpec {
                taints: Some(vec![Taint {
                    key: "dedicated".to_string(),
                    value: Some("ingest".to_string()),
                    effect: "NoSchedule".to_string(),
                    time_added: None,
                }]),
                ..NodeSpec::default()
            }),
            status: Some(NodeStatus {
                capacity: Some(quantities(&[("cpu", "4"), ("memory", "16Gi")])),
                allocatable: Some(quantities(&[("cpu", "3900m"), ("memory", "14Gi")])),
                node_info: Some(NodeSystemInfo {
                    kubelet_version: "v1.29.3".to_string(),
                    ..NodeSystemInfo::default()
                }),
                ..NodeStatus::default()
            }),
        };

        let record = node_record(node);

        assert_eq!(record.name, "worker-1");
        assert_eq!(record.capacity.get("cpu"), Some(&"4".to_string()));
        assert_eq!(record.allocatable.get("memory"), Some(&"14Gi".to_string()));
        assert_eq!(record.taints.len(), 1);
        assert_eq!(record.taints[0].key, "dedicated");
        assert_eq!(record.kubelet_version, "v1.29.3");
    }

    #[test]
    fn converts_bare_node_to_empty_record() {
        let record = node_record(Node::default());

        assert_eq!(record.name, "");
        assert!(record.capacity.is_empty());
        assert!(record.taints.is_empty());
        assert_eq!(record.kubelet_version, "");
    }

    #[test]
    fn pod_record_carries_optional_assignment() {
        let scheduled = Pod {
            spec: Some(PodSpec {
                node_name: Some("worker-1".to_string()),
                ..PodSpec::default()
            }),
            ..Pod::default()
        };
        let pending = Pod::default();

        assert_eq!(pod_record(scheduled).node_name.as_deref(), Some("worker-1"));
        assert_eq!(pod_record(pending).node_name, None);
    }

    #[test]
    fn converts_node_metrics_to_usage_record() {
        let metrics = NodeMetrics {
            metadata: ObjectMeta {
                name: Some("worker-1".to_string()),
                ..ObjectMeta::default()
            },
            usage: quantities(&[("cpu", "231754416n"), ("memory", "2Gi")]),
            ..NodeMetrics::default()
        };

        let record = usage_record(metrics);

        assert_eq!(record.node_name, "worker-1");
        assert_eq!(record.usage.get("cpu"), Some(&"231754416n".to_string()));
        assert_eq!(record.usage.get("memory"), Some(&"2Gi".to_string()));
    }
}
