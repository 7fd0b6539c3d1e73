//! Hand-declared `metrics.k8s.io/v1beta1` NodeMetrics resource
//!
//! k8s-openapi does not ship the metrics API group, so the resource is
//! declared here with just enough trait plumbing for the kube client to
//! list it. Served by metrics-server; listing fails when no metrics
//! backend is installed.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live usage reading for one node, as served by metrics-server
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub metadata: ObjectMeta,
    /// Reading time, RFC 3339
    pub timestamp: Option<String>,
    /// Measurement window, e.g. `"20.045s"`
    pub window: Option<String>,
    /// Resource name to quantity, e.g. `"cpu" -> "231754416n"`
    #[serde(default)]
    pub usage: BTreeMap<String, Quantity>,
}

impl k8s_openapi::Resource for NodeMetrics {
    const API_VERSION: &'static str = "metrics.k8s.io/v1beta1";
    const GROUP: &'static str = "metrics.k8s.io";
    const KIND: &'static str = "NodeMetrics";
    const VERSION: &'static str = "v1beta1";
    const URL_PATH_SEGMENT: &'static str = "nodes";
    type Scope = k8s_openapi::ClusterResourceScope;
}

impl k8s_openapi::Metadata for NodeMetrics {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &Self::Ty {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Self::Ty {
        &mut self.metadata
    }
}
