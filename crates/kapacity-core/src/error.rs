//! Error types for capacity aggregation

use crate::quantity::ResourceClass;
use thiserror::Error;

/// Errors that can occur while building capacity reports
#[derive(Error, Debug)]
pub enum CapacityError {
    /// Cluster directory enumeration failed
    #[error("Cluster directory error: {0}")]
    Directory(String),

    /// Connection resolution or node/pod listing failed for a cluster
    #[error("Cluster {cluster} unreachable: {reason}")]
    ClusterUnreachable { cluster: String, reason: String },

    /// Metrics backend missing, or its node listing failed
    #[error("Node metrics unavailable for cluster {cluster}: {reason}")]
    MetricsUnavailable { cluster: String, reason: String },

    /// Addition across resource classes; signals a programming defect,
    /// not a condition callers are expected to handle
    #[error("Cannot add a {right} quantity to a {left} quantity")]
    IncompatibleUnits {
        left: ResourceClass,
        right: ResourceClass,
    },

    /// A quantity string from the wire could not be normalized
    #[error("Malformed quantity {text:?}: {reason}")]
    MalformedQuantity { text: String, reason: String },
}
