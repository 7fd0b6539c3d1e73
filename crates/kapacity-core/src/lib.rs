//! Core capacity aggregation for kapacity
//!
//! Pure domain logic: unit-aware quantity arithmetic, the report types, the
//! seam traits a cluster backend implements, and the aggregation service
//! that joins node inventory, pod placement, and live usage into reports.
//! No Kubernetes wire types appear here; `kapacity-kube` provides the real
//! backend.

pub mod aggregate;
pub mod error;
pub mod quantity;
pub mod source;
pub mod types;

pub use aggregate::CapacityService;
pub use error::CapacityError;
pub use quantity::{ResourceClass, ResourceQuantity};
pub use types::{
    ClusterCapacityDetails, ClusterFailure, ClusterRef, FleetCapacityReport, NodeCapacityDetails,
};
