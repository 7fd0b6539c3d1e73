//! Kubernetes backend for kapacity
//!
//! Implements the `kapacity-core` seam traits against real clusters: the
//! cluster directory and connection resolver are driven by a kubeconfig
//! (one context per cluster), listings go through the kube client, and live
//! usage comes from the `metrics.k8s.io/v1beta1` API.

pub mod backend;
pub mod connection;
pub mod metrics;

pub use backend::KubeBackend;
pub use connection::KubeConnection;
