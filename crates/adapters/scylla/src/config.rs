//! Cluster connection configuration.

use serde::Deserialize;

/// Default bound on fire-and-forget writes awaiting the cluster.
pub const DEFAULT_MAX_IN_FLIGHT: u32 = 4096;

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScyllaConfig {
    /// `host:port` of the first node to contact.
    pub contact_point: String,
    /// Datacenter whose replicas are preferred by the load balancer.
    pub local_datacenter: String,
    /// Keyspace every statement runs in.
    pub keyspace: String,
    /// Maximum number of submitted writes not yet acknowledged.
    pub max_in_flight: u32,
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            contact_point: "localhost:9042".to_string(),
            local_datacenter: "datacenter1".to_string(),
            keyspace: "social_media".to_string(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}
