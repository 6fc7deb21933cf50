//! Telemetry data model: the endpoint/cluster shape devices report.

use matterscope_registry::ClusterId;
use matterscope_registry::DeviceTypeId;
use matterscope_registry::EndpointId;
use serde::Deserialize;
use serde::Serialize;

/// Which role a cluster instance plays on its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSide {
    /// The endpoint implements the cluster (the device offers the feature).
    #[default]
    Server,
    /// The endpoint controls the cluster on other nodes.
    Client,
}

/// A cluster as instantiated on one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInstance {
    pub cluster_id: ClusterId,

    #[serde(default)]
    pub side: ClusterSide,

    /// Attribute names the device reported for this instance.
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Command names the device reported accepting.
    #[serde(default)]
    pub commands: Vec<String>,

    /// Raw FeatureMap bitmap as reported by the device.
    #[serde(default)]
    pub feature_map: u32,
}

impl ClusterInstance {
    pub fn new(cluster_id: ClusterId, side: ClusterSide) -> Self {
        Self {
            cluster_id,
            side,
            attributes: Vec::new(),
            commands: Vec::new(),
            feature_map: 0,
        }
    }

    pub fn server(cluster_id: ClusterId) -> Self {
        Self::new(cluster_id, ClusterSide::Server)
    }

    pub fn client(cluster_id: ClusterId) -> Self {
        Self::new(cluster_id, ClusterSide::Client)
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }
}

/// One endpoint of a device snapshot.
///
/// A missing cluster list in the wire form deserializes to an empty one, so
/// malformed telemetry degrades to zero contributions instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub endpoint_id: EndpointId,
    pub device_type_id: DeviceTypeId,

    #[serde(default)]
    pub clusters: Vec<ClusterInstance>,
}

impl Endpoint {
    pub fn new(endpoint_id: EndpointId, device_type_id: DeviceTypeId) -> Self {
        Self {
            endpoint_id,
            device_type_id,
            clusters: Vec::new(),
        }
    }

    pub fn with_clusters<I>(mut self, clusters: I) -> Self
    where
        I: IntoIterator<Item = ClusterInstance>,
    {
        self.clusters = clusters.into_iter().collect();
        self
    }
}

/// The stored telemetry unit for one device, replaced wholesale on ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub slug: String,
    pub endpoints: Vec<Endpoint>,
    /// Monotonic per-device counter bumped on every ingest.
    pub revision: u64,
}
