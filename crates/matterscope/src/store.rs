//! In-memory device snapshot store.
//!
//! Readers load an `Arc` of the whole map (atomic refcount bump, no lock);
//! the writer clones the map, mutates the clone, and stores a new `Arc`.
//! Ingestion is the only writer, so the clone-and-swap is not raced.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::snapshot::DeviceSnapshot;
use crate::snapshot::Endpoint;

/// Supplies the endpoint set for a device slug.
///
/// The scoring core never queries storage directly; request handlers go
/// through this seam so tests can substitute fixed fixtures.
#[async_trait]
pub trait EndpointProvider: Send + Sync {
    async fn endpoints(&self, slug: &str) -> Option<Vec<Endpoint>>;
}

#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: ArcSwap<HashMap<String, Arc<DeviceSnapshot>>>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a device's endpoint snapshot, returning the new revision.
    pub fn replace_endpoints(&self, slug: &str, endpoints: Vec<Endpoint>) -> u64 {
        let mut devices = HashMap::clone(&self.devices.load());
        let revision = devices.get(slug).map(|s| s.revision + 1).unwrap_or(1);
        devices.insert(
            slug.to_string(),
            Arc::new(DeviceSnapshot {
                slug: slug.to_string(),
                endpoints,
                revision,
            }),
        );
        self.devices.store(Arc::new(devices));
        revision
    }

    /// Remove a device. Returns true if it was present.
    pub fn remove(&self, slug: &str) -> bool {
        let mut devices = HashMap::clone(&self.devices.load());
        let removed = devices.remove(slug).is_some();
        if removed {
            self.devices.store(Arc::new(devices));
        }
        removed
    }

    pub fn get(&self, slug: &str) -> Option<Arc<DeviceSnapshot>> {
        self.devices.load().get(slug).cloned()
    }

    /// Snapshot of the whole store, essentially free for readers.
    pub fn snapshot(&self) -> Arc<HashMap<String, Arc<DeviceSnapshot>>> {
        self.devices.load_full()
    }

    pub fn len(&self) -> usize {
        self.devices.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.load().is_empty()
    }
}

#[async_trait]
impl EndpointProvider for DeviceStore {
    async fn endpoints(&self, slug: &str) -> Option<Vec<Endpoint>> {
        self.get(slug).map(|snapshot| snapshot.endpoints.clone())
    }
}
