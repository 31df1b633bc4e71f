//! Process-local registry for retrieved artifacts.
//!
//! Retrieved bytes are registered in a [`ResourceStore`] and addressed by a
//! `blob:quote-viewer/<uuid>` address, the way a browser hands out object URLs.
//! Registration returns a [`ResourceHandle`] that owns the entry: releasing
//! the handle, explicitly or by dropping it, removes the bytes from the store.
//! The store counts registrations and releases so a leaked handle is visible.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

const ADDRESS_SCHEME: &str = "blob:quote-viewer/";

/// Address of a registered resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAddress(String);

impl ResourceAddress {
    fn new(id: Uuid) -> Self {
        Self(format!("{ADDRESS_SCHEME}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entry {
    bytes: Bytes,
    media_type: String,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<ResourceAddress, Entry>,
    created: u64,
    released: u64,
}

/// Registry of live resources. Shared between the fetcher and every handle it
/// produced, so it is always used behind an `Arc`.
#[derive(Default)]
pub struct ResourceStore {
    registry: Mutex<Registry>,
}

impl fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry();
        f.debug_struct("ResourceStore")
            .field("live", &registry.entries.len())
            .field("created", &registry.created)
            .field("released", &registry.released)
            .finish()
    }
}

impl ResourceStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // Registry updates never panic midway, so a poisoned lock still holds
        // consistent data.
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `bytes` and return the handle that owns them.
    pub fn register(
        self: &Arc<Self>,
        bytes: Bytes,
        media_type: impl Into<String>,
    ) -> ResourceHandle {
        let address = ResourceAddress::new(Uuid::new_v4());
        let media_type = media_type.into();
        let len = bytes.len();
        {
            let mut registry = self.registry();
            registry.entries.insert(
                address.clone(),
                Entry {
                    bytes: bytes.clone(),
                    media_type: media_type.clone(),
                },
            );
            registry.created += 1;
        }
        debug!(%address, len, "registered local resource");
        ResourceHandle {
            address,
            media_type,
            bytes,
            store: Arc::clone(self),
            released: false,
        }
    }

    /// Resolve an address to its bytes, or `None` once it has been released.
    pub fn resolve(&self, address: &ResourceAddress) -> Option<(Bytes, String)> {
        self.registry()
            .entries
            .get(address)
            .map(|e| (e.bytes.clone(), e.media_type.clone()))
    }

    pub fn contains(&self, address: &ResourceAddress) -> bool {
        self.registry().entries.contains_key(address)
    }

    /// Number of resources currently registered.
    pub fn live(&self) -> usize {
        self.registry().entries.len()
    }

    /// Total registrations since the store was created.
    pub fn created(&self) -> u64 {
        self.registry().created
    }

    /// Total releases since the store was created.
    pub fn released(&self) -> u64 {
        self.registry().released
    }

    fn release(&self, address: &ResourceAddress) {
        let mut registry = self.registry();
        if registry.entries.remove(address).is_some() {
            registry.released += 1;
            debug!(%address, "released local resource");
        } else {
            warn!(%address, "release of unknown local resource");
        }
    }
}

/// Exclusive owner of one registered resource.
///
/// The resource stays addressable for as long as the handle lives. Call
/// [`release`](ResourceHandle::release) to free it at a known point; a handle
/// that goes out of scope unreleased is released on drop.
pub struct ResourceHandle {
    address: ResourceAddress,
    media_type: String,
    bytes: Bytes,
    store: Arc<ResourceStore>,
    released: bool,
}

impl ResourceHandle {
    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Release the resource now. Consumes the handle, so it can only happen once.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.store.release(&self.address);
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("address", &self.address)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}
