//! Map cache
//!
//! Maps are shared between everyone who asked for them and freed as soon as
//! the last [`MapHandle`] goes away. The cache itself only keeps weak
//! references, so it never extends a map's lifetime.

use crate::error::Result;
use crate::map::{MapLoader, MapResource};
use dashmap::DashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// Keyed cache of live map resources
pub struct MapCache {
    /// Live maps indexed by map name
    maps: DashMap<String, Weak<MapResource>>,

    loader: Box<dyn MapLoader>,
}

impl MapCache {
    /// Create a new map cache
    pub fn new(loader: impl MapLoader + 'static) -> Self {
        Self {
            maps: DashMap::new(),
            loader: Box::new(loader),
        }
    }

    /// Get a map from the cache or load it
    ///
    /// # Returns
    /// A handle keeping the map alive for as long as it is held
    pub fn acquire(self: &Arc<Self>, name: &str) -> Result<MapHandle> {
        if let Some(resource) = self.maps.get(name).and_then(|entry| entry.upgrade()) {
            tracing::debug!("Map cache hit: {}", name);
            return Ok(MapHandle {
                resource,
                cache: Arc::clone(self),
            });
        }

        let resource = Arc::new(self.loader.load(name)?);
        self.maps.insert(name.to_string(), Arc::downgrade(&resource));
        Ok(MapHandle {
            resource,
            cache: Arc::clone(self),
        })
    }

    /// Whether a live map with this name is cached
    pub fn contains(&self, name: &str) -> bool {
        self.maps
            .get(name)
            .map(|entry| entry.strong_count() > 0)
            .unwrap_or(false)
    }

    /// Number of cached maps
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    fn release(&self, name: &str, resource: &Arc<MapResource>) {
        // Only the handle being dropped still holds the map
        if Arc::strong_count(resource) == 1 {
            let released = self
                .maps
                .remove_if(name, |_, entry| Weak::ptr_eq(entry, &Arc::downgrade(resource)))
                .is_some();
            if released {
                tracing::debug!("Map released: {}", name);
            }
        }
    }
}

impl fmt::Debug for MapCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCache").field("maps", &self.maps.len()).finish()
    }
}

/// Scope-bound reference to a cached map
pub struct MapHandle {
    resource: Arc<MapResource>,
    cache: Arc<MapCache>,
}

impl MapHandle {
    pub fn name(&self) -> &str {
        self.resource.name.get()
    }
}

impl Deref for MapHandle {
    type Target = MapResource;

    fn deref(&self) -> &MapResource {
        &self.resource
    }
}

impl Clone for MapHandle {
    fn clone(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        let name = self.resource.name.get().to_string();
        self.cache.release(&name, &self.resource);
    }
}

impl fmt::Debug for MapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapHandle({})", self.name())
    }
}
