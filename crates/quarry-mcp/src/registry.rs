//! Name-to-handler mapping tables.
//!
//! The router never dispatches on raw strings. Each kind of addressable item
//! (tool, resource, prompt) gets a [`Registry`] built once at startup that maps its
//! public name to a closed enum variant. Anything outside the table is unknown.

use std::collections::HashMap;

/// Registry of addressable items keyed by public name.
#[derive(Debug, Clone)]
pub struct Registry<K> {
    entries: HashMap<String, K>,
    order: Vec<String>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Registry<K> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register an item. Re-registering a name replaces the entry in place.
    pub fn register(&mut self, name: impl Into<String>, key: K) {
        let name = name.into();
        if self.entries.insert(name.clone(), key).is_none() {
            self.order.push(name);
        }
    }

    /// Items in registration order.
    pub fn list(&self) -> impl Iterator<Item = &K> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Get the number of registered items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy> Registry<K> {
    /// Resolve a name to its key.
    pub fn resolve(&self, name: &str) -> Option<K> {
        self.entries.get(name).copied()
    }
}

impl<N: Into<String>, K> FromIterator<(N, K)> for Registry<K> {
    fn from_iter<I: IntoIterator<Item = (N, K)>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for (name, key) in iter {
            registry.register(name, key);
        }
        registry
    }
}
