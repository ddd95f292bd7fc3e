//! Name → window registry of open windows

use std::collections::BTreeMap;

use super::WindowId;

/// Open windows by unique name, iterated in name order
#[derive(Debug, Default)]
pub struct Registry {
    windows: BTreeMap<String, WindowId>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` under `name`; false if the name is taken
    pub fn insert(&mut self, name: &str, id: WindowId) -> bool {
        if self.windows.contains_key(name) {
            return false;
        }
        self.windows.insert(name.to_owned(), id);
        true
    }

    /// Unregister `name` if it maps to `id`
    pub fn remove(&mut self, name: &str, id: WindowId) -> bool {
        if self.windows.get(name) == Some(&id) {
            self.windows.remove(name);
            true
        } else {
            false
        }
    }

    /// Window registered under `name`
    pub fn get(&self, name: &str) -> Option<WindowId> {
        self.windows.get(name).copied()
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    /// Number of registered windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True when no window is registered
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Snapshot of registered ids in name order
    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.values().copied().collect()
    }

    /// Registered names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_unique_names() {
        let mut ids: SlotMap<WindowId, ()> = SlotMap::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let mut registry = Registry::new();

        assert!(registry.insert("main", a));
        assert!(!registry.insert("main", b));
        assert_eq!(registry.get("main"), Some(a));

        // only the owner of the name can remove it
        assert!(!registry.remove("main", b));
        assert!(registry.remove("main", a));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stable_order() {
        let mut ids: SlotMap<WindowId, ()> = SlotMap::with_key();
        let mut registry = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.insert(name, ids.insert(()));
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.len(), 3);
    }
}
