//! Window/object membership tables
//!
//! Membership is many-to-many and kept in two tables: window → (object
//! name → object) and object → (window name → window). Every mutation
//! updates both sides before returning, so the tables are symmetric
//! whenever they can be observed.

use std::collections::BTreeMap;

use slotmap::SecondaryMap;

use super::ObjectId;
use crate::window::WindowId;

/// Symmetric window/object link tables
#[derive(Debug, Default)]
pub struct Associations {
    by_window: SecondaryMap<WindowId, BTreeMap<String, ObjectId>>,
    by_object: SecondaryMap<ObjectId, BTreeMap<String, WindowId>>,
}

impl Associations {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `object` into `window` under `object_name`
    ///
    /// A different object already linked under the same name is unlinked
    /// from `window` and returned.
    pub fn link(
        &mut self,
        window: WindowId,
        window_name: &str,
        object: ObjectId,
        object_name: &str,
    ) -> Option<ObjectId> {
        let displaced = self
            .by_window
            .entry(window)?
            .or_default()
            .insert(object_name.to_owned(), object)
            .filter(|old| *old != object);

        if let Some(old) = displaced {
            if let Some(windows) = self.by_object.get_mut(old) {
                windows.retain(|_, w| *w != window);
            }
        }

        if let Some(entry) = self.by_object.entry(object) {
            entry.or_default().insert(window_name.to_owned(), window);
        }

        displaced
    }

    /// Remove the link between `window` and `object`, returning whether one existed
    pub fn unlink(&mut self, window: WindowId, object: ObjectId) -> bool {
        let mut found = false;
        if let Some(objects) = self.by_window.get_mut(window) {
            let before = objects.len();
            objects.retain(|_, o| *o != object);
            found |= objects.len() != before;
        }
        if let Some(windows) = self.by_object.get_mut(object) {
            let before = windows.len();
            windows.retain(|_, w| *w != window);
            found |= windows.len() != before;
        }
        found
    }

    /// Drop every link that references `window`, returning the objects it held
    pub fn purge_window(&mut self, window: WindowId) -> Vec<ObjectId> {
        let objects: Vec<ObjectId> = self
            .by_window
            .remove(window)
            .map(|map| map.into_values().collect())
            .unwrap_or_default();

        for object in &objects {
            if let Some(windows) = self.by_object.get_mut(*object) {
                windows.retain(|_, w| *w != window);
            }
        }
        objects
    }

    /// Drop every link that references `object`, returning the windows that held it
    pub fn purge_object(&mut self, object: ObjectId) -> Vec<WindowId> {
        let windows: Vec<WindowId> = self
            .by_object
            .remove(object)
            .map(|map| map.into_values().collect())
            .unwrap_or_default();

        for window in &windows {
            if let Some(objects) = self.by_window.get_mut(*window) {
                objects.retain(|_, o| *o != object);
            }
        }
        windows
    }

    /// Objects linked into `window`, by name
    pub fn objects_of(&self, window: WindowId) -> impl Iterator<Item = (&str, ObjectId)> + '_ {
        self.by_window
            .get(window)
            .into_iter()
            .flat_map(|map| map.iter().map(|(name, id)| (name.as_str(), *id)))
    }

    /// Windows `object` is linked into, by name
    pub fn windows_of(&self, object: ObjectId) -> impl Iterator<Item = (&str, WindowId)> + '_ {
        self.by_object
            .get(object)
            .into_iter()
            .flat_map(|map| map.iter().map(|(name, id)| (name.as_str(), *id)))
    }

    /// Object linked into `window` under `name`
    pub fn object_named(&self, window: WindowId, name: &str) -> Option<ObjectId> {
        self.by_window.get(window)?.get(name).copied()
    }

    /// True when `window` and `object` are linked
    pub fn contains(&self, window: WindowId, object: ObjectId) -> bool {
        self.by_window
            .get(window)
            .is_some_and(|map| map.values().any(|o| *o == object))
    }

    /// True when every link is recorded on both sides
    pub fn is_consistent(&self) -> bool {
        let windows_ok = self.by_window.iter().all(|(window, objects)| {
            objects.values().all(|object| {
                self.by_object
                    .get(*object)
                    .is_some_and(|windows| windows.values().any(|w| *w == window))
            })
        });
        let objects_ok = self.by_object.iter().all(|(object, windows)| {
            windows.values().all(|window| {
                self.by_window
                    .get(*window)
                    .is_some_and(|objects| objects.values().any(|o| *o == object))
            })
        });
        windows_ok && objects_ok
    }
}
