//! Keyboard input state and key mappings
//!
//! Windows read the backend's current key state once per tick and apply a
//! [`KeyBindings`] mapping. There is no event queue at this level.

use serde::{Deserialize, Serialize};

/// Keys the viewer can query from a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Escape key
    Escape,
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// X key
    X,
    /// Z key
    Z,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Space bar
    Space,
}

/// Mapping from viewer actions to keys
///
/// Each action fires when any of its keys is held. Camera actions are only
/// consulted by camera windows; every window honours `close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Request the window to close
    pub close: Vec<Key>,
    /// Move the eye along the up axis
    pub up: Vec<Key>,
    /// Move the eye against the up axis
    pub down: Vec<Key>,
    /// Strafe left
    pub left: Vec<Key>,
    /// Strafe right
    pub right: Vec<Key>,
    /// Move the eye toward the gaze point
    pub forward: Vec<Key>,
    /// Move the eye away from the gaze point
    pub backward: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            close: vec![Key::Escape],
            up: vec![Key::W, Key::ArrowUp],
            down: vec![Key::S, Key::ArrowDown],
            left: vec![Key::A],
            right: vec![Key::D],
            forward: vec![Key::Z],
            backward: vec![Key::X],
        }
    }
}

impl KeyBindings {
    /// True if any key in `keys` is held according to `pressed`
    pub fn any_held(keys: &[Key], mut pressed: impl FnMut(Key) -> bool) -> bool {
        keys.iter().any(|key| pressed(*key))
    }
}
