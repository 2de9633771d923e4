//! The ordered set of currently held keys.
//!
//! Order matters: the device replays keys in the order it receives them, so
//! a modifier pressed before a letter must stay ahead of it.  A `Vec` with a
//! linear membership check is the right structure here; a keyboard rarely
//! reports more than six to ten simultaneous keys.

use crate::keymap::KeyId;

/// Insertion-ordered, duplicate-free sequence of pressed keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressedKeySet {
    keys: Vec<KeyId>,
}

impl PressedKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.keys.iter().any(|k| k == code)
    }

    /// Appends `code` if absent.  Returns `true` when the set changed.
    pub fn insert(&mut self, code: &str) -> bool {
        if self.contains(code) {
            return false;
        }
        self.keys.push(KeyId::from(code));
        true
    }

    /// Removes `code`, keeping the relative order of the remaining keys.
    /// Returns `true` when the key was present.
    pub fn remove(&mut self, code: &str) -> bool {
        match self.keys.iter().position(|k| k == code) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empties the set.  Returns `true` when it held anything.
    pub fn clear(&mut self) -> bool {
        let changed = !self.keys.is_empty();
        self.keys.clear();
        changed
    }

    pub fn as_slice(&self) -> &[KeyId] {
        &self.keys
    }

    pub fn to_vec(&self) -> Vec<KeyId> {
        self.keys.clone()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyId> {
        self.keys.iter()
    }
}
