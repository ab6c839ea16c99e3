//! Insertion-ordered slot assignment for endpoint keys.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::core::types::EndpointKey;

/// Assigns stable, insertion-ordered slot numbers to endpoint keys.
///
/// The first resolve for a key allocates the next sequential 0-based slot;
/// every later resolve returns the same slot. Check-then-insert runs inside
/// a single critical section so concurrent callers can never allocate
/// duplicate slots or lose an assignment. Slots are never reused and the
/// index never shrinks.
#[derive(Debug, Default)]
pub struct KeyIndex {
    slots: Mutex<HashMap<EndpointKey, usize>>,
}

impl KeyIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        KeyIndex {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the slot for `key`, allocating the next one on first sight.
    pub fn resolve(&self, key: &EndpointKey) -> usize {
        let mut slots = self.slots.lock();
        let next = slots.len();
        *slots.entry(key.clone()).or_insert(next)
    }

    /// Number of distinct keys seen so far
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// True if no key has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
