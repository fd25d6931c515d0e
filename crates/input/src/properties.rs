//! Numeric properties addressed by (object, name).
//!
//! Continuous controllers never own the value they drive; they hold a
//! [`PropertyBinding`] and mutate the store through it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vrdock_core::ObjectId;

/// Address of a numeric property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyBinding {
    /// Owning object.
    pub target: ObjectId,
    /// Property name on that object.
    pub property: String,
}

impl PropertyBinding {
    /// Bind `property` on `target`.
    pub fn new(target: ObjectId, property: impl Into<String>) -> Self {
        Self {
            target,
            property: property.into(),
        }
    }
}

/// Externally owned numeric values.
#[derive(Debug, Default, Clone)]
pub struct PropertyStore {
    values: HashMap<PropertyBinding, f32>,
}

impl PropertyStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, if set.
    pub fn get(&self, binding: &PropertyBinding) -> Option<f32> {
        self.values.get(binding).copied()
    }

    /// Overwrite a value.
    pub fn set(&mut self, binding: &PropertyBinding, value: f32) {
        self.values.insert(binding.clone(), value);
    }

    /// Add `delta` (an unset property counts as 0) and return the new value.
    pub fn add(&mut self, binding: &PropertyBinding, delta: f32) -> f32 {
        let value = self.values.entry(binding.clone()).or_insert(0.0);
        *value += delta;
        *value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_starts_from_zero() {
        let mut store = PropertyStore::new();
        let binding = PropertyBinding::new(ObjectId(1), "volume");
        assert_eq!(store.get(&binding), None);
        assert_eq!(store.add(&binding, 2.5), 2.5);
        assert_eq!(store.add(&binding, -1.0), 1.5);
    }

    #[test]
    fn bindings_are_distinct_per_name() {
        let mut store = PropertyStore::new();
        store.set(&PropertyBinding::new(ObjectId(1), "a"), 1.0);
        store.set(&PropertyBinding::new(ObjectId(1), "b"), 2.0);
        assert_eq!(store.get(&PropertyBinding::new(ObjectId(1), "a")), Some(1.0));
        assert_eq!(store.get(&PropertyBinding::new(ObjectId(1), "b")), Some(2.0));
    }
}
