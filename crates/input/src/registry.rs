//! Pointable and grippable target sets.

use std::collections::HashSet;
use vrdock_core::ObjectId;

/// Insertion-ordered set of object ids.
#[derive(Debug, Default, Clone)]
pub struct TargetSet {
    order: Vec<ObjectId>,
    members: HashSet<ObjectId>,
}

impl TargetSet {
    /// Add `id`. Returns false if it was already a member.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Remove `id`. Returns false if it was not a member.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|member| *member != id);
            true
        } else {
            false
        }
    }

    /// Membership test.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    /// Members in insertion order.
    pub fn as_slice(&self) -> &[ObjectId] {
        &self.order
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Which target set a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Eligible for pointing rays.
    Pointable,
    /// Eligible for grip-sphere scans.
    Grippable,
}

/// The two target sets of an interaction world. An object may sit in either,
/// both or neither.
#[derive(Debug, Default, Clone)]
pub struct TargetRegistry {
    pointable: TargetSet,
    grippable: TargetSet,
}

impl TargetRegistry {
    /// Create empty sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` eligible for pointing rays.
    pub fn make_pointable(&mut self, id: ObjectId) -> bool {
        self.pointable.insert(id)
    }

    /// Make `id` eligible for grip scans.
    pub fn make_grippable(&mut self, id: ObjectId) -> bool {
        self.grippable.insert(id)
    }

    /// Borrow one of the sets.
    pub fn set(&self, kind: TargetKind) -> &TargetSet {
        match kind {
            TargetKind::Pointable => &self.pointable,
            TargetKind::Grippable => &self.grippable,
        }
    }

    /// Pointable set.
    pub fn pointable(&self) -> &TargetSet {
        &self.pointable
    }

    /// Grippable set.
    pub fn grippable(&self) -> &TargetSet {
        &self.grippable
    }

    /// Drop `id` from both sets, e.g. when its node is despawned.
    pub fn forget(&mut self, id: ObjectId) {
        self.pointable.remove(id);
        self.grippable.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_preserve_insertion_order_without_duplicates() {
        let mut registry = TargetRegistry::new();
        assert!(registry.make_pointable(ObjectId(3)));
        assert!(registry.make_pointable(ObjectId(1)));
        assert!(!registry.make_pointable(ObjectId(3)));
        assert_eq!(registry.pointable().as_slice(), &[ObjectId(3), ObjectId(1)]);
    }

    #[test]
    fn membership_is_independent_per_set() {
        let mut registry = TargetRegistry::new();
        registry.make_pointable(ObjectId(1));
        registry.make_grippable(ObjectId(1));
        registry.make_grippable(ObjectId(2));

        assert!(registry.set(TargetKind::Pointable).contains(ObjectId(1)));
        assert!(!registry.set(TargetKind::Pointable).contains(ObjectId(2)));
        assert_eq!(registry.grippable().len(), 2);
    }

    #[test]
    fn forget_removes_from_both_sets() {
        let mut registry = TargetRegistry::new();
        registry.make_pointable(ObjectId(1));
        registry.make_grippable(ObjectId(1));
        registry.forget(ObjectId(1));
        assert!(registry.pointable().is_empty());
        assert!(registry.grippable().is_empty());
    }
}
