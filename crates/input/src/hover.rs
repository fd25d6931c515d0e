//! Frame-to-frame hover diffing.

use crate::events::{EventKind, InteractionEvent};
use crate::query::IntersectionRecord;
use vrdock_core::DeviceId;

/// Last frame's ray intersections for one device.
#[derive(Debug, Default, Clone)]
pub struct HoverBuffer {
    previous: Vec<IntersectionRecord>,
}

impl HoverBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records stored by the last diff.
    pub fn records(&self) -> &[IntersectionRecord] {
        &self.previous
    }

    /// Compare `current` with the stored set, produce leave events (for
    /// targets that vanished, in previous order) then enter events (for
    /// targets that appeared, in current order), and store `current`.
    pub fn diff(&mut self, current: Vec<IntersectionRecord>, dispatcher: DeviceId) -> Vec<InteractionEvent> {
        let mut events = Vec::new();

        for old in &self.previous {
            if !current.iter().any(|new| new.target == old.target) {
                events.push(InteractionEvent::new(EventKind::PointerLeave, old.target, dispatcher));
            }
        }
        for new in &current {
            if !self.previous.iter().any(|old| old.target == new.target) {
                events.push(InteractionEvent::new(EventKind::PointerEnter, new.target, dispatcher));
            }
        }

        self.previous = current;
        events
    }

    /// Empty the buffer, returning a leave event for every stored target.
    pub fn release(&mut self, dispatcher: DeviceId) -> Vec<InteractionEvent> {
        self.diff(Vec::new(), dispatcher)
    }
}
