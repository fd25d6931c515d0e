//! Typed interaction events and per-kind observer lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vrdock_core::{DeviceId, ObjectId};

/// Closed set of interaction event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Trigger pressed.
    SelectStart,
    /// Trigger released.
    SelectEnd,
    /// Full press/release cycle completed.
    Select,
    /// Grip pressed.
    SqueezeStart,
    /// Grip released.
    SqueezeEnd,
    /// Full grip press/release cycle completed.
    Squeeze,
    /// The active pointer's ray started intersecting the target.
    PointerEnter,
    /// The active pointer's ray stopped intersecting the target.
    PointerLeave,
}

impl EventKind {
    /// Select family (trigger).
    pub fn is_select(self) -> bool {
        matches!(self, Self::SelectStart | Self::SelectEnd | Self::Select)
    }

    /// Squeeze family (grip).
    pub fn is_squeeze(self) -> bool {
        matches!(self, Self::SqueezeStart | Self::SqueezeEnd | Self::Squeeze)
    }

    /// Hover transitions.
    pub fn is_hover(self) -> bool {
        matches!(self, Self::PointerEnter | Self::PointerLeave)
    }

    /// DOM-style event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelectStart => "selectstart",
            Self::SelectEnd => "selectend",
            Self::Select => "select",
            Self::SqueezeStart => "squeezestart",
            Self::SqueezeEnd => "squeezeend",
            Self::Squeeze => "squeeze",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered to one target, attributed to the device that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteractionEvent {
    /// What happened.
    pub kind: EventKind,
    /// Receiving object.
    pub target: ObjectId,
    /// Originating device, for haptics and per-device bookkeeping.
    pub dispatcher: DeviceId,
}

impl InteractionEvent {
    /// Build an event.
    pub fn new(kind: EventKind, target: ObjectId, dispatcher: DeviceId) -> Self {
        Self {
            kind,
            target,
            dispatcher,
        }
    }
}

type Observer<C> = Box<dyn FnMut(&InteractionEvent, &mut C)>;

/// Observer lists keyed by event kind. `C` is whatever side channel the
/// owning widget hands to its observers.
pub struct Observers<C> {
    by_kind: BTreeMap<EventKind, Vec<Observer<C>>>,
}

impl<C> Default for Observers<C> {
    fn default() -> Self {
        Self {
            by_kind: BTreeMap::new(),
        }
    }
}

impl<C> std::fmt::Debug for Observers<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<_, _> = self
            .by_kind
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("Observers").field("counts", &counts).finish()
    }
}

impl<C> Observers<C> {
    /// Empty observer table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer for `kind`.
    pub fn on<F>(&mut self, kind: EventKind, observer: F)
    where
        F: FnMut(&InteractionEvent, &mut C) + 'static,
    {
        self.by_kind.entry(kind).or_default().push(Box::new(observer));
    }

    /// Call every observer registered for the event's kind, in registration
    /// order. Returns how many ran.
    pub fn notify(&mut self, event: &InteractionEvent, ctx: &mut C) -> usize {
        match self.by_kind.get_mut(&event.kind) {
            Some(list) => {
                for observer in list.iter_mut() {
                    observer(event, ctx);
                }
                list.len()
            }
            None => 0,
        }
    }

    /// Number of observers for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_disjoint() {
        for kind in [
            EventKind::SelectStart,
            EventKind::SelectEnd,
            EventKind::Select,
            EventKind::SqueezeStart,
            EventKind::SqueezeEnd,
            EventKind::Squeeze,
            EventKind::PointerEnter,
            EventKind::PointerLeave,
        ] {
            let families = [kind.is_select(), kind.is_squeeze(), kind.is_hover()];
            assert_eq!(families.iter().filter(|f| **f).count(), 1, "{kind}");
        }
    }

    #[test]
    fn observers_only_see_their_kind() {
        let mut observers: Observers<Vec<EventKind>> = Observers::new();
        observers.on(EventKind::Select, |event, seen| seen.push(event.kind));
        observers.on(EventKind::Select, |event, seen| seen.push(event.kind));

        let mut seen = Vec::new();
        let select = InteractionEvent::new(EventKind::Select, ObjectId(1), DeviceId(0));
        let enter = InteractionEvent::new(EventKind::PointerEnter, ObjectId(1), DeviceId(0));
        assert_eq!(observers.notify(&select, &mut seen), 2);
        assert_eq!(observers.notify(&enter, &mut seen), 0);
        assert_eq!(seen, vec![EventKind::Select, EventKind::Select]);
    }

    #[test]
    fn kind_names_match_dom_events() {
        assert_eq!(EventKind::SqueezeStart.to_string(), "squeezestart");
        assert_eq!(EventKind::PointerLeave.as_str(), "pointerleave");
    }
}
