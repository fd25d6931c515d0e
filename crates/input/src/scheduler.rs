//! Per-frame callback registry.
//!
//! Callbacks run once per tick in registration order. `register` hands back a
//! [`CallbackHandle`]; `unregister` removes exactly that entry, so the same
//! function registered twice runs twice and must be removed twice.

use std::collections::BTreeMap;
use tracing::trace;

/// Token identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackHandle(u64);

type Callback<Ctx> = Box<dyn FnMut(&mut Ctx)>;

/// Ordered registry of per-frame callbacks over a context `Ctx`.
pub struct FrameScheduler<Ctx> {
    // Handles are monotonic, so key order is registration order.
    entries: BTreeMap<CallbackHandle, Callback<Ctx>>,
    next_handle: u64,
}

impl<Ctx> Default for FrameScheduler<Ctx> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_handle: 0,
        }
    }
}

impl<Ctx> std::fmt::Debug for FrameScheduler<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("handles", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<Ctx: 'static> FrameScheduler<Ctx> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure. Captured values play the role of bound arguments.
    pub fn register<F>(&mut self, callback: F) -> CallbackHandle
    where
        F: FnMut(&mut Ctx) + 'static,
    {
        self.next_handle += 1;
        let handle = CallbackHandle(self.next_handle);
        self.entries.insert(handle, Box::new(callback));
        trace!(?handle, callbacks = self.entries.len(), "callback registered");
        handle
    }

    /// Register an explicit state struct and the free function that updates it.
    pub fn register_state<S: 'static>(&mut self, mut state: S, update: fn(&mut S, &mut Ctx)) -> CallbackHandle {
        self.register(move |ctx| update(&mut state, ctx))
    }

    /// Remove one registration. Returns false if the handle was not registered.
    pub fn unregister(&mut self, handle: CallbackHandle) -> bool {
        let removed = self.entries.remove(&handle).is_some();
        trace!(?handle, removed, "callback unregistered");
        removed
    }

    /// Whether `handle` is still registered.
    pub fn contains(&self, handle: CallbackHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Invoke every callback once, in registration order.
    pub fn run_all(&mut self, ctx: &mut Ctx) {
        for callback in self.entries.values_mut() {
            callback(ctx);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
