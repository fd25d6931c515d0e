//! The interaction world: one explicit context owning every piece of shared
//! interaction state (scene, target sets, devices, scheduler, properties).
//!
//! A tick runs scheduled callbacks in registration order, then hover-diffs
//! the active device. Primary actions are fed in between ticks through
//! [`InteractionWorld::handle_action`].

use crate::config::InteractionConfig;
use crate::device::{HapticPulse, InputDevice, InputSource, PrimaryAction};
use crate::events::InteractionEvent;
use crate::properties::PropertyStore;
use crate::query::{intersect_targets, GripSphere, IntersectionRecord};
use crate::registry::TargetRegistry;
use crate::scene::SceneGraph;
use crate::scheduler::{CallbackHandle, FrameScheduler};
use crate::InteractionError;
use tracing::{debug, info, trace};
use vrdock_core::{DeviceId, ObjectId, SimTick, Transform3D};

/// Everything a scheduled callback may read or mutate.
#[derive(Debug)]
pub struct WorldState {
    scene: SceneGraph,
    targets: TargetRegistry,
    properties: PropertyStore,
    devices: Vec<InputDevice>,
    active: Option<DeviceId>,
    config: InteractionConfig,
    grip_sphere: GripSphere,
    haptics: Vec<HapticPulse>,
    // Leaves released by a handoff outside handle_action, delivered next tick.
    released: Vec<InteractionEvent>,
    tick: SimTick,
}

impl WorldState {
    fn new(config: InteractionConfig) -> Self {
        let grip_sphere = GripSphere::new(config.grip_radius, config.grip_detail);
        Self {
            scene: SceneGraph::new(),
            targets: TargetRegistry::new(),
            properties: PropertyStore::new(),
            devices: Vec::new(),
            active: None,
            config,
            grip_sphere,
            haptics: Vec::new(),
            released: Vec::new(),
            tick: SimTick::ZERO,
        }
    }

    /// Scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Scene graph, mutably.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Pointable / grippable sets.
    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    /// Bound numeric properties.
    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// Bound numeric properties, mutably.
    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }

    /// Active configuration.
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> SimTick {
        self.tick
    }

    /// Look up a device.
    pub fn device(&self, id: DeviceId) -> Result<&InputDevice, InteractionError> {
        self.devices
            .get(id.0 as usize)
            .ok_or(InteractionError::UnknownDevice(id))
    }

    fn device_mut(&mut self, id: DeviceId) -> Result<&mut InputDevice, InteractionError> {
        self.devices
            .get_mut(id.0 as usize)
            .ok_or(InteractionError::UnknownDevice(id))
    }

    /// All devices in construction order.
    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Device currently holding activity.
    pub fn active_device(&self) -> Option<DeviceId> {
        self.active
    }

    /// Pointing-ray intersections against the pointable set, nearest first.
    pub fn ray_intersections(&self, id: DeviceId) -> Result<Vec<IntersectionRecord>, InteractionError> {
        let device = self.device(id)?;
        let ray_space = device.ray_space();
        let Some(mut ray) = device.ray(&self.scene) else {
            return Err(InteractionError::UnknownObject(ray_space));
        };
        if let Some(range) = self.config.pointer_range {
            ray = ray.with_far(range);
        }
        Ok(intersect_targets(
            &self.scene,
            self.targets.pointable().as_slice(),
            &ray,
        ))
    }

    /// Grip-sphere intersections against the grippable set.
    pub fn grip_sphere_intersections(&self, id: DeviceId) -> Result<Vec<IntersectionRecord>, InteractionError> {
        let device = self.device(id)?;
        let grip_space = device.grip_space();
        let Some(origin) = device.grip_origin(&self.scene) else {
            return Err(InteractionError::UnknownObject(grip_space));
        };
        Ok(self.grip_sphere.scan(
            &self.scene,
            self.targets.grippable().as_slice(),
            origin,
            self.config.grip_scan,
        ))
    }

    /// Queue a haptic pulse with the configured intensity and duration.
    pub fn pulse(&mut self, id: DeviceId) -> Result<bool, InteractionError> {
        let (intensity, duration_ms) = (self.config.haptic_intensity, self.config.haptic_duration_ms);
        self.pulse_with(id, intensity, duration_ms)
    }

    /// Queue a haptic pulse. Devices without an actuator (or without a
    /// connection) silently drop it; the return value says whether it was queued.
    pub fn pulse_with(&mut self, id: DeviceId, intensity: f32, duration_ms: f32) -> Result<bool, InteractionError> {
        let device = self.device(id)?;
        let supported = device.is_connected() && device.source().is_some_and(|s| s.has_haptics);
        if !supported {
            debug!(device = %id, "dropping haptic pulse: no actuator");
            return Ok(false);
        }
        self.haptics.push(HapticPulse {
            device: id,
            intensity,
            duration_ms,
        });
        Ok(true)
    }

    /// Hand activity to `id`, clearing the previous holder in the same step.
    /// The outgoing holder's hover buffer is released as `pointerleave`
    /// events so nothing stays hovered by a device that no longer diffs.
    fn activate(&mut self, id: DeviceId) -> Vec<InteractionEvent> {
        let mut released = Vec::new();
        for device in &mut self.devices {
            let active = device.id() == id;
            if device.active && !active {
                let outgoing = device.id();
                released = device.hover.release(outgoing);
            }
            device.active = active;
            device.laser.visible = active;
        }
        self.active = Some(id);
        released
    }

    fn dispatch_hover(&mut self) -> Vec<InteractionEvent> {
        let Some(id) = self.active else {
            return Vec::new();
        };
        let connected = self.device(id).map(InputDevice::is_connected).unwrap_or(false);
        if !connected {
            return Vec::new();
        }
        let current = match self.ray_intersections(id) {
            Ok(current) => current,
            Err(err) => {
                debug!(device = %id, %err, "skipping hover diff");
                return Vec::new();
            }
        };
        match self.device_mut(id) {
            Ok(device) => device.hover.diff(current, id),
            Err(_) => Vec::new(),
        }
    }
}

/// Owns the [`WorldState`] and the frame scheduler that mutates it.
#[derive(Debug)]
pub struct InteractionWorld {
    state: WorldState,
    scheduler: FrameScheduler<WorldState>,
}

impl Default for InteractionWorld {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl InteractionWorld {
    /// Create an empty world.
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            state: WorldState::new(config),
            scheduler: FrameScheduler::new(),
        }
    }

    /// Shared state.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Shared state, mutably.
    pub fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    /// Scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.state.scene
    }

    /// Scene graph, mutably.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.state.scene
    }

    /// Bound numeric properties.
    pub fn properties(&self) -> &PropertyStore {
        &self.state.properties
    }

    /// Bound numeric properties, mutably.
    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.state.properties
    }

    /// Pointable / grippable sets.
    pub fn targets(&self) -> &TargetRegistry {
        &self.state.targets
    }

    /// Look up a device.
    pub fn device(&self, id: DeviceId) -> Result<&InputDevice, InteractionError> {
        self.state.device(id)
    }

    /// Device currently holding activity.
    pub fn active_device(&self) -> Option<DeviceId> {
        self.state.active
    }

    /// Make a scene node eligible for pointing rays.
    pub fn make_pointable(&mut self, id: ObjectId) -> Result<(), InteractionError> {
        if !self.state.scene.contains(id) {
            return Err(InteractionError::UnknownObject(id));
        }
        self.state.targets.make_pointable(id);
        Ok(())
    }

    /// Make a scene node eligible for grip scans.
    pub fn make_grippable(&mut self, id: ObjectId) -> Result<(), InteractionError> {
        if !self.state.scene.contains(id) {
            return Err(InteractionError::UnknownObject(id));
        }
        self.state.targets.make_grippable(id);
        Ok(())
    }

    /// Remove a node subtree from the scene and from both target sets.
    pub fn despawn(&mut self, id: ObjectId) -> Result<Vec<ObjectId>, InteractionError> {
        let removed = self.state.scene.despawn(id)?;
        for object in &removed {
            self.state.targets.forget(*object);
        }
        Ok(removed)
    }

    /// Construct a device bound to controller `index`, with its ray and grip
    /// spaces spawned under `root` (or as scene roots). The new device takes
    /// activity from whichever device held it.
    pub fn add_device(&mut self, index: u32, root: Option<ObjectId>) -> Result<DeviceId, InteractionError> {
        let scene = &mut self.state.scene;
        let (ray_space, grip_space) = match root {
            Some(root) => (
                scene.spawn_child(root, format!("ray-space-{index}"), Transform3D::default())?,
                scene.spawn_child(root, format!("grip-space-{index}"), Transform3D::default())?,
            ),
            None => (
                scene.spawn(format!("ray-space-{index}"), Transform3D::default()),
                scene.spawn(format!("grip-space-{index}"), Transform3D::default()),
            ),
        };

        let id = DeviceId(self.state.devices.len() as u32);
        self.state
            .devices
            .push(InputDevice::new(id, index, ray_space, grip_space));
        let released = self.state.activate(id);
        self.state.released.extend(released);
        info!(device = %id, index, "input device constructed");
        Ok(id)
    }

    /// Bind the device to an input source.
    pub fn connect(&mut self, id: DeviceId, source: InputSource) -> Result<(), InteractionError> {
        self.state.device_mut(id)?.connect(source);
        info!(device = %id, handedness = ?source.handedness, haptics = source.has_haptics, "device connected");
        Ok(())
    }

    /// Drop the device's connection and unregister every callback it owns.
    /// Activity is not reassigned.
    pub fn disconnect(&mut self, id: DeviceId) -> Result<(), InteractionError> {
        let handles = self.state.device_mut(id)?.disconnect();
        for handle in &handles {
            self.scheduler.unregister(*handle);
        }
        info!(device = %id, released = handles.len(), "device disconnected");
        Ok(())
    }

    /// Update the pointing pose (call before the tick).
    pub fn set_ray_pose(&mut self, id: DeviceId, pose: Transform3D) -> Result<(), InteractionError> {
        let ray_space = self.state.device(id)?.ray_space();
        self.state.scene.set_transform(ray_space, pose)
    }

    /// Update the grip pose (call before the tick).
    pub fn set_grip_pose(&mut self, id: DeviceId, pose: Transform3D) -> Result<(), InteractionError> {
        let grip_space = self.state.device(id)?.grip_space();
        self.state.scene.set_transform(grip_space, pose)
    }

    /// Register a per-frame callback not owned by any device.
    pub fn register_update<F>(&mut self, callback: F) -> CallbackHandle
    where
        F: FnMut(&mut WorldState) + 'static,
    {
        self.scheduler.register(callback)
    }

    /// Register a state struct + update function owned by `device`; it is
    /// unregistered automatically when the device disconnects.
    pub fn register_for_device<S: 'static>(
        &mut self,
        device: DeviceId,
        state: S,
        update: fn(&mut S, &mut WorldState),
    ) -> Result<CallbackHandle, InteractionError> {
        self.state.device(device)?;
        let handle = self.scheduler.register_state(state, update);
        self.state.device_mut(device)?.owned_callbacks.push(handle);
        Ok(handle)
    }

    /// Remove one registration. Takes effect from the next tick.
    pub fn unregister(&mut self, handle: CallbackHandle) -> bool {
        for device in &mut self.state.devices {
            device.owned_callbacks.retain(|h| *h != handle);
        }
        self.scheduler.unregister(handle)
    }

    /// Whether `handle` is still scheduled.
    pub fn is_scheduled(&self, handle: CallbackHandle) -> bool {
        self.scheduler.contains(handle)
    }

    /// Feed a primary action from a device.
    ///
    /// A `select` from a non-active device transfers activity and is consumed;
    /// the only events returned are `pointerleave`s for whatever the previous
    /// holder was hovering. Other select-family actions from non-active devices are ignored.
    /// Squeeze-family actions are never gated by activity. Returned events go
    /// first to the device's own space node, then to each intersection.
    pub fn handle_action(&mut self, id: DeviceId, action: PrimaryAction) -> Result<Vec<InteractionEvent>, InteractionError> {
        let device = self.state.device(id)?;
        if !device.is_connected() {
            debug!(device = %id, ?action, "ignoring action from disconnected device");
            return Ok(Vec::new());
        }
        let kind = action.kind();

        let (space, hits) = if kind.is_select() {
            if self.state.active != Some(id) {
                if action == PrimaryAction::Select {
                    let previous = self.state.active;
                    let released = self.state.activate(id);
                    info!(device = %id, previous = ?previous, released = released.len(), "activity handed off");
                    return Ok(released);
                }
                trace!(device = %id, ?action, "ignoring select from inactive device");
                return Ok(Vec::new());
            }
            let space = device.ray_space();
            match action {
                PrimaryAction::SelectStart => self.state.device_mut(id)?.laser.pressed = true,
                PrimaryAction::SelectEnd => self.state.device_mut(id)?.laser.pressed = false,
                _ => {}
            }
            (space, self.state.ray_intersections(id)?)
        } else {
            (device.grip_space(), self.state.grip_sphere_intersections(id)?)
        };

        let mut events = Vec::with_capacity(hits.len() + 1);
        events.push(InteractionEvent::new(kind, space, id));
        events.extend(
            hits.iter()
                .map(|hit| InteractionEvent::new(kind, hit.target, id)),
        );
        debug!(device = %id, %kind, hits = hits.len(), "dispatching primary action");
        Ok(events)
    }

    /// Run one interaction tick: scheduled callbacks, then hover diffing for
    /// the active device. Returns the hover events produced.
    pub fn tick(&mut self) -> Vec<InteractionEvent> {
        self.scheduler.run_all(&mut self.state);
        let mut events = std::mem::take(&mut self.state.released);
        events.extend(self.state.dispatch_hover());
        self.state.tick = self.state.tick.advance(1);
        events
    }

    /// Take every haptic pulse queued since the last drain.
    pub fn drain_haptics(&mut self) -> Vec<HapticPulse> {
        std::mem::take(&mut self.state.haptics)
    }
}
