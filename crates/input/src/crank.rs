//! Hand crank: a grab-rotate gesture that turns a bound numeric property.
//!
//! Squeezing the handle starts a session registered with the frame scheduler
//! and owned by the gripping device. Each tick the session measures the grip
//! angle around the crank axis, applies the shortest-path delta to the bound
//! property and spins the crank node to match. Releasing the grip (squeezeend
//! on the device's grip space) ends the session.

use crate::events::{EventKind, InteractionEvent};
use crate::properties::PropertyBinding;
use crate::scene::Collider;
use crate::scheduler::CallbackHandle;
use crate::world::{InteractionWorld, WorldState};
use crate::InteractionError;
use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};
use tracing::{debug, info};
use vrdock_core::{DeviceId, ObjectId, Transform3D};

/// Property units added per half turn unless overridden.
pub const DEFAULT_INCREMENT: f32 = 10.0;

/// Property on the crank root holding its current spin angle.
const ANGLE_PROPERTY: &str = "crank.angle";

/// Shortest-path correction of a raw angle difference (one wrap of ±2π).
pub fn wrap_angle_delta(delta: f32) -> f32 {
    if delta > PI {
        delta - TAU
    } else if delta < -PI {
        delta + TAU
    } else {
        delta
    }
}

/// Crank angle for a grip at `grip` turning around `pivot`.
///
/// The pivot-to-grip offset is projected onto the plane spanned by `u` and `w`.
/// Returns `None` when the grip sits on the axis.
fn crank_angle(pivot: Vec3, grip: Vec3, u: Vec3, w: Vec3) -> Option<f32> {
    let v = pivot - grip;
    let (x, y) = (v.dot(u), v.dot(w));
    if x * x + y * y < 1e-12 {
        return None;
    }
    Some(y.atan2(x) - PI)
}

/// Orthonormal basis of the plane orthogonal to `axis`. For the world Z axis
/// this is (X, Y).
fn plane_basis(axis: Vec3) -> (Vec3, Vec3) {
    let reference = if axis.dot(Vec3::X).abs() < 0.9 {
        Vec3::X
    } else {
        Vec3::Y
    };
    let u = (reference - axis * axis.dot(reference)).normalize();
    (u, axis.cross(u))
}

/// Per-gesture state captured by the scheduler entry.
#[derive(Debug, Clone)]
struct CrankSession {
    device: DeviceId,
    crank: ObjectId,
    pivot: Vec3,
    u: Vec3,
    w: Vec3,
    base_rotation: Quat,
    last_angle: f32,
    binding: PropertyBinding,
    angle_binding: PropertyBinding,
    increment: f32,
    since_pulse: f32,
    pulse_angle: f32,
}

fn crank_update(session: &mut CrankSession, world: &mut WorldState) {
    let Ok(device) = world.device(session.device) else {
        return;
    };
    let Some(grip) = world.scene().world_position(device.grip_space()) else {
        return;
    };
    let Some(angle) = crank_angle(session.pivot, grip, session.u, session.w) else {
        return;
    };

    let delta = wrap_angle_delta(angle - session.last_angle);
    world
        .properties_mut()
        .add(&session.binding, delta / PI * session.increment);
    world.properties_mut().set(&session.angle_binding, angle);
    session.last_angle = angle;

    if let Some(mut transform) = world.scene().transform(session.crank) {
        transform.rotation = session.base_rotation * Quat::from_rotation_y(angle);
        let _ = world.scene_mut().set_transform(session.crank, transform);
    }

    session.since_pulse += delta.abs();
    if session.since_pulse > session.pulse_angle {
        session.since_pulse = 0.0;
        let _ = world.pulse(session.device);
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveGrab {
    device: DeviceId,
    grip_space: ObjectId,
    handle: CallbackHandle,
}

/// Crank widget: a root node spinning about its local Y axis plus a grippable
/// handle.
#[derive(Debug)]
pub struct HandCrank {
    root: ObjectId,
    handle: ObjectId,
    binding: PropertyBinding,
    increment: f32,
    base_rotation: Quat,
    grab: Option<ActiveGrab>,
}

impl HandCrank {
    /// Resting pose used by the stock assembly: lifted 20 units, axle along world Z.
    pub fn default_pose() -> Transform3D {
        Transform3D::new(Vec3::new(0.0, 20.0, 0.0))
            .with_rotation(Quat::from_rotation_x(PI / 2.0))
    }

    /// Spawn the crank nodes and register the handle as grippable.
    pub fn spawn(
        world: &mut InteractionWorld,
        parent: Option<ObjectId>,
        pose: Transform3D,
        binding: PropertyBinding,
        increment: f32,
    ) -> Result<Self, InteractionError> {
        let scene = world.scene_mut();
        let root = match parent {
            Some(parent) => scene.spawn_child(parent, "hand-crank", pose)?,
            None => scene.spawn("hand-crank", pose),
        };
        let handle = scene.spawn_child(
            root,
            "hand-crank-handle",
            Transform3D::new(Vec3::new(8.0, 15.0, 0.0)),
        )?;
        scene.set_collider(handle, Some(Collider::cuboid(2.0, 10.0, 2.0)))?;
        world.make_grippable(handle)?;

        Ok(Self {
            root,
            handle,
            binding,
            increment,
            base_rotation: pose.rotation,
            grab: None,
        })
    }

    /// Node that spins.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Grippable handle node.
    pub fn handle(&self) -> ObjectId {
        self.handle
    }

    /// Property the crank drives.
    pub fn binding(&self) -> &PropertyBinding {
        &self.binding
    }

    /// Current spin angle in radians.
    pub fn angle(&self, world: &InteractionWorld) -> f32 {
        world
            .properties()
            .get(&self.angle_binding())
            .unwrap_or(0.0)
    }

    /// Device holding the crank, if a gesture is running.
    pub fn gripped_by(&self, world: &InteractionWorld) -> Option<DeviceId> {
        self.grab
            .filter(|grab| world.is_scheduled(grab.handle))
            .map(|grab| grab.device)
    }

    fn angle_binding(&self) -> PropertyBinding {
        PropertyBinding::new(self.root, ANGLE_PROPERTY)
    }

    /// Route a dispatched event. Returns `true` when the event started or
    /// ended a gesture.
    pub fn handle_event(
        &mut self,
        world: &mut InteractionWorld,
        event: &InteractionEvent,
    ) -> Result<bool, InteractionError> {
        // A grab whose device disconnected was already unscheduled.
        if let Some(grab) = self.grab {
            if !world.is_scheduled(grab.handle) {
                self.grab = None;
            }
        }

        match event.kind {
            EventKind::SqueezeStart if event.target == self.handle => {
                if self.grab.is_some() {
                    debug!(device = %event.dispatcher, "crank already gripped");
                    return Ok(false);
                }
                self.begin(world, event.dispatcher)?;
                Ok(true)
            }
            EventKind::SqueezeEnd => match self.grab {
                Some(grab) if grab.grip_space == event.target && grab.device == event.dispatcher => {
                    world.unregister(grab.handle);
                    self.grab = None;
                    info!(device = %grab.device, crank = %self.root, "crank released");
                    Ok(true)
                }
                _ => Ok(false),
            },
            _ => Ok(false),
        }
    }

    fn begin(&mut self, world: &mut InteractionWorld, device: DeviceId) -> Result<(), InteractionError> {
        let grip_space = world.device(device)?.grip_space();
        let matrix = world
            .scene()
            .world_matrix(self.root)
            .ok_or(InteractionError::UnknownObject(self.root))?;
        let pivot = Vec3::from(matrix.translation);
        let axis = matrix.transform_vector3(Vec3::Y).normalize_or_zero();
        let axis = if axis == Vec3::ZERO { Vec3::Z } else { axis };
        let (u, w) = plane_basis(axis);

        let angle_binding = self.angle_binding();
        let session = CrankSession {
            device,
            crank: self.root,
            pivot,
            u,
            w,
            base_rotation: self.base_rotation,
            last_angle: world.properties().get(&angle_binding).unwrap_or(0.0),
            binding: self.binding.clone(),
            angle_binding,
            increment: self.increment,
            since_pulse: 0.0,
            pulse_angle: world.state().config().crank_pulse_angle,
        };
        let handle = world.register_for_device(device, session, crank_update)?;
        self.grab = Some(ActiveGrab {
            device,
            grip_space,
            handle,
        });
        info!(device = %device, crank = %self.root, "crank gripped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{InputSource, PrimaryAction};

    #[test]
    fn wraparound_takes_the_short_way() {
        let delta = wrap_angle_delta(-3.13 - 3.13);
        assert!((delta - (TAU - 6.26)).abs() < 1e-5);
        assert!(delta > 0.0);
        assert!((wrap_angle_delta(3.13 - -3.13) + (TAU - 6.26)).abs() < 1e-5);
        assert_eq!(wrap_angle_delta(0.5), 0.5);
    }

    #[test]
    fn plane_basis_for_world_z_is_xy() {
        let (u, w) = plane_basis(Vec3::Z);
        assert!(u.abs_diff_eq(Vec3::X, 1e-6));
        assert!(w.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn neutral_pose_is_zero_angle() {
        // Grip to the right of the pivot (handle side) reads as angle 0.
        let angle = crank_angle(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0), Vec3::X, Vec3::Y).unwrap();
        assert!(angle.abs() < 1e-6 || (angle + TAU).abs() < 1e-6);
        assert!(crank_angle(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0), Vec3::X, Vec3::Y).is_none());
    }

    struct Rig {
        world: InteractionWorld,
        crank: HandCrank,
        device: DeviceId,
        target: ObjectId,
    }

    fn rig() -> Rig {
        let mut world = InteractionWorld::default();
        let target = world.scene_mut().spawn("dial", Transform3D::default());
        let binding = PropertyBinding::new(target, "value");
        let crank = HandCrank::spawn(
            &mut world,
            None,
            Transform3D::default().with_rotation(Quat::from_rotation_x(PI / 2.0)),
            binding,
            DEFAULT_INCREMENT,
        )
        .unwrap();
        let device = world.add_device(0, None).unwrap();
        world
            .connect(
                device,
                InputSource {
                    has_haptics: true,
                    ..Default::default()
                },
            )
            .unwrap();
        Rig {
            world,
            crank,
            device,
            target,
        }
    }

    fn grip_at(rig: &mut Rig, position: Vec3) {
        rig.world
            .set_grip_pose(rig.device, Transform3D::new(position))
            .unwrap();
    }

    fn route(rig: &mut Rig, action: PrimaryAction) {
        let events = rig.world.handle_action(rig.device, action).unwrap();
        for event in &events {
            rig.crank.handle_event(&mut rig.world, event).unwrap();
        }
    }

    #[test]
    fn squeeze_on_handle_starts_and_release_ends_the_gesture() {
        let mut rig = rig();
        // The handle spans x 7..9 at z 10..20 once the crank is tipped onto
        // world Z; grip just outside its +X face.
        grip_at(&mut rig, Vec3::new(9.03, 0.0, 15.0));
        route(&mut rig, PrimaryAction::SqueezeStart);
        assert_eq!(rig.crank.gripped_by(&rig.world), Some(rig.device));

        // Release away from the handle still ends the grab.
        grip_at(&mut rig, Vec3::new(30.0, 30.0, 30.0));
        route(&mut rig, PrimaryAction::SqueezeEnd);
        assert_eq!(rig.crank.gripped_by(&rig.world), None);
    }

    #[test]
    fn quarter_turn_adds_half_the_increment() {
        let mut rig = rig();
        grip_at(&mut rig, Vec3::new(9.03, 0.0, 15.0));
        route(&mut rig, PrimaryAction::SqueezeStart);
        rig.world.tick();

        // Move the grip a quarter turn counter-clockwise around world Z.
        grip_at(&mut rig, Vec3::new(0.0, 9.03, 15.0));
        rig.world.tick();

        let value = rig
            .world
            .properties()
            .get(&PropertyBinding::new(rig.target, "value"))
            .unwrap();
        assert!((value - DEFAULT_INCREMENT / 2.0).abs() < 1e-4, "value = {value}");
        assert!((rig.crank.angle(&rig.world) - (PI / 2.0 - TAU)).abs() < 1e-4
            || (rig.crank.angle(&rig.world) - PI / 2.0).abs() < 1e-4);
        // A quarter turn exceeds the pulse angle once.
        assert_eq!(rig.world.drain_haptics().len(), 1);
    }

    #[test]
    fn disconnect_stops_the_gesture() {
        let mut rig = rig();
        grip_at(&mut rig, Vec3::new(9.03, 0.0, 15.0));
        route(&mut rig, PrimaryAction::SqueezeStart);
        rig.world.disconnect(rig.device).unwrap();
        assert_eq!(rig.crank.gripped_by(&rig.world), None);

        grip_at(&mut rig, Vec3::new(0.0, 9.03, 15.0));
        rig.world.tick();
        assert_eq!(
            rig.world
                .properties()
                .get(&PropertyBinding::new(rig.target, "value")),
            None
        );
    }
}
