//! Input devices (one per physical controller) and their primary actions.

use crate::events::EventKind;
use crate::hover::HoverBuffer;
use crate::query::Ray;
use crate::scene::SceneGraph;
use crate::scheduler::CallbackHandle;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use vrdock_core::{DeviceId, ObjectId};

/// Which hand holds the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    /// Not reported.
    #[default]
    None,
    /// Left hand.
    Left,
    /// Right hand.
    Right,
}

/// Descriptor carried by a connect notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSource {
    /// Reported hand.
    pub handedness: Handedness,
    /// Whether the gamepad exposes a haptic actuator.
    pub has_haptics: bool,
}

/// Connection state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session input source bound.
    Disconnected,
    /// Bound to an input source.
    Connected,
}

/// Discrete actions a controller can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    /// Trigger pressed.
    SelectStart,
    /// Trigger released.
    SelectEnd,
    /// Trigger press/release completed.
    Select,
    /// Grip pressed.
    SqueezeStart,
    /// Grip released.
    SqueezeEnd,
    /// Grip press/release completed.
    Squeeze,
}

impl PrimaryAction {
    /// Event kind this action dispatches as.
    pub fn kind(self) -> EventKind {
        match self {
            Self::SelectStart => EventKind::SelectStart,
            Self::SelectEnd => EventKind::SelectEnd,
            Self::Select => EventKind::Select,
            Self::SqueezeStart => EventKind::SqueezeStart,
            Self::SqueezeEnd => EventKind::SqueezeEnd,
            Self::Squeeze => EventKind::Squeeze,
        }
    }
}

/// A queued haptic request for the host to forward to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HapticPulse {
    /// Receiving device.
    pub device: DeviceId,
    /// Actuator intensity (0..=1).
    pub intensity: f32,
    /// Pulse length in milliseconds.
    pub duration_ms: f32,
}

/// Pointer laser indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Laser {
    /// Shown only on the active device.
    pub visible: bool,
    /// Between selectstart and selectend.
    pub pressed: bool,
}

impl Laser {
    /// Length of the drawn laser line.
    pub const LENGTH: f32 = 5.0;
    /// Idle colour.
    pub const IDLE_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    /// Colour while the trigger is held.
    pub const PRESSED_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    /// Current colour.
    pub fn color(&self) -> [f32; 4] {
        if self.pressed {
            Self::PRESSED_COLOR
        } else {
            Self::IDLE_COLOR
        }
    }
}

/// One handheld controller.
#[derive(Debug)]
pub struct InputDevice {
    id: DeviceId,
    index: u32,
    ray_space: ObjectId,
    grip_space: ObjectId,
    connection: ConnectionState,
    source: Option<InputSource>,
    pub(crate) hover: HoverBuffer,
    pub(crate) active: bool,
    pub(crate) laser: Laser,
    pub(crate) owned_callbacks: Vec<CallbackHandle>,
}

impl InputDevice {
    pub(crate) fn new(id: DeviceId, index: u32, ray_space: ObjectId, grip_space: ObjectId) -> Self {
        Self {
            id,
            index,
            ray_space,
            grip_space,
            connection: ConnectionState::Disconnected,
            source: None,
            hover: HoverBuffer::new(),
            active: false,
            laser: Laser::default(),
            owned_callbacks: Vec::new(),
        }
    }

    /// Device id.
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Controller index the device was bound to.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Scene node carrying the pointing pose.
    pub fn ray_space(&self) -> ObjectId {
        self.ray_space
    }

    /// Scene node carrying the grip pose.
    pub fn grip_space(&self) -> ObjectId {
        self.grip_space
    }

    /// Connection state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Whether an input source is bound.
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Descriptor from the last connect.
    pub fn source(&self) -> Option<InputSource> {
        self.source
    }

    /// Whether this device holds activity.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Laser indicator state.
    pub fn laser(&self) -> Laser {
        self.laser
    }

    /// Intersections stored by the last hover diff.
    pub fn hover_records(&self) -> &[crate::query::IntersectionRecord] {
        self.hover.records()
    }

    /// Callbacks registered on this device's behalf.
    pub fn owned_callbacks(&self) -> &[CallbackHandle] {
        &self.owned_callbacks
    }

    /// World-space pointing ray along the ray pose's local -Z.
    pub fn ray(&self, scene: &SceneGraph) -> Option<Ray> {
        let matrix = scene.world_matrix(self.ray_space)?;
        let origin = matrix.transform_point3(Vec3::ZERO);
        let direction = matrix.transform_vector3(Vec3::NEG_Z);
        Some(Ray::new(origin, direction))
    }

    /// World-space grip origin.
    pub fn grip_origin(&self, scene: &SceneGraph) -> Option<Vec3> {
        scene.world_position(self.grip_space)
    }

    pub(crate) fn connect(&mut self, source: InputSource) {
        self.connection = ConnectionState::Connected;
        self.source = Some(source);
    }

    pub(crate) fn disconnect(&mut self) -> Vec<CallbackHandle> {
        self.connection = ConnectionState::Disconnected;
        self.laser.pressed = false;
        std::mem::take(&mut self.owned_callbacks)
    }
}
