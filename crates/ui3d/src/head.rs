//! Head space: the node the dock hangs from, trailing the camera.

use glam::Vec3;
use tracing::debug;
use vrdock_core::{ObjectId, Transform3D};
use vrdock_input::{InteractionError, SceneGraph};

/// Camera-following anchor for head-locked widgets
#[derive(Debug, Clone)]
pub struct HeadSpace {
    node: ObjectId,
    tracking: bool,
    follow_rate: f32,
}

impl HeadSpace {
    /// Where the head space starts before the first camera pose arrives
    pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 0.6, 1.0);

    /// Spawn the head-space root node.
    pub fn spawn(scene: &mut SceneGraph, tracking: bool, follow_rate: f32) -> Self {
        let node = scene.spawn("head-space", Transform3D::new(Self::INITIAL_POSITION));
        Self {
            node,
            tracking,
            follow_rate,
        }
    }

    /// Head-space node
    pub fn node(&self) -> ObjectId {
        self.node
    }

    /// Whether the head space follows the camera
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Turn camera following on or off
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
        debug!(tracking, "head tracking changed");
    }

    /// Copy the camera position and turn a fixed fraction of the way toward
    /// its orientation.
    pub fn follow(&self, scene: &mut SceneGraph, camera: &Transform3D) -> Result<(), InteractionError> {
        let mut transform = scene
            .transform(self.node)
            .ok_or(InteractionError::UnknownObject(self.node))?;
        transform.position = camera.position;
        transform.rotation = transform
            .rotation
            .slerp(camera.rotation, self.follow_rate)
            .normalize();
        scene.set_transform(self.node, transform)
    }
}
