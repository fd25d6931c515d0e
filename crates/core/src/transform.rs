//! Local transform of a scene node.

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform3D {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Orientation relative to the parent.
    pub rotation: Quat,
    /// Non-uniform scale relative to the parent.
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform3D {
    /// Transform positioned at `position` with identity rotation and unit scale.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Affine matrix mapping local space into the parent's space.
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Local forward axis (-Z) after rotation.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_applies_scale_then_rotation_then_translation() {
        let t = Transform3D::new(Vec3::new(1.0, 0.0, 0.0))
            .with_scale(Vec3::splat(2.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let p = t.to_affine().transform_point3(Vec3::new(0.0, 0.0, -1.0));
        // -Z scaled to -2Z, rotated 90° about Y lands on -X.
        assert!((p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5, "got {p:?}");
    }

    #[test]
    fn forward_is_negative_z_by_default() {
        assert_eq!(Transform3D::default().forward(), Vec3::NEG_Z);
    }
}
