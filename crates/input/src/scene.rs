//! Minimal scene graph: the shapes that rays are tested against.
//!
//! Geometry construction belongs to the renderer. The interaction layer only
//! needs a transform hierarchy and a coarse collider per node.

use crate::InteractionError;
use glam::{Affine3A, Vec3};
use std::collections::HashMap;
use vrdock_core::{ObjectId, Transform3D};

/// Collision volume in a node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Box centered on the node origin.
    Box {
        /// Half size along each local axis.
        half_extents: Vec3,
    },
    /// Sphere centered on the node origin.
    Sphere {
        /// Radius in local units.
        radius: f32,
    },
}

impl Collider {
    /// Box collider from full width/height/depth.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: Vec3::new(width, height, depth) * 0.5,
        }
    }

    /// Intersect a local-space ray `origin + dir * t`.
    ///
    /// `dir` does not have to be unit length; the returned `t` is in the same
    /// parameterisation, so a world ray mapped through an affine inverse keeps
    /// its world-space distance. Rays starting inside report the exit point.
    pub fn ray_parameter(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        match *self {
            Collider::Box { half_extents } => {
                let inv_dir = dir.recip();
                let t1 = (-half_extents - origin) * inv_dir;
                let t2 = (half_extents - origin) * inv_dir;

                let tmin = t1.min(t2).max_element();
                let tmax = t1.max(t2).min_element();

                // Entire box is behind the origin
                if tmax < 0.0 {
                    return None;
                }
                if tmin > tmax {
                    return None;
                }
                Some(if tmin < 0.0 { tmax } else { tmin })
            }
            Collider::Sphere { radius } => {
                let a = dir.length_squared();
                if a == 0.0 {
                    return None;
                }
                let b = 2.0 * origin.dot(dir);
                let c = origin.length_squared() - radius * radius;
                let disc = b * b - 4.0 * a * c;
                if disc < 0.0 {
                    return None;
                }
                let root = disc.sqrt();
                let near = (-b - root) / (2.0 * a);
                let far = (-b + root) / (2.0 * a);
                if far < 0.0 {
                    return None;
                }
                Some(if near >= 0.0 { near } else { far })
            }
        }
    }
}

/// One node of the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Debug name.
    pub name: String,
    /// Transform relative to the parent.
    pub transform: Transform3D,
    /// Optional collision volume.
    pub collider: Option<Collider>,
    /// Render visibility. Ray queries ignore it.
    pub visible: bool,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

impl SceneNode {
    /// Parent node, if any.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// Transform hierarchy with colliders.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<ObjectId, SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform3D) -> ObjectId {
        let id = self.allocate();
        self.nodes.insert(id, Self::node(name.into(), transform, None));
        id
    }

    /// Add a node under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
        transform: Transform3D,
    ) -> Result<ObjectId, InteractionError> {
        if !self.nodes.contains_key(&parent) {
            return Err(InteractionError::UnknownObject(parent));
        }
        let id = self.allocate();
        self.nodes
            .insert(id, Self::node(name.into(), transform, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Move `child` (and its subtree) under `parent`, keeping its local transform.
    pub fn set_parent(&mut self, child: ObjectId, parent: ObjectId) -> Result<(), InteractionError> {
        if !self.nodes.contains_key(&parent) {
            return Err(InteractionError::UnknownObject(parent));
        }
        if self.subtree(child)?.contains(&parent) {
            return Err(InteractionError::CyclicParent { child, parent });
        }

        let old_parent = self.nodes.get(&child).and_then(|node| node.parent);
        if let Some(old) = old_parent.and_then(|old| self.nodes.get_mut(&old)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        Ok(())
    }

    /// Remove a node and its whole subtree. Returns the removed ids, root first.
    pub fn despawn(&mut self, id: ObjectId) -> Result<Vec<ObjectId>, InteractionError> {
        let removed = self.subtree(id)?;
        if let Some(parent) = self.nodes.get(&id).and_then(|node| node.parent) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|c| *c != id);
            }
        }
        for node in &removed {
            self.nodes.remove(node);
        }
        Ok(removed)
    }

    /// Whether `id` is a live node.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Borrow a node.
    pub fn get(&self, id: ObjectId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Borrow a node mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneNode, InteractionError> {
        self.nodes
            .get_mut(&id)
            .ok_or(InteractionError::UnknownObject(id))
    }

    /// Local transform of a node.
    pub fn transform(&self, id: ObjectId) -> Option<Transform3D> {
        self.nodes.get(&id).map(|node| node.transform)
    }

    /// Replace a node's local transform.
    pub fn set_transform(&mut self, id: ObjectId, transform: Transform3D) -> Result<(), InteractionError> {
        self.get_mut(id)?.transform = transform;
        Ok(())
    }

    /// Attach or clear a node's collider.
    pub fn set_collider(&mut self, id: ObjectId, collider: Option<Collider>) -> Result<(), InteractionError> {
        self.get_mut(id)?.collider = collider;
        Ok(())
    }

    /// Local-to-world matrix, composed through every ancestor.
    pub fn world_matrix(&self, id: ObjectId) -> Option<Affine3A> {
        let mut node = self.nodes.get(&id)?;
        let mut matrix = node.transform.to_affine();
        while let Some(parent) = node.parent {
            node = self.nodes.get(&parent)?;
            matrix = node.transform.to_affine() * matrix;
        }
        Some(matrix)
    }

    /// World-space origin of a node.
    pub fn world_position(&self, id: ObjectId) -> Option<Vec3> {
        self.world_matrix(id)
            .map(|matrix| matrix.transform_point3(Vec3::ZERO))
    }

    /// `id` followed by all of its descendants, depth first, children in insertion order.
    pub fn subtree(&self, id: ObjectId) -> Result<Vec<ObjectId>, InteractionError> {
        if !self.nodes.contains_key(&id) {
            return Err(InteractionError::UnknownObject(id));
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }

    fn node(name: String, transform: Transform3D, parent: Option<ObjectId>) -> SceneNode {
        SceneNode {
            name,
            transform,
            collider: None,
            visible: true,
            parent,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn box_ray_hits_front_face() {
        let collider = Collider::cuboid(1.0, 1.0, 1.0);
        let t = collider.ray_parameter(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        assert!((t.unwrap() - 1.5).abs() < 1e-5);

        let miss = collider.ray_parameter(Vec3::new(2.0, 0.0, 2.0), Vec3::NEG_Z);
        assert!(miss.is_none());
    }

    #[test]
    fn box_ray_from_inside_reports_exit() {
        let collider = Collider::cuboid(2.0, 2.0, 2.0);
        let t = collider.ray_parameter(Vec3::ZERO, Vec3::X).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn box_behind_ray_is_missed() {
        let collider = Collider::cuboid(1.0, 1.0, 1.0);
        assert!(collider
            .ray_parameter(Vec3::new(0.0, 0.0, 2.0), Vec3::Z)
            .is_none());
    }

    #[test]
    fn sphere_ray_hits_near_side() {
        let collider = Collider::Sphere { radius: 1.0 };
        let t = collider
            .ray_parameter(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)
            .unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn(
            "root",
            Transform3D::new(Vec3::new(0.0, 1.0, 0.0)).with_scale(Vec3::splat(0.5)),
        );
        let child = scene
            .spawn_child(root, "child", Transform3D::new(Vec3::new(2.0, 0.0, 0.0)))
            .unwrap();
        let pos = scene.world_position(child).unwrap();
        assert!((pos - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5, "got {pos:?}");
    }

    #[test]
    fn subtree_is_depth_first_in_insertion_order() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", Transform3D::default());
        let a = scene.spawn_child(root, "a", Transform3D::default()).unwrap();
        let a1 = scene.spawn_child(a, "a1", Transform3D::default()).unwrap();
        let b = scene.spawn_child(root, "b", Transform3D::default()).unwrap();
        assert_eq!(scene.subtree(root).unwrap(), vec![root, a, a1, b]);
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", Transform3D::default());
        let child = scene.spawn_child(root, "child", Transform3D::default()).unwrap();
        assert_eq!(
            scene.set_parent(root, child),
            Err(InteractionError::CyclicParent {
                child: root,
                parent: child
            })
        );
    }

    #[test]
    fn set_parent_moves_between_parents() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn("a", Transform3D::default());
        let b = scene.spawn("b", Transform3D::new(Vec3::X));
        let child = scene.spawn_child(a, "child", Transform3D::default()).unwrap();
        scene.set_parent(child, b).unwrap();
        assert!(scene.get(a).unwrap().children().is_empty());
        assert_eq!(scene.get(b).unwrap().children(), &[child]);
        assert_eq!(scene.world_position(child), Some(Vec3::X));
    }

    #[test]
    fn despawn_removes_subtree() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", Transform3D::default());
        let child = scene.spawn_child(root, "child", Transform3D::default()).unwrap();
        let leaf = scene.spawn_child(child, "leaf", Transform3D::default()).unwrap();
        let removed = scene.despawn(child).unwrap();
        assert_eq!(removed, vec![child, leaf]);
        assert!(!scene.contains(leaf));
        assert!(scene.get(root).unwrap().children().is_empty());
    }

    #[test]
    fn rotated_node_world_matrix_rotates_children() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn(
            "root",
            Transform3D::default().with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        );
        let child = scene
            .spawn_child(root, "child", Transform3D::new(Vec3::X))
            .unwrap();
        let pos = scene.world_position(child).unwrap();
        assert!((pos - Vec3::Y).length() < 1e-5, "got {pos:?}");
    }
}
