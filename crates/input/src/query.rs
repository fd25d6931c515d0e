//! Spatial queries: pointing rays and grip-sphere scans against target sets.

use crate::scene::SceneGraph;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;
use vrdock_core::ObjectId;

/// Determinant below which a node is treated as collapsed (e.g. scaled to zero).
const DEGENERATE_DETERMINANT: f32 = 1e-12;

/// A half-line with a valid parameter interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space.
    pub origin: Vec3,
    /// Unit direction in world space.
    pub direction: Vec3,
    /// Closest accepted hit distance.
    pub near: f32,
    /// Farthest accepted hit distance.
    pub far: f32,
}

impl Ray {
    /// Unbounded ray. `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Builder: limit the ray length
    pub fn with_far(mut self, far: f32) -> Self {
        self.far = far;
        self
    }

    /// Point at distance `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One hit produced by a query. Valid for the frame it was computed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntersectionRecord {
    /// Registered target whose subtree was struck.
    pub target: ObjectId,
    /// Node that was actually struck (the target itself or a descendant).
    pub object: ObjectId,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// How a grip scan treats the sampled directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GripScanMode {
    /// Stop at the first direction that hits anything and return its hits.
    #[default]
    FirstHit,
    /// Scan every direction and keep the nearest hit per target.
    Nearest,
}

/// Intersect `ray` with every collider under each of `targets`.
///
/// Results are sorted nearest first and contain at most one record per target.
pub fn intersect_targets(scene: &SceneGraph, targets: &[ObjectId], ray: &Ray) -> Vec<IntersectionRecord> {
    let mut hits: Vec<IntersectionRecord> = Vec::new();

    for &target in targets {
        let Ok(nodes) = scene.subtree(target) else {
            trace!(%target, "registered target is not in the scene");
            continue;
        };

        let mut best: Option<IntersectionRecord> = None;
        for object in nodes {
            let Some(collider) = scene.get(object).and_then(|node| node.collider) else {
                continue;
            };
            let Some(matrix) = scene.world_matrix(object) else {
                continue;
            };
            if matrix.matrix3.determinant().abs() < DEGENERATE_DETERMINANT {
                continue;
            }

            let inverse = matrix.inverse();
            let local_origin = inverse.transform_point3(ray.origin);
            let local_dir = inverse.transform_vector3(ray.direction);
            let Some(distance) = collider.ray_parameter(local_origin, local_dir) else {
                continue;
            };
            if distance < ray.near || distance > ray.far {
                continue;
            }
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(IntersectionRecord {
                    target,
                    object,
                    distance,
                    point: ray.at(distance),
                });
            }
        }
        hits.extend(best);
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Fixed direction set approximating a sphere around the grip origin.
#[derive(Debug, Clone)]
pub struct GripSphere {
    radius: f32,
    directions: Vec<Vec3>,
}

impl GripSphere {
    /// Sample an icosphere with `detail` subdivisions (edge split into `detail + 1`).
    pub fn new(radius: f32, detail: u32) -> Self {
        Self {
            radius,
            directions: icosphere_directions(detail),
        }
    }

    /// Ray length.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Unit directions in scan order.
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Cast the short rays from `origin` against `targets`.
    ///
    /// In [`GripScanMode::FirstHit`] the scan is a short-circuit approximation:
    /// the first direction that hits anything wins, even if another direction
    /// would have found a nearer object.
    pub fn scan(
        &self,
        scene: &SceneGraph,
        targets: &[ObjectId],
        origin: Vec3,
        mode: GripScanMode,
    ) -> Vec<IntersectionRecord> {
        match mode {
            GripScanMode::FirstHit => {
                for &direction in &self.directions {
                    let ray = Ray::new(origin, direction).with_far(self.radius);
                    let hits = intersect_targets(scene, targets, &ray);
                    if !hits.is_empty() {
                        return hits;
                    }
                }
                Vec::new()
            }
            GripScanMode::Nearest => {
                let mut nearest: HashMap<ObjectId, IntersectionRecord> = HashMap::new();
                for &direction in &self.directions {
                    let ray = Ray::new(origin, direction).with_far(self.radius);
                    for hit in intersect_targets(scene, targets, &ray) {
                        nearest
                            .entry(hit.target)
                            .and_modify(|existing| {
                                if hit.distance < existing.distance {
                                    *existing = hit;
                                }
                            })
                            .or_insert(hit);
                    }
                }
                let mut hits: Vec<_> = nearest.into_values().collect();
                hits.sort_by(|a, b| {
                    a.distance
                        .total_cmp(&b.distance)
                        .then(a.target.cmp(&b.target))
                });
                hits
            }
        }
    }
}

const PHI: f32 = 1.618_034;

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Unit vertices of a subdivided icosahedron, de-duplicated in first-seen order.
fn icosphere_directions(detail: u32) -> Vec<Vec3> {
    let n = detail + 1;
    let mut out: Vec<Vec3> = Vec::new();
    let mut push = |v: Vec3| {
        let v = v.normalize();
        if !out.iter().any(|existing| existing.distance_squared(v) < 1e-8) {
            out.push(v);
        }
    };

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from_array(ICOSAHEDRON_VERTICES[i]));
        for i in 0..=n {
            let s = i as f32 / n as f32;
            let row_start = a.lerp(c, s);
            let row_end = b.lerp(c, s);
            let cols = n - i;
            for j in 0..=cols {
                if cols == 0 {
                    push(row_start);
                } else {
                    push(row_start.lerp(row_end, j as f32 / cols as f32));
                }
            }
        }
    }
    out
}
