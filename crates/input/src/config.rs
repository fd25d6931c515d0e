//! Interaction tunables (`[interaction]` table).

use crate::query::GripScanMode;
use serde::{Deserialize, Serialize};

/// Tunables for queries, haptics and continuous gestures.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Length of each grip ray (meters).
    pub grip_radius: f32,
    /// Icosphere subdivision level for grip directions.
    pub grip_detail: u32,
    /// Short-circuit or exhaustive grip scans.
    pub grip_scan: GripScanMode,
    /// Maximum pointing distance; unbounded when absent.
    pub pointer_range: Option<f32>,
    /// Haptic pulse intensity (0..=1).
    pub haptic_intensity: f32,
    /// Haptic pulse length in milliseconds.
    pub haptic_duration_ms: f32,
    /// Accumulated crank rotation (radians) between haptic ticks.
    pub crank_pulse_angle: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            grip_radius: 0.06,
            grip_detail: 2,
            grip_scan: GripScanMode::FirstHit,
            pointer_range: None,
            haptic_intensity: 0.5,
            haptic_duration_ms: 5.0,
            crank_pulse_angle: std::f32::consts::PI / 8.0,
        }
    }
}
