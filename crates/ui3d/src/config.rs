use crate::tween::Ease;
use serde::{Deserialize, Serialize};

/// Widget animation and head-space tunables (`[surface]` table).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Whether the head space follows the camera at startup.
    pub head_tracking: bool,
    /// Button raise/lower transition length (seconds).
    pub button_duration: f32,
    /// Menu panel open/close transition length (seconds).
    pub panel_duration: f32,
    /// Dock lift (head-space meters) while a menu is open.
    pub menu_open_lift: f32,
    /// Fraction of the remaining rotation the head space closes per tick.
    pub head_follow_rate: f32,
    /// Easing curve for every widget transition.
    pub ease: Ease,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            head_tracking: true,
            button_duration: 0.1,
            panel_duration: 0.2,
            menu_open_lift: 0.15,
            head_follow_rate: 0.1,
            ease: Ease::Power1Out,
        }
    }
}
