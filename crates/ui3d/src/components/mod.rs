//! Dock widgets
//!
//! Widgets own their visual parameters as [`Animated`](crate::tween::Animated)
//! values and write derived transforms into the scene graph when advanced.

pub mod button;
pub mod dock;
pub mod panel;

pub use button::{Button, ButtonState};
pub use dock::Dock;
pub use panel::MenuPanel;

use crate::tween::Ease;
use vrdock_core::{DeviceId, ObjectId};
use vrdock_input::SceneGraph;

/// Base trait for all scene-backed widgets
pub trait UIComponent {
    /// Scene node, once the widget has been attached
    fn node(&self) -> Option<ObjectId>;

    /// Sample transitions by `dt` seconds and write the result to the scene
    fn advance(&mut self, dt: f32, scene: &mut SceneGraph);

    /// Whether any transition is still running
    fn is_animating(&self) -> bool;
}

/// Transition timing for a widget's animated properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Transition length in seconds
    pub duration: f32,
    /// Easing curve
    pub ease: Ease,
}

impl Motion {
    /// Create a new motion with the default ease
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            ease: Ease::default(),
        }
    }
}

/// Side effect requested by a widget observer, applied by the surface after
/// the event has been routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    /// Flip head-space follow on or off.
    ToggleHeadTracking,
    /// Replace a button's icon.
    SetIcon {
        /// Button node
        button: ObjectId,
        /// New icon path
        path: String,
    },
    /// Pick a button icon from the head-tracking state after earlier commands ran.
    ShowHeadTracking {
        /// Button node
        button: ObjectId,
        /// Icon while tracking is on
        locked: String,
        /// Icon while tracking is off
        unlocked: String,
    },
    /// Haptic pulse on a device.
    Pulse {
        /// Receiving device
        device: DeviceId,
    },
}

/// Command queue handed to observers.
pub type WidgetCommands = Vec<WidgetCommand>;
