//! Menu panel that unfolds above the dock

use super::{Motion, UIComponent};
use crate::tween::Animated;
use glam::Vec3;
use tracing::debug;
use vrdock_core::{ObjectId, Transform3D};
use vrdock_input::{InteractionError, InteractionWorld, SceneGraph};

/// Menu panel with a single outstanding open/close transition
#[derive(Debug, Clone)]
pub struct MenuPanel {
    /// Panel label
    pub name: String,

    /// Background colour (RGBA)
    pub color: [f32; 4],

    node: Option<ObjectId>,
    open: bool,
    visible: bool,
    hide_on_complete: bool,
    scale: Animated,
    y: Animated,
    motion: Motion,
}

impl MenuPanel {
    /// Panel width
    pub const WIDTH: f32 = 50.0;
    /// Panel height
    pub const HEIGHT: f32 = 50.0;
    /// Resting height above the dock plate when open
    pub const OFFSET_Y: f32 = 7.5;
    /// Depth behind the dock plate
    pub const OFFSET_Z: f32 = -5.0;
    /// How far the panel sinks while collapsed
    pub const CLOSED_DROP: f32 = 10.0;

    /// Create a new closed, hidden panel
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: [0.07, 0.07, 0.07, 1.0],
            node: None,
            open: false,
            visible: false,
            hide_on_complete: false,
            scale: Animated::new(0.0),
            y: Animated::new(Self::OFFSET_Y - Self::CLOSED_DROP),
            motion: Motion::new(0.2),
        }
    }

    /// Builder: Set transition timing
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Spawn the panel node under `parent`.
    pub fn attach(&mut self, world: &mut InteractionWorld, parent: ObjectId) -> Result<ObjectId, InteractionError> {
        let scene = world.scene_mut();
        let node = scene.spawn_child(parent, self.name.clone(), self.transform())?;
        scene.get_mut(node)?.visible = self.visible;
        self.node = Some(node);
        Ok(node)
    }

    /// Whether the panel is (or is becoming) open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the panel is drawn. Stays `true` through the close transition.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Horizontal and vertical scale (animated)
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Vertical position (animated)
    pub fn y(&self) -> f32 {
        self.y.value()
    }

    /// Start a transition toward open or closed, replacing any in flight.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        let Motion { duration, ease } = self.motion;
        if open {
            self.visible = true;
            self.hide_on_complete = false;
            self.scale.animate_with(1.0, duration, ease);
            self.y.animate_with(Self::OFFSET_Y, duration, ease);
        } else {
            self.hide_on_complete = true;
            self.scale.animate_with(0.0, duration, ease);
            self.y
                .animate_with(Self::OFFSET_Y - Self::CLOSED_DROP, duration, ease);
        }
        debug!(panel = %self.name, open, "menu panel transition");
    }

    fn transform(&self) -> Transform3D {
        let s = self.scale.value();
        Transform3D::new(Vec3::new(0.0, self.y.value(), Self::OFFSET_Z)).with_scale(Vec3::new(s, s, 1.0))
    }
}

impl UIComponent for MenuPanel {
    fn node(&self) -> Option<ObjectId> {
        self.node
    }

    fn advance(&mut self, dt: f32, scene: &mut SceneGraph) {
        self.scale.advance(dt);
        self.y.advance(dt);
        if self.hide_on_complete && !self.is_animating() {
            self.hide_on_complete = false;
            self.visible = false;
        }
        if let Some(node) = self.node {
            let _ = scene.set_transform(node, self.transform());
            if let Ok(node) = scene.get_mut(node) {
                node.visible = self.visible;
            }
        }
    }

    fn is_animating(&self) -> bool {
        self.scale.is_animating() || self.y.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_creation() {
        let panel = MenuPanel::new("settings");
        assert!(!panel.is_open());
        assert!(!panel.is_visible());
        assert_eq!(panel.scale(), 0.0);
        assert_eq!(panel.y(), -2.5);
    }

    #[test]
    fn open_is_visible_immediately() {
        let mut panel = MenuPanel::new("p");
        panel.set_open(true);
        assert!(panel.is_visible());
        panel.advance(0.2, &mut SceneGraph::new());
        assert_eq!(panel.scale(), 1.0);
        assert_eq!(panel.y(), MenuPanel::OFFSET_Y);
    }

    #[test]
    fn close_hides_only_when_collapsed() {
        let mut scene = SceneGraph::new();
        let mut panel = MenuPanel::new("p");
        panel.set_open(true);
        panel.advance(0.2, &mut scene);

        panel.set_open(false);
        assert!(!panel.is_open());
        panel.advance(0.1, &mut scene);
        assert!(panel.is_visible(), "still shrinking");
        assert!(panel.scale() > 0.0);
        panel.advance(0.1, &mut scene);
        assert!(!panel.is_visible());
        assert_eq!(panel.scale(), 0.0);
    }

    #[test]
    fn reopening_mid_close_cancels_the_hide() {
        let mut scene = SceneGraph::new();
        let mut panel = MenuPanel::new("p");
        panel.set_open(true);
        panel.advance(0.2, &mut scene);
        panel.set_open(false);
        panel.advance(0.1, &mut scene);

        panel.set_open(true);
        panel.advance(0.2, &mut scene);
        assert!(panel.is_visible());
        assert_eq!(panel.scale(), 1.0);
    }

    #[test]
    fn attached_node_mirrors_visibility() {
        let mut world = InteractionWorld::default();
        let dock = world.scene_mut().spawn("dock", Transform3D::default());
        let mut panel = MenuPanel::new("p");
        let node = panel.attach(&mut world, dock).unwrap();
        assert!(!world.scene().get(node).unwrap().visible);

        panel.set_open(true);
        panel.advance(0.0, world.scene_mut());
        assert!(world.scene().get(node).unwrap().visible);
    }
}
