//! Interactive dock button

use super::{Motion, UIComponent, WidgetCommands};
use crate::tween::Animated;
use glam::Vec3;
use tracing::trace;
use vrdock_core::{ObjectId, Transform3D};
use vrdock_input::{
    Collider, EventKind, InteractionError, InteractionEvent, InteractionWorld, Observers, SceneGraph,
};

/// Activation state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Resting against the dock
    Inactive,
    /// Raised (hovered or held by its dock)
    Active,
}

/// Rounded-square button with an optional icon
pub struct Button {
    /// Button label
    pub name: String,

    /// Base colour (RGBA)
    pub color: [f32; 4],

    node: Option<ObjectId>,
    icon_path: Option<String>,
    state: ButtonState,
    hovered: bool,
    held: bool,
    x: f32,
    size: Animated,
    depth_offset: Animated,
    light_intensity: Animated,
    motion: Motion,
    observers: Observers<WidgetCommands>,
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("name", &self.name)
            .field("node", &self.node)
            .field("state", &self.state)
            .field("icon_path", &self.icon_path)
            .finish_non_exhaustive()
    }
}

impl Button {
    /// Edge length of the face at rest
    pub const WIDTH: f32 = 7.0;
    /// Same as width; buttons are square
    pub const HEIGHT: f32 = Self::WIDTH;
    /// Extrusion depth
    pub const DEPTH: f32 = 0.25;
    /// Gap between the dock plate and the button face
    pub const OFFSET: f32 = 1.0;
    /// Extra lift while raised
    pub const HOVER_OFFSET: f32 = 1.75;
    /// Growth of the face while raised
    pub const RAISED_GROWTH: f32 = 0.5;
    /// Point light intensity at rest
    pub const LIGHT_REST: f32 = 4.0;
    /// Point light intensity while raised
    pub const LIGHT_RAISED: f32 = 5.0;

    /// Create a new detached button
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: [0.96, 0.96, 0.96, 1.0],
            node: None,
            icon_path: None,
            state: ButtonState::Inactive,
            hovered: false,
            held: false,
            x: 0.0,
            size: Animated::new(Self::WIDTH),
            depth_offset: Animated::new(Self::OFFSET + Self::DEPTH),
            light_intensity: Animated::new(Self::LIGHT_REST),
            motion: Motion::new(0.1),
            observers: Observers::new(),
        }
    }

    /// Builder: Set colour from a packed `0xRRGGBB` value
    pub fn with_color(mut self, rgb: u32) -> Self {
        self.color = [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ];
        self
    }

    /// Builder: Set icon path
    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon_path = Some(path.into());
        self
    }

    /// Builder: Set transition timing
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Builder: Observe an event kind
    pub fn on<F>(mut self, kind: EventKind, observer: F) -> Self
    where
        F: FnMut(&InteractionEvent, &mut WidgetCommands) + 'static,
    {
        self.observers.on(kind, observer);
        self
    }

    /// Spawn the button node under `parent` and make it pointable.
    pub fn attach(&mut self, world: &mut InteractionWorld, parent: ObjectId) -> Result<ObjectId, InteractionError> {
        let node = world
            .scene_mut()
            .spawn_child(parent, self.name.clone(), self.transform())?;
        world
            .scene_mut()
            .set_collider(node, Some(Collider::cuboid(Self::WIDTH, Self::HEIGHT, Self::DEPTH)))?;
        world.make_pointable(node)?;
        self.node = Some(node);
        Ok(node)
    }

    /// Current activation state
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Whether the button is raised
    pub fn is_active(&self) -> bool {
        self.state == ButtonState::Active
    }

    /// Whether the active pointer is over the button
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the owning dock keeps the button raised
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Current icon path
    pub fn icon_path(&self) -> Option<&str> {
        self.icon_path.as_deref()
    }

    /// Replace the icon
    pub fn set_icon(&mut self, path: impl Into<String>) {
        self.icon_path = Some(path.into());
    }

    /// Face edge length (animated)
    pub fn size(&self) -> f32 {
        self.size.value()
    }

    /// Distance of the face from the dock plate (animated)
    pub fn depth_offset(&self) -> f32 {
        self.depth_offset.value()
    }

    /// Point light intensity (animated)
    pub fn light_intensity(&self) -> f32 {
        self.light_intensity.value()
    }

    /// Horizontal slot position assigned by the dock layout
    pub fn x(&self) -> f32 {
        self.x
    }

    pub(crate) fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Raise or lower the button on behalf of its owner.
    pub fn set_active(&mut self, active: bool) {
        self.held = active;
        if active {
            self.raise();
        } else {
            self.lower();
        }
    }

    /// Hover started.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.raise();
    }

    /// Hover ended. A held button stays raised.
    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        if !self.held {
            self.lower();
        }
    }

    /// Apply an event addressed to this button and notify its observers.
    /// Returns `false` if the event targets another node.
    pub fn handle_event(&mut self, event: &InteractionEvent, commands: &mut WidgetCommands) -> bool {
        if Some(event.target) != self.node {
            return false;
        }
        match event.kind {
            EventKind::PointerEnter => self.pointer_enter(),
            EventKind::PointerLeave => self.pointer_leave(),
            _ => {}
        }
        let notified = self.observers.notify(event, commands);
        trace!(button = %self.name, kind = %event.kind, notified, "button event");
        true
    }

    fn raise(&mut self) {
        if self.state == ButtonState::Active {
            return;
        }
        self.state = ButtonState::Active;
        self.animate(
            Self::WIDTH + Self::RAISED_GROWTH,
            Self::OFFSET + Self::DEPTH + Self::HOVER_OFFSET,
            Self::LIGHT_RAISED,
        );
    }

    fn lower(&mut self) {
        if self.state == ButtonState::Inactive {
            return;
        }
        self.state = ButtonState::Inactive;
        self.animate(Self::WIDTH, Self::OFFSET + Self::DEPTH, Self::LIGHT_REST);
    }

    fn animate(&mut self, size: f32, depth_offset: f32, light: f32) {
        let Motion { duration, ease } = self.motion;
        self.size.animate_with(size, duration, ease);
        self.depth_offset.animate_with(depth_offset, duration, ease);
        self.light_intensity.animate_with(light, duration, ease);
    }

    fn transform(&self) -> Transform3D {
        let scale = self.size.value() / Self::WIDTH;
        Transform3D::new(Vec3::new(self.x, 0.0, self.depth_offset.value()))
            .with_scale(Vec3::new(scale, scale, 1.0))
    }
}

impl UIComponent for Button {
    fn node(&self) -> Option<ObjectId> {
        self.node
    }

    fn advance(&mut self, dt: f32, scene: &mut SceneGraph) {
        self.size.advance(dt);
        self.depth_offset.advance(dt);
        self.light_intensity.advance(dt);
        if let Some(node) = self.node {
            let _ = scene.set_transform(node, self.transform());
        }
    }

    fn is_animating(&self) -> bool {
        self.size.is_animating() || self.depth_offset.is_animating() || self.light_intensity.is_animating()
    }
}
