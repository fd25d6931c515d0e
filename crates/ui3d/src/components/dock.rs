//! The dock: a row of buttons riding in head space, some of which own a menu.

use super::{Button, MenuPanel, Motion, UIComponent, WidgetCommands};
use crate::config::SurfaceConfig;
use crate::layout::{self, DockLayout};
use crate::tween::Animated;
use crate::DockError;
use glam::{Quat, Vec3};
use tracing::info;
use vrdock_core::{ObjectId, Transform3D};
use vrdock_input::{Collider, EventKind, InteractionEvent, InteractionWorld, SceneGraph};

#[derive(Debug)]
struct DockSlot {
    button: Button,
    menu: Option<MenuPanel>,
}

/// Row of buttons with at most one open menu
#[derive(Debug)]
pub struct Dock {
    root: ObjectId,
    plate: ObjectId,
    slots: Vec<DockSlot>,
    layout: DockLayout,
    y: Animated,
    lift: f32,
    panel_motion: Motion,
    button_motion: Motion,
}

impl Dock {
    /// Resting height in head space (meters)
    pub const OFFSET_Y: f32 = -0.4;
    /// Distance in front of the head (meters)
    pub const OFFSET_Z: f32 = -1.0;
    /// Local units are centimeters
    pub const SCALE: f32 = 0.01;
    /// Tilt toward the viewer (radians)
    pub const TILT_X: f32 = -20.0 * std::f32::consts::PI / 180.0;

    /// Spawn an empty dock under `parent` (normally the head space).
    pub fn spawn(world: &mut InteractionWorld, parent: ObjectId, config: &SurfaceConfig) -> Result<Self, DockError> {
        let pose = Self::pose(Self::OFFSET_Y);
        let scene = world.scene_mut();
        let root = scene.spawn_child(parent, "dock", pose)?;
        let plate = scene.spawn_child(
            root,
            "dock-plate",
            Transform3D::new(Vec3::new(0.0, 0.0, -layout::DEPTH / 2.0)),
        )?;

        let mut dock = Self {
            root,
            plate,
            slots: Vec::new(),
            layout: DockLayout::default(),
            y: Animated::new(Self::OFFSET_Y),
            lift: config.menu_open_lift,
            panel_motion: Motion {
                duration: config.panel_duration,
                ease: config.ease,
            },
            button_motion: Motion {
                duration: config.button_duration,
                ease: config.ease,
            },
        };
        dock.relayout(world.scene_mut());
        Ok(dock)
    }

    fn pose(y: f32) -> Transform3D {
        Transform3D::new(Vec3::new(0.0, y, Self::OFFSET_Z))
            .with_rotation(Quat::from_rotation_x(Self::TILT_X))
            .with_scale(Vec3::splat(Self::SCALE))
    }

    /// Root node of the dock
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Current plate dimensions and slot positions
    pub fn layout(&self) -> &DockLayout {
        &self.layout
    }

    /// Append a button.
    pub fn add_button(&mut self, world: &mut InteractionWorld, button: Button) -> Result<ObjectId, DockError> {
        let node = self.push(world, button, None)?;
        self.relayout(world.scene_mut());
        Ok(node)
    }

    /// Append several buttons, laying out once.
    pub fn add_buttons(
        &mut self,
        world: &mut InteractionWorld,
        buttons: impl IntoIterator<Item = Button>,
    ) -> Result<Vec<ObjectId>, DockError> {
        let mut nodes = Vec::new();
        for button in buttons {
            nodes.push(self.push(world, button, None)?);
        }
        self.relayout(world.scene_mut());
        Ok(nodes)
    }

    /// Append a button that opens `panel` on selectstart.
    pub fn add_menu(
        &mut self,
        world: &mut InteractionWorld,
        button: Button,
        panel: MenuPanel,
    ) -> Result<ObjectId, DockError> {
        let node = self.push(world, button, Some(panel))?;
        self.relayout(world.scene_mut());
        Ok(node)
    }

    fn push(
        &mut self,
        world: &mut InteractionWorld,
        button: Button,
        menu: Option<MenuPanel>,
    ) -> Result<ObjectId, DockError> {
        let mut button = button.with_motion(self.button_motion);
        let node = button.attach(world, self.root)?;
        let menu = match menu {
            Some(panel) => {
                let mut panel = panel.with_motion(self.panel_motion);
                panel.attach(world, self.root)?;
                Some(panel)
            }
            None => None,
        };
        self.slots.push(DockSlot { button, menu });
        Ok(node)
    }

    fn relayout(&mut self, scene: &mut SceneGraph) {
        self.layout = DockLayout::compute(self.slots.len());
        for (slot, x) in self.slots.iter_mut().zip(&self.layout.slots) {
            slot.button.set_x(*x);
            slot.button.advance(0.0, scene);
        }
        let collider = Collider::cuboid(self.layout.width, self.layout.height, layout::DEPTH);
        let _ = scene.set_collider(self.plate, Some(collider));
    }

    fn slot_index(&self, button: ObjectId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.button.node() == Some(button))
    }

    /// Buttons in slot order
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.slots.iter().map(|slot| &slot.button)
    }

    /// Look up a button by node
    pub fn button(&self, button: ObjectId) -> Option<&Button> {
        self.slot_index(button).map(|i| &self.slots[i].button)
    }

    /// Look up a button by node, mutably
    pub fn button_mut(&mut self, button: ObjectId) -> Option<&mut Button> {
        self.slot_index(button).map(move |i| &mut self.slots[i].button)
    }

    /// Menu owned by a button
    pub fn menu(&self, button: ObjectId) -> Option<&MenuPanel> {
        self.slot_index(button)
            .and_then(|i| self.slots[i].menu.as_ref())
    }

    /// Whether any menu is open
    pub fn is_menu_open(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.menu.as_ref().is_some_and(MenuPanel::is_open))
    }

    /// Toggle the menu owned by `button`, closing every other open menu and
    /// lowering its button first.
    pub fn select_menu(&mut self, button: ObjectId) -> Result<(), DockError> {
        let index = self
            .slot_index(button)
            .ok_or(DockError::UnknownButton(button))?;
        let opening = match &self.slots[index].menu {
            Some(panel) => !panel.is_open(),
            None => return Err(DockError::UnregisteredMenu(button)),
        };

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            if let Some(panel) = slot.menu.as_mut().filter(|panel| panel.is_open()) {
                panel.set_open(false);
                slot.button.set_active(false);
            }
        }

        let slot = &mut self.slots[index];
        slot.button.set_active(opening);
        if let Some(panel) = slot.menu.as_mut() {
            panel.set_open(opening);
        }
        info!(menu = %slot.button.name, open = opening, "menu selected");

        let target = if self.is_menu_open() {
            Self::OFFSET_Y + self.lift
        } else {
            Self::OFFSET_Y
        };
        self.y
            .animate_with(target, self.panel_motion.duration, self.panel_motion.ease);
        Ok(())
    }

    /// Route an event to the addressed button. Selectstart on a menu button
    /// toggles its menu. Returns `false` when no dock button is addressed.
    pub fn handle_event(&mut self, event: &InteractionEvent, commands: &mut WidgetCommands) -> Result<bool, DockError> {
        let Some(index) = self.slot_index(event.target) else {
            return Ok(false);
        };
        let slot = &mut self.slots[index];
        slot.button.handle_event(event, commands);
        if event.kind == EventKind::SelectStart && slot.menu.is_some() {
            self.select_menu(event.target)?;
        }
        Ok(true)
    }

    /// Advance every widget transition and the dock lift by `dt` seconds.
    pub fn advance(&mut self, dt: f32, scene: &mut SceneGraph) {
        for slot in &mut self.slots {
            slot.button.advance(dt, scene);
            if let Some(panel) = slot.menu.as_mut() {
                panel.advance(dt, scene);
            }
        }
        self.y.advance(dt);
        let _ = scene.set_transform(self.root, Self::pose(self.y.value()));
    }

    /// Dock height offset currently applied (animated)
    pub fn y(&self) -> f32 {
        self.y.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrdock_core::DeviceId;

    fn dock_with_menus() -> (InteractionWorld, Dock, ObjectId, ObjectId, ObjectId) {
        let mut world = InteractionWorld::default();
        let head = world.scene_mut().spawn("head", Transform3D::default());
        let mut dock = Dock::spawn(&mut world, head, &SurfaceConfig::default()).unwrap();
        let a = dock
            .add_menu(&mut world, Button::new("a"), MenuPanel::new("menu-a"))
            .unwrap();
        let b = dock
            .add_menu(&mut world, Button::new("b"), MenuPanel::new("menu-b"))
            .unwrap();
        let plain = dock.add_button(&mut world, Button::new("plain")).unwrap();
        (world, dock, a, b, plain)
    }

    fn select_start(dock: &mut Dock, button: ObjectId) {
        let event = InteractionEvent::new(EventKind::SelectStart, button, DeviceId(0));
        assert!(dock.handle_event(&event, &mut WidgetCommands::new()).unwrap());
    }

    #[test]
    fn layout_follows_button_count() {
        let (world, dock, a, b, plain) = dock_with_menus();
        assert_eq!(dock.layout().slots.len(), 3);
        let xs: Vec<f32> = [a, b, plain]
            .iter()
            .map(|id| world.scene().transform(*id).unwrap().position.x)
            .collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert!((xs[0] + xs[2]).abs() < 1e-4);
    }

    #[test]
    fn opening_one_menu_closes_the_other() {
        let (_world, mut dock, a, b, _) = dock_with_menus();
        select_start(&mut dock, a);
        assert!(dock.menu(a).unwrap().is_open());
        assert!(dock.button(a).unwrap().is_active());

        select_start(&mut dock, b);
        assert!(!dock.menu(a).unwrap().is_open());
        assert!(!dock.button(a).unwrap().is_active());
        assert!(dock.menu(b).unwrap().is_open());
        assert!(dock.button(b).unwrap().is_active());
    }

    #[test]
    fn reselecting_closes_and_restores_height() {
        let (mut world, mut dock, a, _, _) = dock_with_menus();
        select_start(&mut dock, a);
        dock.advance(0.2, world.scene_mut());
        assert!((dock.y() - (Dock::OFFSET_Y + 0.15)).abs() < 1e-5);

        select_start(&mut dock, a);
        assert!(!dock.is_menu_open());
        dock.advance(0.2, world.scene_mut());
        assert!((dock.y() - Dock::OFFSET_Y).abs() < 1e-5);
    }

    #[test]
    fn selecting_a_plain_button_is_an_invalid_menu() {
        let (_world, mut dock, _, _, plain) = dock_with_menus();
        assert_eq!(dock.select_menu(plain), Err(DockError::UnregisteredMenu(plain)));
        assert_eq!(
            dock.select_menu(ObjectId(999)),
            Err(DockError::UnknownButton(ObjectId(999)))
        );
        // Selectstart on a plain button is routed but opens nothing.
        select_start(&mut dock, plain);
        assert!(!dock.is_menu_open());
    }

    #[test]
    fn events_for_other_nodes_are_not_claimed() {
        let (_world, mut dock, _, _, _) = dock_with_menus();
        let event = InteractionEvent::new(EventKind::Select, dock.root(), DeviceId(0));
        assert!(!dock.handle_event(&event, &mut WidgetCommands::new()).unwrap());
    }
}
