//! The control surface: one interaction world plus the widgets living in it.
//!
//! A tick runs in a fixed order: widget transitions advance, the head space
//! follows the camera, scheduled gestures run, the active device is hover
//! diffed, and every dispatched event is routed to the dock and the cranks.

use crate::components::{Dock, WidgetCommand, WidgetCommands};
use crate::config::SurfaceConfig;
use crate::head::HeadSpace;
use crate::DockError;
use tracing::{debug, warn};
use vrdock_core::{DeviceId, SimTick, Transform3D};
use vrdock_input::{HandCrank, InteractionConfig, InteractionEvent, InteractionWorld, PrimaryAction};

/// Everything the application drives once per displayed frame
#[derive(Debug)]
pub struct ControlSurface {
    world: InteractionWorld,
    head: HeadSpace,
    dock: Dock,
    cranks: Vec<HandCrank>,
    camera: Transform3D,
    config: SurfaceConfig,
}

impl ControlSurface {
    /// Build a world with a head space and an empty dock.
    pub fn new(interaction: InteractionConfig, config: SurfaceConfig) -> Result<Self, DockError> {
        let mut world = InteractionWorld::new(interaction);
        let head = HeadSpace::spawn(world.scene_mut(), config.head_tracking, config.head_follow_rate);
        let dock = Dock::spawn(&mut world, head.node(), &config)?;
        Ok(Self {
            world,
            head,
            dock,
            cranks: Vec::new(),
            camera: Transform3D::new(HeadSpace::INITIAL_POSITION),
            config,
        })
    }

    /// Interaction world
    pub fn world(&self) -> &InteractionWorld {
        &self.world
    }

    /// Interaction world, mutably (device poses, connections, scene edits)
    pub fn world_mut(&mut self) -> &mut InteractionWorld {
        &mut self.world
    }

    /// Dock
    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    /// Dock together with the world it lives in, for assembly.
    pub fn dock_parts(&mut self) -> (&mut Dock, &mut InteractionWorld) {
        (&mut self.dock, &mut self.world)
    }

    /// Head space
    pub fn head(&self) -> &HeadSpace {
        &self.head
    }

    /// Widget settings
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Cranks in registration order
    pub fn cranks(&self) -> &[HandCrank] {
        &self.cranks
    }

    /// Take ownership of a spawned crank so it receives routed events.
    pub fn add_crank(&mut self, crank: HandCrank) {
        self.cranks.push(crank);
    }

    /// Latest camera pose; consumed by head follow on the next tick.
    pub fn set_camera_pose(&mut self, pose: Transform3D) {
        self.camera = pose;
    }

    /// Ticks completed so far
    pub fn tick_count(&self) -> SimTick {
        self.world.state().tick_count()
    }

    /// Feed a primary action and route the resulting events.
    pub fn handle_action(&mut self, device: DeviceId, action: PrimaryAction) -> Result<Vec<InteractionEvent>, DockError> {
        let events = self.world.handle_action(device, action)?;
        self.route(&events)?;
        Ok(events)
    }

    /// Run one frame and return the hover events it produced.
    pub fn tick(&mut self, dt: f32) -> Result<Vec<InteractionEvent>, DockError> {
        self.dock.advance(dt, self.world.scene_mut());

        if self.head.is_tracking() && !self.dock.is_menu_open() {
            self.head.follow(self.world.scene_mut(), &self.camera)?;
        }

        let events = self.world.tick();
        self.route(&events)?;
        Ok(events)
    }

    fn route(&mut self, events: &[InteractionEvent]) -> Result<(), DockError> {
        for event in events {
            let mut commands = WidgetCommands::new();
            self.dock.handle_event(event, &mut commands)?;
            for crank in &mut self.cranks {
                crank.handle_event(&mut self.world, event)?;
            }
            self.apply(commands)?;
        }
        Ok(())
    }

    fn apply(&mut self, commands: WidgetCommands) -> Result<(), DockError> {
        for command in commands {
            debug!(?command, "applying widget command");
            match command {
                WidgetCommand::ToggleHeadTracking => {
                    let tracking = !self.head.is_tracking();
                    self.head.set_tracking(tracking);
                }
                WidgetCommand::SetIcon { button, path } => {
                    self.dock
                        .button_mut(button)
                        .ok_or(DockError::UnknownButton(button))?
                        .set_icon(path);
                }
                WidgetCommand::ShowHeadTracking {
                    button,
                    locked,
                    unlocked,
                } => {
                    let icon = if self.head.is_tracking() { locked } else { unlocked };
                    self.dock
                        .button_mut(button)
                        .ok_or(DockError::UnknownButton(button))?
                        .set_icon(icon);
                }
                WidgetCommand::Pulse { device } => {
                    if !self.world.state_mut().pulse(device)? {
                        warn!(%device, "pulse requested on a device without haptics");
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Button, MenuPanel};
    use glam::{Quat, Vec3};
    use std::{cell::Cell, rc::Rc};
    use vrdock_input::{EventKind, InputSource};

    fn surface() -> ControlSurface {
        ControlSurface::new(InteractionConfig::default(), SurfaceConfig::default()).unwrap()
    }

    #[test]
    fn head_follows_camera_until_a_menu_opens() {
        let mut surface = surface();
        let (dock, world) = surface.dock_parts();
        let menu = dock
            .add_menu(world, Button::new("m"), MenuPanel::new("menu"))
            .unwrap();

        let camera = Transform3D::new(Vec3::new(0.0, 1.7, 0.0)).with_rotation(Quat::from_rotation_y(0.5));
        surface.set_camera_pose(camera);
        surface.tick(0.016).unwrap();
        let head = surface.head().node();
        assert_eq!(
            surface.world().scene().transform(head).unwrap().position,
            camera.position
        );

        surface.dock.select_menu(menu).unwrap();
        surface.set_camera_pose(Transform3D::new(Vec3::new(5.0, 1.7, 0.0)));
        surface.tick(0.016).unwrap();
        assert_eq!(
            surface.world().scene().transform(head).unwrap().position,
            camera.position,
            "frozen while a menu is open"
        );
    }

    #[test]
    fn toggle_command_flips_tracking_and_icon() {
        let mut surface = surface();
        let (dock, world) = surface.dock_parts();
        let lock = dock
            .add_button(
                world,
                Button::new("lock")
                    .with_icon("/icons/locked.svg")
                    .on(EventKind::Select, |event, commands| {
                        commands.push(WidgetCommand::ToggleHeadTracking);
                        commands.push(WidgetCommand::ShowHeadTracking {
                            button: event.target,
                            locked: "/icons/locked.svg".into(),
                            unlocked: "/icons/unlocked.svg".into(),
                        });
                    }),
            )
            .unwrap();

        let event = InteractionEvent::new(EventKind::Select, lock, DeviceId(0));
        surface.route(&[event]).unwrap();
        assert!(!surface.head().is_tracking());
        assert_eq!(
            surface.dock().button(lock).unwrap().icon_path(),
            Some("/icons/unlocked.svg")
        );
    }

    #[test]
    fn hover_events_raise_dock_buttons() {
        let mut surface = surface();
        let (dock, world) = surface.dock_parts();
        let button = dock.add_button(world, Button::new("solo")).unwrap();
        // Settle the head space and dock before aiming.
        surface.tick(0.0).unwrap();

        let target = surface.world().scene().world_position(button).unwrap();
        let origin = target + Vec3::new(0.0, 0.0, 1.0);
        let device = surface.world_mut().add_device(0, None).unwrap();
        surface
            .world_mut()
            .connect(device, InputSource::default())
            .unwrap();
        surface
            .world_mut()
            .set_ray_pose(device, Transform3D::new(origin))
            .unwrap();

        let events = surface.tick(0.0).unwrap();
        assert_eq!(
            events,
            vec![InteractionEvent::new(EventKind::PointerEnter, button, device)]
        );
        assert!(surface.dock().button(button).unwrap().is_active());
    }

    #[test]
    fn callbacks_see_advanced_widgets_and_feed_the_same_hover_diff() {
        let mut surface = surface();
        let (dock, world) = surface.dock_parts();
        let raised = dock.add_button(world, Button::new("raised")).unwrap();
        let target = dock.add_button(world, Button::new("target")).unwrap();
        surface.tick(0.0).unwrap();

        let device = surface.world_mut().add_device(0, None).unwrap();
        surface
            .world_mut()
            .connect(device, InputSource::default())
            .unwrap();
        surface
            .world_mut()
            .set_ray_pose(device, Transform3D::new(Vec3::splat(1000.0)))
            .unwrap();
        assert!(surface.tick(0.0).unwrap().is_empty());

        // Lift starts before the tick; the callback must observe it mid-flight.
        let (dock, _) = surface.dock_parts();
        dock.button_mut(raised).unwrap().set_active(true);

        let seen_depth = Rc::new(Cell::new(f32::NAN));
        let seen = Rc::clone(&seen_depth);
        surface.world_mut().register_update(move |state| {
            if let Some(transform) = state.scene().transform(raised) {
                seen.set(transform.position.z);
            }
            let Some(aim) = state.scene().world_position(target) else {
                return;
            };
            let Ok(ray_space) = state.device(device).map(|d| d.ray_space()) else {
                return;
            };
            let _ = state
                .scene_mut()
                .set_transform(ray_space, Transform3D::new(aim + Vec3::Z));
        });

        let events = surface.tick(0.05).unwrap();
        assert_eq!(
            events,
            vec![InteractionEvent::new(EventKind::PointerEnter, target, device)]
        );
        let rest = Button::OFFSET + Button::DEPTH;
        let top = rest + Button::HOVER_OFFSET;
        let depth = seen_depth.get();
        assert!(depth > rest && depth < top, "depth {depth} not mid-transition");
        assert!(surface.dock().button(target).unwrap().is_hovered());
    }

    #[test]
    fn set_icon_command_reaches_the_named_button() {
        let mut surface = surface();
        let (dock, world) = surface.dock_parts();
        let swap = dock
            .add_button(
                world,
                Button::new("swap")
                    .with_icon("/icons/before.svg")
                    .on(EventKind::Select, |event, commands| {
                        commands.push(WidgetCommand::SetIcon {
                            button: event.target,
                            path: "/icons/after.svg".into(),
                        });
                    }),
            )
            .unwrap();

        surface
            .route(&[InteractionEvent::new(EventKind::Select, swap, DeviceId(0))])
            .unwrap();
        assert_eq!(
            surface.dock().button(swap).unwrap().icon_path(),
            Some("/icons/after.svg")
        );

        let stray = surface.dock().root();
        let err = surface
            .apply(vec![WidgetCommand::SetIcon {
                button: stray,
                path: "/icons/none.svg".into(),
            }])
            .unwrap_err();
        assert!(matches!(err, DockError::UnknownButton(id) if id == stray));
    }
}
