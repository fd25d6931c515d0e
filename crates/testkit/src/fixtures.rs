//! Scene fixtures shared by integration tests.

use anyhow::{Context, Result};
use glam::Vec3;
use vrdock_core::{DeviceId, ObjectId, Transform3D};
use vrdock_input::crank::DEFAULT_INCREMENT;
use vrdock_input::{HandCrank, InputSource, InteractionConfig, InteractionWorld, PropertyBinding};
use vrdock_ui3d::{Button, ControlSurface, MenuPanel, SurfaceConfig};

/// A surface whose dock holds two menu buttons and one plain button.
#[derive(Debug)]
pub struct MenuDock {
    /// The assembled surface.
    pub surface: ControlSurface,
    /// Menu buttons, left to right.
    pub menus: [ObjectId; 2],
    /// Button without a menu.
    pub plain: ObjectId,
}

/// Build a [`MenuDock`] with default configuration and settle it for one tick.
pub fn menu_dock() -> Result<MenuDock> {
    let mut surface = ControlSurface::new(InteractionConfig::default(), SurfaceConfig::default())?;
    let (dock, world) = surface.dock_parts();
    let a = dock.add_menu(world, Button::new("menu-a"), MenuPanel::new("panel-a"))?;
    let b = dock.add_menu(world, Button::new("menu-b"), MenuPanel::new("panel-b"))?;
    let plain = dock.add_button(world, Button::new("plain"))?;
    surface.tick(0.0)?;
    Ok(MenuDock {
        surface,
        menus: [a, b],
        plain,
    })
}

/// Construct and connect a device without haptics.
pub fn connect_device(world: &mut InteractionWorld, index: u32) -> Result<DeviceId> {
    connect_device_with(world, index, InputSource::default())
}

/// Construct and connect a device with the given source descriptor.
pub fn connect_device_with(world: &mut InteractionWorld, index: u32, source: InputSource) -> Result<DeviceId> {
    let device = world.add_device(index, None)?;
    world.connect(device, source)?;
    Ok(device)
}

/// Point `device` straight down the world -Z axis at `target`'s origin from
/// half a meter away.
pub fn aim_at(world: &mut InteractionWorld, device: DeviceId, target: ObjectId) -> Result<()> {
    let position = world
        .scene()
        .world_position(target)
        .with_context(|| format!("{target} is not in the scene"))?;
    world.set_ray_pose(device, Transform3D::new(position + Vec3::new(0.0, 0.0, 0.5)))?;
    Ok(())
}

/// Point `device` somewhere nothing is registered.
pub fn aim_away(world: &mut InteractionWorld, device: DeviceId) -> Result<()> {
    world.set_ray_pose(device, Transform3D::new(Vec3::new(0.0, -100.0, 0.0)))?;
    Ok(())
}

/// A crank added to a surface, bound to a property on a dial node.
#[derive(Debug, Clone)]
pub struct CrankFixture {
    /// Crank root node.
    pub root: ObjectId,
    /// Grippable handle node.
    pub handle: ObjectId,
    /// Property the crank drives.
    pub binding: PropertyBinding,
}

impl CrankFixture {
    /// World point just outside the handle's outer face, within grip range.
    pub fn grip_point(&self, world: &InteractionWorld) -> Result<Vec3> {
        let matrix = world
            .scene()
            .world_matrix(self.handle)
            .context("crank handle missing")?;
        Ok(matrix.transform_point3(Vec3::new(1.03, 0.0, 0.0)))
    }

    /// Crank pivot in world space.
    pub fn pivot(&self, world: &InteractionWorld) -> Result<Vec3> {
        world
            .scene()
            .world_position(self.root)
            .context("crank root missing")
    }
}

/// Spawn a crank at its stock pose and hand it to the surface.
pub fn add_crank(surface: &mut ControlSurface) -> Result<CrankFixture> {
    let world = surface.world_mut();
    let dial = world.scene_mut().spawn("dial", Transform3D::default());
    let binding = PropertyBinding::new(dial, "value");
    let crank = HandCrank::spawn(
        world,
        None,
        HandCrank::default_pose(),
        binding.clone(),
        DEFAULT_INCREMENT,
    )?;
    let fixture = CrankFixture {
        root: crank.root(),
        handle: crank.handle(),
        binding,
    };
    surface.add_crank(crank);
    Ok(fixture)
}
