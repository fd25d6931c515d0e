//! The stock control surface: a five-button dock whose first button pins the
//! dock in place, two controllers, and an optional hand crank.

use crate::config::AppConfig;
use anyhow::Result;
use tracing::info;
use vrdock_core::{DeviceId, ObjectId, Transform3D};
use vrdock_input::{EventKind, HandCrank, PropertyBinding};
use vrdock_ui3d::{Button, ControlSurface, WidgetCommand};

pub const LOCKED_ICON: &str = "/icons/locked.svg";
pub const UNLOCKED_ICON: &str = "/icons/unlocked.svg";

/// Shape buttons: name and colour.
const SHAPES: [(&str, u32); 4] = [
    ("triangle", 0x75ff5f),
    ("circle", 0xff5f5f),
    ("cross", 0x5f82ff),
    ("square", 0xff9549),
];

/// Handles to the parts of an assembled stock surface.
#[derive(Debug)]
pub struct StockSurface {
    pub surface: ControlSurface,
    pub head_lock: ObjectId,
    pub shapes: Vec<ObjectId>,
    pub devices: [DeviceId; 2],
    pub crank: Option<PropertyBinding>,
}

pub fn build(config: &AppConfig) -> Result<StockSurface> {
    let mut surface = ControlSurface::new(config.interaction.clone(), config.surface.clone())?;
    let tracking = config.surface.head_tracking;

    let (dock, world) = surface.dock_parts();
    let mut buttons = vec![head_lock_button(tracking)];
    buttons.extend(SHAPES.iter().map(|(name, color)| shape_button(name, *color)));
    let nodes = dock.add_buttons(world, buttons)?;
    let (head_lock, shapes) = match nodes.split_first() {
        Some((first, rest)) => (*first, rest.to_vec()),
        None => anyhow::bail!("stock dock came up empty"),
    };

    let devices = [
        surface.world_mut().add_device(0, None)?,
        surface.world_mut().add_device(1, None)?,
    ];

    let crank = if config.crank.enabled {
        let world = surface.world_mut();
        let dial = world.scene_mut().spawn("crank-dial", Transform3D::default());
        let binding = PropertyBinding::new(dial, "value");
        let crank = HandCrank::spawn(
            world,
            None,
            HandCrank::default_pose(),
            binding.clone(),
            config.crank.increment,
        )?;
        surface.add_crank(crank);
        Some(binding)
    } else {
        None
    };

    info!(
        buttons = shapes.len() + 1,
        crank = crank.is_some(),
        "stock surface assembled"
    );
    Ok(StockSurface {
        surface,
        head_lock,
        shapes,
        devices,
        crank,
    })
}

fn head_lock_button(tracking: bool) -> Button {
    Button::new("test1")
        .with_color(0xf5f5f5)
        .with_icon(if tracking { LOCKED_ICON } else { UNLOCKED_ICON })
        .on(EventKind::Select, |event, commands| {
            commands.push(WidgetCommand::ToggleHeadTracking);
            commands.push(WidgetCommand::ShowHeadTracking {
                button: event.target,
                locked: LOCKED_ICON.to_string(),
                unlocked: UNLOCKED_ICON.to_string(),
            });
        })
}

fn shape_button(name: &str, color: u32) -> Button {
    Button::new(name)
        .with_color(color)
        .with_icon(format!("/icons/{name}.svg"))
}
