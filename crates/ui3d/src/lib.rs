#![warn(missing_docs)]
//! Head-locked VR widgets for vrdock
//!
//! Widgets live in the interaction world's scene graph and react to the
//! events it dispatches:
//!
//! - **Buttons**: raise on hover or when held by their dock, lower otherwise
//! - **Menu panels**: unfold and collapse with a deferred hide
//! - **Dock**: lays buttons out in a row and keeps at most one menu open
//! - **Head space**: trails the camera while no menu is open
//!
//! # Example
//!
//! ```rust,no_run
//! use vrdock_input::{InteractionConfig, EventKind};
//! use vrdock_ui3d::{Button, ControlSurface, MenuPanel, SurfaceConfig, WidgetCommand};
//!
//! let mut surface = ControlSurface::new(InteractionConfig::default(), SurfaceConfig::default())?;
//! let (dock, world) = surface.dock_parts();
//! dock.add_button(
//!     world,
//!     Button::new("lock").on(EventKind::Select, |_, commands| {
//!         commands.push(WidgetCommand::ToggleHeadTracking);
//!     }),
//! )?;
//! dock.add_menu(world, Button::new("settings"), MenuPanel::new("settings-menu"))?;
//!
//! // Once per displayed frame:
//! let hover_events = surface.tick(1.0 / 72.0)?;
//! # Ok::<(), vrdock_ui3d::DockError>(())
//! ```

pub mod components;
mod config;
mod error;
pub mod head;
pub mod layout;
pub mod surface;
pub mod tween;

pub use components::{Button, ButtonState, Dock, MenuPanel, Motion, UIComponent, WidgetCommand, WidgetCommands};
pub use config::SurfaceConfig;
pub use error::DockError;
pub use head::HeadSpace;
pub use layout::DockLayout;
pub use surface::ControlSurface;
pub use tween::{Animated, Ease, Tween};
