#![warn(missing_docs)]
//! Spatial input routing for handheld controllers.
//!
//! Devices point rays and sweep grip spheres at registered targets in a scene
//! graph. Each tick the active device is hover-diffed into enter/leave events,
//! and multi-frame gestures (the hand crank) run as scheduled callbacks. All
//! shared state lives in one [`InteractionWorld`].

pub mod config;
pub mod crank;
pub mod device;
mod error;
pub mod events;
pub mod hover;
pub mod properties;
pub mod query;
pub mod registry;
pub mod scene;
pub mod scheduler;
pub mod world;

pub use config::InteractionConfig;
pub use crank::{wrap_angle_delta, HandCrank};
pub use device::{ConnectionState, Handedness, HapticPulse, InputDevice, InputSource, Laser, PrimaryAction};
pub use error::InteractionError;
pub use events::{EventKind, InteractionEvent, Observers};
pub use hover::HoverBuffer;
pub use properties::{PropertyBinding, PropertyStore};
pub use query::{GripScanMode, GripSphere, IntersectionRecord, Ray};
pub use registry::{TargetKind, TargetRegistry, TargetSet};
pub use scene::{Collider, SceneGraph, SceneNode};
pub use scheduler::{CallbackHandle, FrameScheduler};
pub use world::{InteractionWorld, WorldState};
