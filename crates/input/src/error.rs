use thiserror::Error;
use vrdock_core::{DeviceId, ObjectId};

/// Errors raised when the caller addresses something the world does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// No device was constructed with this id.
    #[error("unknown input device {0}")]
    UnknownDevice(DeviceId),
    /// No scene node exists with this id.
    #[error("unknown scene object {0}")]
    UnknownObject(ObjectId),
    /// Reparenting would make a node its own ancestor.
    #[error("cannot parent {child} under its own descendant {parent}")]
    CyclicParent {
        /// Node being moved.
        child: ObjectId,
        /// Requested parent.
        parent: ObjectId,
    },
}
