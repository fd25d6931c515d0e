use thiserror::Error;
use vrdock_core::ObjectId;
use vrdock_input::InteractionError;

/// Errors raised by dock and surface operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DockError {
    /// The button exists on the dock but was added without a menu.
    #[error("button {0} has no menu registered with the dock")]
    UnregisteredMenu(ObjectId),
    /// No dock button has this node.
    #[error("{0} is not a dock button")]
    UnknownButton(ObjectId),
    /// Scene or device lookup failed.
    #[error(transparent)]
    Interaction(#[from] InteractionError),
}
