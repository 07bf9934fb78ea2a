//! Error types for engine operations.
//!
//! Everything the gesture state machine can recover from (stray pointer-up,
//! unresolvable drop target, settle timeout) is handled internally and never
//! surfaces here. These variants are the loud failures: operating on an
//! entity that was disposed or never registered, or subscribing to a channel
//! that has been closed.

use thiserror::Error;

use crate::types::{ContainerId, ItemId};

/// Errors that can occur when driving the drag-and-drop engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    /// The item id is not registered (possibly already disposed).
    #[error("unknown drag item: {0:?}")]
    UnknownItem(ItemId),

    /// The container id is not registered (possibly already disposed).
    #[error("unknown drop container: {0:?}")]
    UnknownContainer(ContainerId),

    /// The notification channel has been closed; no further subscriptions
    /// are accepted.
    #[error("event channel is closed")]
    ChannelClosed,
}

/// Result type alias for engine operations.
pub type DragResult<T> = Result<T, DragError>;
