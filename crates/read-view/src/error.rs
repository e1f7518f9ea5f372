//! Read view error types.

use event_channel::ChannelError;
use thiserror::Error;

use crate::snapshot::SnapshotError;

/// Errors raised by the read view.
///
/// `NotFound`, `AlreadyExists` and `Invalid` concern a single lookup or
/// event. `ChannelFatal` and `BootstrapFatal` mean the process cannot go on.
#[derive(Debug, Error)]
pub enum ReadViewError {
    /// A lookup found nothing.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A unique key is already taken.
    #[error("{entity} already exists with {field} {value}")]
    AlreadyExists {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A required field is empty.
    #[error("Invalid {entity}: missing {field}")]
    Invalid {
        entity: &'static str,
        field: &'static str,
    },

    /// The event channel was lost.
    #[error("Event channel lost: {0}")]
    ChannelFatal(#[from] ChannelError),

    /// The authoritative store could not be read at startup.
    #[error("Bootstrap failed: {0}")]
    BootstrapFatal(#[from] SnapshotError),
}

impl ReadViewError {
    /// Returns true for errors that must terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReadViewError::ChannelFatal(_) | ReadViewError::BootstrapFatal(_)
        )
    }
}

/// Result type for read view operations.
pub type Result<T> = std::result::Result<T, ReadViewError>;
