use thiserror::Error;

/// Failures of the transport itself. These are fatal to a consumer.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The other end of the channel is gone.
    #[error("Event channel closed")]
    Closed,
}

/// Failures turning an envelope into a [`crate::FeedEvent`].
///
/// These concern a single message and never the channel as a whole.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The type tag names no known event.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// The payload does not match the shape declared by its type tag.
    #[error("Malformed {event_type} payload: {source}")]
    Payload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
