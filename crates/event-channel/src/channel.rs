use async_trait::async_trait;

use crate::{EventEnvelope, Result};

/// Consumer side of an event transport.
///
/// Delivery is at-least-once with no ordering guarantee across producers.
/// Implementations block in [`EventChannel::next`] until a message arrives
/// and return an error only when the transport itself is lost.
#[async_trait]
pub trait EventChannel: Send {
    /// Waits for the next envelope.
    async fn next(&mut self) -> Result<EventEnvelope>;
}
