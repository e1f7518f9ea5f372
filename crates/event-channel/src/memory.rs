use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{ChannelError, EventChannel, EventEnvelope, Result};

/// Creates a bounded in-process channel.
///
/// Publishers wait when `capacity` envelopes are buffered.
pub fn in_memory_channel(capacity: usize) -> (EventPublisher, InMemoryEventChannel) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        EventPublisher { sender },
        InMemoryEventChannel { receiver },
    )
}

/// Producer handle for an [`InMemoryEventChannel`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: mpsc::Sender<EventEnvelope>,
}

impl EventPublisher {
    /// Enqueues an envelope, waiting for buffer space.
    #[tracing::instrument(skip(self, envelope), fields(event_type = %envelope.event_type, event_id = %envelope.event_id))]
    pub async fn publish(&self, envelope: EventEnvelope) -> Result<()> {
        self.sender
            .send(envelope)
            .await
            .map_err(|_| ChannelError::Closed)?;
        tracing::debug!("event published");
        Ok(())
    }

    /// Returns true once the consumer side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer side of the in-process channel.
///
/// Reports [`ChannelError::Closed`] once every [`EventPublisher`] is dropped
/// and the buffer is drained.
#[derive(Debug)]
pub struct InMemoryEventChannel {
    receiver: mpsc::Receiver<EventEnvelope>,
}

#[async_trait]
impl EventChannel for InMemoryEventChannel {
    async fn next(&mut self) -> Result<EventEnvelope> {
        self.receiver.recv().await.ok_or(ChannelError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(event_type: &str) -> EventEnvelope {
        EventEnvelope::builder()
            .event_type(event_type)
            .payload_raw(serde_json::json!({}))
            .build()
    }

    #[tokio::test]
    async fn delivers_in_publish_order() {
        let (publisher, mut channel) = in_memory_channel(8);

        publisher.publish(envelope("UserCreated")).await.unwrap();
        publisher.publish(envelope("TweetCreated")).await.unwrap();

        assert_eq!(channel.next().await.unwrap().event_type, "UserCreated");
        assert_eq!(channel.next().await.unwrap().event_type, "TweetCreated");
    }

    #[tokio::test]
    async fn drains_buffer_before_reporting_closed() {
        let (publisher, mut channel) = in_memory_channel(8);
        publisher.publish(envelope("UserCreated")).await.unwrap();
        drop(publisher);

        assert!(channel.next().await.is_ok());
        assert!(matches!(channel.next().await, Err(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn publish_fails_once_consumer_is_gone() {
        let (publisher, channel) = in_memory_channel(1);
        drop(channel);

        assert!(publisher.is_closed());
        let result = publisher.publish(envelope("UserCreated")).await;
        assert!(matches!(result, Err(ChannelError::Closed)));
    }
}
