//! Applies the live event stream to the materialized store.

use std::future::Future;

use event_channel::{DecodeError, EventChannel, EventEnvelope, FeedEvent};

use crate::Result;
use crate::store::MaterializedStore;

/// What happened to a single envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The store accepted the mutation.
    Applied,
    /// The event decoded but the store refused it (invalid or duplicate).
    Rejected,
    /// The event could not be decoded or has an unknown type.
    Dropped,
}

/// Counters for envelopes seen by a projector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectorStats {
    pub received: u64,
    pub applied: u64,
    pub rejected: u64,
    pub dropped: u64,
}

impl ProjectorStats {
    fn record(&mut self, outcome: ApplyOutcome) {
        self.received += 1;
        match outcome {
            ApplyOutcome::Applied => self.applied += 1,
            ApplyOutcome::Rejected => self.rejected += 1,
            ApplyOutcome::Dropped => self.dropped += 1,
        }
    }
}

impl std::fmt::Display for ProjectorStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "received={} applied={} rejected={} dropped={}",
            self.received, self.applied, self.rejected, self.dropped
        )
    }
}

/// The single writer of a [`MaterializedStore`] during live operation.
///
/// Bad messages are logged and skipped: a decode failure, an unknown event
/// type or a store rejection never stops the loop. Only losing the channel
/// ends [`Projector::run`] with an error.
pub struct Projector {
    store: MaterializedStore,
    stats: ProjectorStats,
}

impl Projector {
    pub fn new(store: MaterializedStore) -> Self {
        Self {
            store,
            stats: ProjectorStats::default(),
        }
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> ProjectorStats {
        self.stats
    }

    /// Decodes one envelope and applies it to the store.
    #[tracing::instrument(skip(self, envelope), fields(event_type = %envelope.event_type, event_id = %envelope.event_id))]
    pub async fn apply(&mut self, envelope: &EventEnvelope) -> ApplyOutcome {
        let outcome = match FeedEvent::decode(envelope) {
            Ok(event) => self.dispatch(event).await,
            Err(DecodeError::UnknownEventType(tag)) => {
                tracing::warn!(event_type = %tag, "skipping unknown event type");
                ApplyOutcome::Dropped
            }
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed event");
                ApplyOutcome::Dropped
            }
        };

        let counter = match outcome {
            ApplyOutcome::Applied => "read_view_events_applied",
            ApplyOutcome::Rejected => "read_view_events_rejected",
            ApplyOutcome::Dropped => "read_view_events_dropped",
        };
        metrics::counter!(counter, "event_type" => envelope.event_type.clone()).increment(1);

        self.stats.record(outcome);
        outcome
    }

    async fn dispatch(&self, event: FeedEvent) -> ApplyOutcome {
        let event_type = event.event_type();
        let result = match event {
            FeedEvent::UserCreated(user) => self.store.add_user(user).await,
            FeedEvent::TweetCreated(tweet) => self.store.add_tweet(tweet).await,
            FeedEvent::FollowCreated(follow) => self.store.add_follow(follow).await,
        };

        match result {
            Ok(()) => {
                tracing::debug!(event_type, "event applied");
                ApplyOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(event_type, error = %err, "event rejected by read view");
                ApplyOutcome::Rejected
            }
        }
    }

    /// Consumes `channel` until `shutdown` resolves or the channel fails.
    ///
    /// Shutdown is only observed between envelopes, so a mutation that has
    /// started always completes. Returns the final counters on shutdown and
    /// `ChannelFatal` when the channel is lost.
    #[tracing::instrument(skip_all)]
    pub async fn run<C, F>(mut self, mut channel: C, shutdown: F) -> Result<ProjectorStats>
    where
        C: EventChannel,
        F: Future<Output = ()>,
    {
        tracing::info!("projector consuming events");
        tokio::pin!(shutdown);

        loop {
            let received = tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!(stats = %self.stats, "projector stopped");
                    return Ok(self.stats);
                }
                received = channel.next() => received,
            };

            match received {
                Ok(envelope) => {
                    self.apply(&envelope).await;
                }
                Err(err) => {
                    tracing::error!(error = %err, stats = %self.stats, "event channel lost");
                    return Err(err.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use common::{Follow, Tweet, User};
    use event_channel::in_memory_channel;

    use super::*;
    use crate::ReadViewError;

    fn envelope(event: impl Into<FeedEvent>) -> EventEnvelope {
        EventEnvelope::from_event(&event.into()).unwrap()
    }

    fn raw(event_type: &str, payload: serde_json::Value) -> EventEnvelope {
        EventEnvelope::builder()
            .event_type(event_type)
            .payload_raw(payload)
            .build()
    }

    #[tokio::test]
    async fn dispatches_each_event_kind() {
        let store = MaterializedStore::new();
        let mut projector = Projector::new(store.clone());

        let user = User::new("A", "alice", "pw");
        let follow = Follow::new("A", "alice", "B", "bob");
        let tweet = Tweet::new("t1", "B", "bob", "hi");

        assert_eq!(projector.apply(&envelope(user.clone())).await, ApplyOutcome::Applied);
        assert_eq!(projector.apply(&envelope(follow.clone())).await, ApplyOutcome::Applied);
        assert_eq!(projector.apply(&envelope(tweet.clone())).await, ApplyOutcome::Applied);

        assert_eq!(store.get_user_by_id(&"A".into()).await.unwrap(), user);
        assert_eq!(store.get_followers(&"B".into()).await, vec![follow]);
        assert_eq!(store.get_timeline(&"A".into()).await, vec![tweet]);
    }

    #[tokio::test]
    async fn redelivered_user_is_rejected_not_doubled() {
        let store = MaterializedStore::new();
        let mut projector = Projector::new(store.clone());
        let event = envelope(User::new("A", "alice", "pw"));

        projector.apply(&event).await;
        assert_eq!(projector.apply(&event).await, ApplyOutcome::Rejected);

        assert_eq!(store.counts().await.users, 1);
        assert_eq!(projector.stats().rejected, 1);
    }

    #[tokio::test]
    async fn unknown_and_malformed_events_are_dropped() {
        let mut projector = Projector::new(MaterializedStore::new());

        let unknown = raw("TweetLiked", serde_json::json!({"tweetId": "t1"}));
        let malformed = raw("TweetCreated", serde_json::json!({"authorId": "B"}));

        assert_eq!(projector.apply(&unknown).await, ApplyOutcome::Dropped);
        assert_eq!(projector.apply(&malformed).await, ApplyOutcome::Dropped);
        assert_eq!(projector.stats().dropped, 2);
    }

    #[tokio::test]
    async fn empty_field_is_rejected_by_store() {
        let mut projector = Projector::new(MaterializedStore::new());
        let event = envelope(Follow::new("A", "alice", "", "bob"));

        assert_eq!(projector.apply(&event).await, ApplyOutcome::Rejected);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_with_stats() {
        let store = MaterializedStore::new();
        let (publisher, channel) = in_memory_channel(8);
        publisher
            .publish(envelope(User::new("A", "alice", "pw")))
            .await
            .unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(Projector::new(store.clone()).run(channel, async move {
            let _ = stop_rx.await;
        }));

        while store.counts().await.users == 0 {
            tokio::task::yield_now().await;
        }
        stop_tx.send(()).unwrap();

        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats.applied, 1);
        drop(publisher);
    }

    #[tokio::test]
    async fn run_fails_when_channel_closes() {
        let (publisher, channel) = in_memory_channel(8);
        drop(publisher);

        let result = Projector::new(MaterializedStore::new())
            .run(channel, std::future::pending())
            .await;

        assert!(matches!(result, Err(ReadViewError::ChannelFatal(_))));
    }
}
