//! Event envelopes and the channel that carries them to the read view.
//!
//! - [`EventEnvelope`] is the wire unit: a type tag plus a JSON payload
//! - [`FeedEvent`] is the closed set of events the read view understands
//! - [`EventChannel`] is the consumer side of an at-least-once transport
//! - [`in_memory_channel`] builds a bounded in-process channel

pub mod channel;
pub mod error;
pub mod event;
pub mod feed;
pub mod memory;

pub use channel::EventChannel;
pub use common::{Follow, Tweet, TweetId, User, UserId};
pub use error::{ChannelError, DecodeError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId};
pub use feed::FeedEvent;
pub use memory::{EventPublisher, InMemoryEventChannel, in_memory_channel};
