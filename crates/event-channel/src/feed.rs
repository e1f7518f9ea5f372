//! The events the read view understands.

use common::{Follow, Tweet, User};
use serde::de::DeserializeOwned;

use crate::{DecodeError, EventEnvelope};

/// A decoded change notification from the write side.
///
/// New event kinds are added here as variants; tags outside this set decode
/// to [`DecodeError::UnknownEventType`] so older consumers can skip them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A user was registered.
    UserCreated(User),

    /// A user posted a tweet.
    TweetCreated(Tweet),

    /// A user started following another user.
    FollowCreated(Follow),
}

impl FeedEvent {
    pub const USER_CREATED: &'static str = "UserCreated";
    pub const TWEET_CREATED: &'static str = "TweetCreated";
    pub const FOLLOW_CREATED: &'static str = "FollowCreated";

    /// Returns the wire tag for this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            FeedEvent::UserCreated(_) => Self::USER_CREATED,
            FeedEvent::TweetCreated(_) => Self::TWEET_CREATED,
            FeedEvent::FollowCreated(_) => Self::FOLLOW_CREATED,
        }
    }

    /// Serializes the payload record alone.
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            FeedEvent::UserCreated(user) => serde_json::to_value(user),
            FeedEvent::TweetCreated(tweet) => serde_json::to_value(tweet),
            FeedEvent::FollowCreated(follow) => serde_json::to_value(follow),
        }
    }

    /// Interprets an envelope's payload according to its type tag.
    pub fn decode(envelope: &EventEnvelope) -> Result<Self, DecodeError> {
        match envelope.event_type.as_str() {
            Self::USER_CREATED => decode_payload(envelope).map(FeedEvent::UserCreated),
            Self::TWEET_CREATED => decode_payload(envelope).map(FeedEvent::TweetCreated),
            Self::FOLLOW_CREATED => decode_payload(envelope).map(FeedEvent::FollowCreated),
            other => Err(DecodeError::UnknownEventType(other.to_string())),
        }
    }
}

fn decode_payload<T: DeserializeOwned>(envelope: &EventEnvelope) -> Result<T, DecodeError> {
    T::deserialize(&envelope.payload).map_err(|source| DecodeError::Payload {
        event_type: envelope.event_type.clone(),
        source,
    })
}

impl From<User> for FeedEvent {
    fn from(user: User) -> Self {
        FeedEvent::UserCreated(user)
    }
}

impl From<Tweet> for FeedEvent {
    fn from(tweet: Tweet) -> Self {
        FeedEvent::TweetCreated(tweet)
    }
}

impl From<Follow> for FeedEvent {
    fn from(follow: Follow) -> Self {
        FeedEvent::FollowCreated(follow)
    }
}
