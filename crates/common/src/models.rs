//! Entity records.
//!
//! The same shapes travel in event payloads, in the bulk-export snapshot and
//! in the read view's indexes. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::{TweetId, UserId};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Password hash or plaintext placeholder, as stored upstream.
    #[serde(default)]
    pub password: String,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the first required field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.id.is_empty() {
            Some("id")
        } else if self.username.is_empty() {
            Some("username")
        } else {
            None
        }
    }
}

/// A tweet with its author's username denormalized onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: TweetId,
    pub author_id: UserId,
    pub author_username: String,
    pub text: String,
}

impl Tweet {
    pub fn new(
        id: impl Into<TweetId>,
        author_id: impl Into<UserId>,
        author_username: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            author_username: author_username.into(),
            text: text.into(),
        }
    }

    /// Returns the first required field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.id.is_empty() {
            Some("id")
        } else if self.author_id.is_empty() {
            Some("authorId")
        } else if self.author_username.is_empty() {
            Some("authorUsername")
        } else if self.text.is_empty() {
            Some("text")
        } else {
            None
        }
    }
}

/// A directional follow edge: `follower` follows `followee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub follower_id: UserId,
    pub follower_username: String,
    pub followee_id: UserId,
    pub followee_username: String,
}

impl Follow {
    pub fn new(
        follower_id: impl Into<UserId>,
        follower_username: impl Into<String>,
        followee_id: impl Into<UserId>,
        followee_username: impl Into<String>,
    ) -> Self {
        Self {
            follower_id: follower_id.into(),
            follower_username: follower_username.into(),
            followee_id: followee_id.into(),
            followee_username: followee_username.into(),
        }
    }

    /// Returns the first required field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.follower_id.is_empty() {
            Some("followerId")
        } else if self.follower_username.is_empty() {
            Some("followerUsername")
        } else if self.followee_id.is_empty() {
            Some("followeeId")
        } else if self.followee_username.is_empty() {
            Some("followeeUsername")
        } else {
            None
        }
    }

    /// True when the edge points from a user to itself.
    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.followee_id
    }
}
