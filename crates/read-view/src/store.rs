//! The materialized store: every index of the read view behind one lock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::{Follow, Tweet, User, UserId};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{ReadViewError, Result};

/// Number of records held by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub users: usize,
    pub tweets: usize,
    pub follows: usize,
}

#[derive(Default)]
struct StoreState {
    users_by_id: HashMap<UserId, User>,
    /// username -> id; kept in lockstep with `users_by_id`.
    users_by_username: HashMap<String, UserId>,
    /// Append-only, in arrival order.
    tweets_by_author: HashMap<UserId, Vec<Tweet>>,
    /// Edges keyed by followee.
    followers_of: HashMap<UserId, Vec<Follow>>,
    /// The same edges keyed by follower.
    followees_of: HashMap<UserId, Vec<Follow>>,
    /// Distinct (follower, followee) pairs seen so far.
    edge_keys: HashSet<(UserId, UserId)>,
    tweet_count: usize,
    follow_count: usize,
}

impl StoreState {
    fn tweets_of(&self, user_id: &UserId) -> &[Tweet] {
        self.tweets_by_author
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// In-memory projection of users, tweets and follow edges.
///
/// Cloning yields another handle to the same indexes. Each mutation takes the
/// write lock once, so a reader sees either all of it or none of it; readers
/// share the read lock and never block each other.
///
/// Tweets are kept per author in arrival order, which is not necessarily
/// creation order when events arrive out of order.
#[derive(Clone, Default)]
pub struct MaterializedStore {
    state: Arc<RwLock<StoreState>>,
}

impl MaterializedStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    ///
    /// Fails with `Invalid` when the id or username is empty and with
    /// `AlreadyExists` when either is already taken. A rejected user leaves
    /// the store unchanged.
    pub async fn add_user(&self, user: User) -> Result<()> {
        if let Some(field) = user.missing_field() {
            return Err(ReadViewError::Invalid {
                entity: "User",
                field,
            });
        }

        let mut state = self.state.write().await;
        if state.users_by_id.contains_key(&user.id) {
            return Err(ReadViewError::AlreadyExists {
                entity: "User",
                field: "id",
                value: user.id.to_string(),
            });
        }
        if state.users_by_username.contains_key(&user.username) {
            return Err(ReadViewError::AlreadyExists {
                entity: "User",
                field: "username",
                value: user.username,
            });
        }

        state
            .users_by_username
            .insert(user.username.clone(), user.id.clone());
        state.users_by_id.insert(user.id.clone(), user);
        Ok(())
    }

    /// Appends a tweet to its author's sequence.
    ///
    /// The author does not have to be known yet; the denormalized username on
    /// the tweet is trusted as supplied.
    pub async fn add_tweet(&self, tweet: Tweet) -> Result<()> {
        if let Some(field) = tweet.missing_field() {
            return Err(ReadViewError::Invalid {
                entity: "Tweet",
                field,
            });
        }

        let mut state = self.state.write().await;
        state
            .tweets_by_author
            .entry(tweet.author_id.clone())
            .or_default()
            .push(tweet);
        state.tweet_count += 1;
        Ok(())
    }

    /// Records a follow edge under both its follower and its followee.
    ///
    /// Duplicate and self-referencing edges are mirrored as received.
    pub async fn add_follow(&self, follow: Follow) -> Result<()> {
        if let Some(field) = follow.missing_field() {
            return Err(ReadViewError::Invalid {
                entity: "Follow",
                field,
            });
        }

        let mut state = self.state.write().await;
        let fresh = state
            .edge_keys
            .insert((follow.follower_id.clone(), follow.followee_id.clone()));
        if !fresh {
            tracing::warn!(
                follower_id = %follow.follower_id,
                followee_id = %follow.followee_id,
                "duplicate follow edge received"
            );
        }
        if follow.is_self_follow() {
            tracing::warn!(user_id = %follow.follower_id, "self-follow edge received");
        }

        state
            .followers_of
            .entry(follow.followee_id.clone())
            .or_default()
            .push(follow.clone());
        state
            .followees_of
            .entry(follow.follower_id.clone())
            .or_default()
            .push(follow);
        state.follow_count += 1;
        Ok(())
    }

    /// Looks up a user by id.
    pub async fn get_user_by_id(&self, id: &UserId) -> Result<User> {
        self.state
            .read()
            .await
            .users_by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ReadViewError::NotFound {
                entity: "User",
                key: id.to_string(),
            })
    }

    /// Looks up a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        let state = self.state.read().await;
        state
            .users_by_username
            .get(username)
            .and_then(|id| state.users_by_id.get(id))
            .cloned()
            .ok_or_else(|| ReadViewError::NotFound {
                entity: "User",
                key: username.to_string(),
            })
    }

    /// Returns the user's tweets in arrival order; empty when there are none.
    pub async fn get_tweets(&self, user_id: &UserId) -> Vec<Tweet> {
        self.state.read().await.tweets_of(user_id).to_vec()
    }

    /// Returns the tweets of everyone the user follows.
    ///
    /// Grouped by followee in the order the follow edges arrived, then by
    /// tweet arrival within each followee. This is not a chronological feed.
    pub async fn get_timeline(&self, user_id: &UserId) -> Vec<Tweet> {
        let state = self.state.read().await;
        let Some(edges) = state.followees_of.get(user_id) else {
            return Vec::new();
        };
        edges
            .iter()
            .flat_map(|edge| state.tweets_of(&edge.followee_id))
            .cloned()
            .collect()
    }

    /// Returns the edges whose followee is `user_id`.
    pub async fn get_followers(&self, user_id: &UserId) -> Vec<Follow> {
        self.state
            .read()
            .await
            .followers_of
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the edges whose follower is `user_id`.
    pub async fn get_followees(&self, user_id: &UserId) -> Vec<Follow> {
        self.state
            .read()
            .await
            .followees_of
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns how many users, tweets and follow edges are held.
    pub async fn counts(&self) -> StoreCounts {
        let state = self.state.read().await;
        StoreCounts {
            users: state.users_by_id.len(),
            tweets: state.tweet_count,
            follows: state.follow_count,
        }
    }

    /// Drops every index.
    pub async fn reset(&self) {
        *self.state.write().await = StoreState::default();
    }

    /// Edge counts on both sides of `follower -> followee`, read under one guard.
    #[cfg(test)]
    async fn edge_sides(&self, follower: &UserId, followee: &UserId) -> (usize, usize) {
        let state = self.state.read().await;
        let outgoing = state
            .followees_of
            .get(follower)
            .map_or(0, |edges| edges.iter().filter(|e| &e.followee_id == followee).count());
        let incoming = state
            .followers_of
            .get(followee)
            .map_or(0, |edges| edges.iter().filter(|e| &e.follower_id == follower).count());
        (outgoing, incoming)
    }
}
