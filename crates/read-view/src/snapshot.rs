//! Bulk export of the authoritative store, read once at startup.

use std::path::PathBuf;

use async_trait::async_trait;
use common::{Follow, Tweet, User};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading a bulk export.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The authoritative store could not be reached.
    #[error("Snapshot source unavailable: {0}")]
    Unavailable(String),

    /// The export file could not be read.
    #[error("Failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export does not have the expected shape.
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The complete current state of the authoritative store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub follows: Vec<Follow>,
    #[serde(default)]
    pub tweets: Vec<Tweet>,
}

/// Read-only bulk-export interface of the authoritative store.
///
/// Each call returns the whole collection in the store's own order.
/// Pagination, if any, is the implementor's concern.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<User>, SnapshotError>;

    async fn fetch_follows(&self) -> Result<Vec<Follow>, SnapshotError>;

    async fn fetch_tweets(&self) -> Result<Vec<Tweet>, SnapshotError>;
}

/// A snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotSource {
    snapshot: Snapshot,
}

impl InMemorySnapshotSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.snapshot.users.push(user);
        self
    }

    pub fn with_follow(mut self, follow: Follow) -> Self {
        self.snapshot.follows.push(follow);
        self
    }

    pub fn with_tweet(mut self, tweet: Tweet) -> Self {
        self.snapshot.tweets.push(tweet);
        self
    }
}

#[async_trait]
impl SnapshotSource for InMemorySnapshotSource {
    async fn fetch_users(&self) -> Result<Vec<User>, SnapshotError> {
        Ok(self.snapshot.users.clone())
    }

    async fn fetch_follows(&self) -> Result<Vec<Follow>, SnapshotError> {
        Ok(self.snapshot.follows.clone())
    }

    async fn fetch_tweets(&self) -> Result<Vec<Tweet>, SnapshotError> {
        Ok(self.snapshot.tweets.clone())
    }
}

/// A snapshot exported to a JSON file shaped like [`Snapshot`].
///
/// The file is re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotSource {
    path: PathBuf,
}

impl JsonFileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Snapshot, SnapshotError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SnapshotError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSnapshotSource {
    async fn fetch_users(&self) -> Result<Vec<User>, SnapshotError> {
        Ok(self.read().await?.users)
    }

    async fn fetch_follows(&self) -> Result<Vec<Follow>, SnapshotError> {
        Ok(self.read().await?.follows)
    }

    async fn fetch_tweets(&self) -> Result<Vec<Tweet>, SnapshotError> {
        Ok(self.read().await?.tweets)
    }
}
