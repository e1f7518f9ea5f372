//! Read-only entry point for the request-serving layer.

use common::{Follow, Tweet, User, UserId};
use thiserror::Error;

use crate::store::{MaterializedStore, StoreCounts};

/// The only failure a query can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{0} not found")]
    NotFound(String),
}

/// Translates request parameters into store lookups.
///
/// Callers are expected to have checked who may see what. The facade only
/// rejects empty identifiers, reporting them as `NotFound`.
#[derive(Clone)]
pub struct QueryFacade {
    store: MaterializedStore,
}

impl QueryFacade {
    pub fn new(store: MaterializedStore) -> Self {
        Self { store }
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<User, QueryError> {
        let id = require_user_id(id)?;
        self.store
            .get_user_by_id(&id)
            .await
            .map_err(|_| QueryError::NotFound(format!("user {id}")))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, QueryError> {
        if username.is_empty() {
            return Err(QueryError::NotFound("user with empty username".into()));
        }
        self.store
            .get_user_by_username(username)
            .await
            .map_err(|_| QueryError::NotFound(format!("user {username}")))
    }

    /// Tweets authored by the user, in arrival order.
    pub async fn get_tweets(&self, user_id: &str) -> Result<Vec<Tweet>, QueryError> {
        let user_id = require_user_id(user_id)?;
        Ok(self.store.get_tweets(&user_id).await)
    }

    /// Tweets of the user's followees, grouped by followee.
    pub async fn get_timeline(&self, user_id: &str) -> Result<Vec<Tweet>, QueryError> {
        let user_id = require_user_id(user_id)?;
        Ok(self.store.get_timeline(&user_id).await)
    }

    pub async fn get_followers(&self, user_id: &str) -> Result<Vec<Follow>, QueryError> {
        let user_id = require_user_id(user_id)?;
        Ok(self.store.get_followers(&user_id).await)
    }

    pub async fn get_followees(&self, user_id: &str) -> Result<Vec<Follow>, QueryError> {
        let user_id = require_user_id(user_id)?;
        Ok(self.store.get_followees(&user_id).await)
    }

    pub async fn counts(&self) -> StoreCounts {
        self.store.counts().await
    }
}

fn require_user_id(id: &str) -> Result<UserId, QueryError> {
    if id.is_empty() {
        Err(QueryError::NotFound("user with empty id".into()))
    } else {
        Ok(UserId::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn facade() -> QueryFacade {
        let store = MaterializedStore::new();
        store.add_user(User::new("A", "alice", "pw")).await.unwrap();
        store.add_user(User::new("B", "bob", "pw")).await.unwrap();
        store
            .add_follow(Follow::new("A", "alice", "B", "bob"))
            .await
            .unwrap();
        store
            .add_tweet(Tweet::new("t1", "B", "bob", "hi"))
            .await
            .unwrap();
        QueryFacade::new(store)
    }

    #[tokio::test]
    async fn finds_users_by_id_and_username() {
        let facade = facade().await;
        assert_eq!(facade.get_user_by_id("A").await.unwrap().username, "alice");
        assert_eq!(facade.get_user_by_username("bob").await.unwrap().id.as_str(), "B");
    }

    #[tokio::test]
    async fn in_process_lookup_keeps_password() {
        let facade = facade().await;
        assert_eq!(facade.get_user_by_username("alice").await.unwrap().password, "pw");
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let facade = facade().await;
        assert_eq!(
            facade.get_user_by_id("Z").await,
            Err(QueryError::NotFound("user Z".into()))
        );
    }

    #[tokio::test]
    async fn empty_ids_are_not_found() {
        let facade = facade().await;
        assert!(facade.get_user_by_id("").await.is_err());
        assert!(facade.get_user_by_username("").await.is_err());
        assert!(facade.get_tweets("").await.is_err());
        assert!(facade.get_timeline("").await.is_err());
        assert!(facade.get_followers("").await.is_err());
        assert!(facade.get_followees("").await.is_err());
    }

    #[tokio::test]
    async fn unknown_user_has_empty_sequences() {
        let facade = facade().await;
        assert!(facade.get_tweets("Z").await.unwrap().is_empty());
        assert!(facade.get_timeline("Z").await.unwrap().is_empty());
        assert!(facade.get_followers("Z").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn follow_graph_queries() {
        let facade = facade().await;
        assert_eq!(facade.get_followees("A").await.unwrap().len(), 1);
        assert_eq!(
            facade.get_followers("B").await.unwrap()[0].follower_username,
            "alice"
        );
        assert_eq!(facade.get_timeline("A").await.unwrap()[0].id.as_str(), "t1");
    }
}
