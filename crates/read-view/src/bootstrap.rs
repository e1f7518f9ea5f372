//! Cold-start population of the read view.

use crate::Result;
use crate::snapshot::SnapshotSource;
use crate::store::MaterializedStore;

/// What a bootstrap run put into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub users_loaded: usize,
    pub follows_loaded: usize,
    pub tweets_loaded: usize,
    /// Records the store refused (invalid or duplicate).
    pub rejected: usize,
}

/// Loads the full authoritative snapshot into a [`MaterializedStore`].
///
/// Records go through the same `add_*` calls as live events, so bootstrap
/// and live updates enforce identical rules.
pub struct BootstrapLoader<S: SnapshotSource> {
    source: S,
}

impl<S: SnapshotSource> BootstrapLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Replaces the store's contents with the current snapshot.
    ///
    /// All three collections are fetched before the store is touched; a
    /// fetch failure returns `BootstrapFatal` and leaves the store as it was.
    #[tracing::instrument(skip_all)]
    pub async fn load(&self, store: &MaterializedStore) -> Result<BootstrapReport> {
        let users = self.source.fetch_users().await?;
        let follows = self.source.fetch_follows().await?;
        let tweets = self.source.fetch_tweets().await?;

        tracing::info!(
            users = users.len(),
            follows = follows.len(),
            tweets = tweets.len(),
            "snapshot fetched"
        );

        store.reset().await;
        let mut report = BootstrapReport::default();

        for user in users {
            if record(store.add_user(user).await, &mut report) {
                report.users_loaded += 1;
            }
        }
        for follow in follows {
            if record(store.add_follow(follow).await, &mut report) {
                report.follows_loaded += 1;
            }
        }
        for tweet in tweets {
            if record(store.add_tweet(tweet).await, &mut report) {
                report.tweets_loaded += 1;
            }
        }

        tracing::info!(
            users = report.users_loaded,
            follows = report.follows_loaded,
            tweets = report.tweets_loaded,
            rejected = report.rejected,
            "bootstrap complete"
        );
        Ok(report)
    }
}

fn record(result: Result<()>, report: &mut BootstrapReport) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "snapshot record rejected");
            report.rejected += 1;
            false
        }
    }
}
