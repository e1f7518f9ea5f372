//! The query side of the social feed.
//!
//! This crate keeps a denormalized, in-memory projection of users, tweets and
//! follow edges:
//! - [`MaterializedStore`] owns every index and is the only thing that touches them
//! - [`Projector`] applies events from an [`event_channel::EventChannel`] to the store
//! - [`BootstrapLoader`] fills the store from a [`SnapshotSource`] before live events
//! - [`QueryFacade`] answers reads for the request-serving layer
//!
//! The projection is eventually consistent with the authoritative store. A
//! read issued right after a write may not see it yet.

pub mod bootstrap;
pub mod error;
pub mod projector;
pub mod query;
pub mod snapshot;
pub mod store;

pub use bootstrap::{BootstrapLoader, BootstrapReport};
pub use common::{Follow, Tweet, TweetId, User, UserId};
pub use error::{ReadViewError, Result};
pub use projector::{ApplyOutcome, Projector, ProjectorStats};
pub use query::{QueryError, QueryFacade};
pub use snapshot::{
    InMemorySnapshotSource, JsonFileSnapshotSource, Snapshot, SnapshotError, SnapshotSource,
};
pub use store::{MaterializedStore, StoreCounts};
