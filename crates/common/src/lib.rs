//! Shared types for the social-feed read view: identifiers and the three
//! entity records carried by events and by the bulk export.

pub mod models;
pub mod types;

pub use models::{Follow, Tweet, User};
pub use types::{TweetId, UserId};
