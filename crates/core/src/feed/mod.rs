pub mod client;
pub mod error;

pub use client::{FeedClient, HttpFeedClient};
pub use error::FetchError;
