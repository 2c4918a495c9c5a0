//! Upstream feed access: HTTP client, payload types and listing decoder.

pub mod client;
pub mod decoder;
pub mod types;

pub use client::FeedClient;
pub use types::{EnrichedMatch, MatchRecord};
