//! matchfeed: fetch live match listings, resolve per-room stream links,
//! seal the result and publish it to a remote gist store.
//!
//! One run is strictly sequential: listing fetch → decode → per-match,
//! per-room paced stream resolution → seal → publish. Per-room lookup
//! failures degrade that room to zero links; every other failure aborts
//! the run before anything is published.

pub mod config;
pub mod envelope;
pub mod error;
pub mod feed;
pub mod logging;
pub mod pipeline;
pub mod publisher;
pub mod resolver;
pub mod sealer;

// Re-export the types one run touches
pub use config::{Config, FeedSource, Secrets};
pub use error::PipelineError;
pub use feed::client::FeedClient;
pub use feed::types::{EnrichedMatch, MatchRecord};
pub use pipeline::{enrich, run, RunReport};
pub use publisher::GistPublisher;
pub use resolver::{LookupOutcome, Pacer, StreamResolver};
pub use sealer::{SealedBlob, Sealer};
