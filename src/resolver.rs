//! Per-key stream URL resolution with fixed inter-lookup pacing.
//!
//! Lookups run strictly sequentially against the feed-detail endpoint.
//! The pacing gate bounds the outbound request rate regardless of how
//! individual lookups turn out.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::envelope::strip_envelope;
use crate::error::{FetchError, LookupError};
use crate::feed::client::FeedClient;
use crate::feed::types::DetailPayload;

/// Callback name wrapping the room detail payload.
pub const DETAIL_CALLBACK: &str = "detail";

/// Interval gate enforcing a minimum pause between successive steps.
///
/// `arm` records a deadline one interval from now; `wait` sleeps until any
/// armed deadline has passed. Keeping the gate separate from the lookup
/// loop leaves room for cancellation or a shared limiter to be layered on
/// without restructuring the resolver.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    gate: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            gate: None,
        }
    }

    /// Wait until the previously armed deadline has elapsed. Immediate
    /// when no deadline is armed.
    pub async fn wait(&mut self) {
        if let Some(deadline) = self.gate.take() {
            sleep_until(deadline).await;
        }
    }

    /// Arm the gate: the next `wait` returns no earlier than one interval
    /// from now.
    pub fn arm(&mut self) {
        self.gate = Some(Instant::now() + self.interval);
    }
}

/// Outcome of resolving one lookup key.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Detail payload parsed; zero, one or two URLs collected.
    Resolved(Vec<String>),
    /// Upstream answered with a non-success status; nothing to collect.
    Empty,
    /// Transport or parse failure; recovered as a zero-URL slot.
    Failed(LookupError),
}

impl LookupOutcome {
    /// URLs contributed by this slot (none for `Empty` and `Failed`).
    #[must_use]
    pub fn into_urls(self) -> Vec<String> {
        match self {
            Self::Resolved(urls) => urls,
            Self::Empty | Self::Failed(_) => Vec::new(),
        }
    }

    fn url_count(&self) -> usize {
        match self {
            Self::Resolved(urls) => urls.len(),
            Self::Empty | Self::Failed(_) => 0,
        }
    }
}

/// Sequential, paced resolver for one run.
///
/// The pacer persists across `resolve` calls, so lookups stay paced even
/// across consecutive matches hitting the same endpoint.
pub struct StreamResolver<'a> {
    client: &'a FeedClient,
    pacer: Pacer,
}

impl<'a> StreamResolver<'a> {
    pub fn new(client: &'a FeedClient, interval: Duration) -> Self {
        Self {
            client,
            pacer: Pacer::new(interval),
        }
    }

    /// Resolve stream URLs for each room key: one result slot per key, in
    /// input order. Individual failures never abort the batch, and the
    /// pacing gate is armed after every key regardless of outcome.
    pub async fn resolve(&mut self, rooms: &[String]) -> Vec<LookupOutcome> {
        let mut outcomes = Vec::with_capacity(rooms.len());
        for room in rooms {
            self.pacer.wait().await;
            let outcome = match self.lookup(room).await {
                Ok(urls) => LookupOutcome::Resolved(urls),
                Err(LookupError::Fetch(FetchError::Http { status, url })) => {
                    debug!(room = %room, status = %status, url = %url,
                        "room detail returned non-success status");
                    LookupOutcome::Empty
                }
                Err(err) => {
                    warn!(room = %room, error = %err, "stream lookup failed");
                    LookupOutcome::Failed(err)
                }
            };
            self.pacer.arm();
            debug!(room = %room, links = outcome.url_count(), "fetched stream links for room");
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn lookup(&self, room: &str) -> Result<Vec<String>, LookupError> {
        let raw = self.client.fetch_room_detail(room).await?;
        let inner = strip_envelope(&raw, DETAIL_CALLBACK)?;
        let detail: DetailPayload = serde_json::from_str(inner)?;

        let stream = detail.data.stream;
        let mut urls = Vec::new();
        if let Some(url) = stream.m3u8 {
            urls.push(url);
        }
        if let Some(url) = stream.hd_m3u8 {
            urls.push(url);
        }
        Ok(urls)
    }
}
