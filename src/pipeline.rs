//! Whole-run orchestration: fetch, decode, enrich, seal, publish.

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::{Config, FeedSource, Secrets};
use crate::error::{EnrichError, PipelineError};
use crate::feed::client::FeedClient;
use crate::feed::decoder::decode_matches;
use crate::feed::types::{EnrichedMatch, MatchRecord};
use crate::publisher::GistPublisher;
use crate::resolver::{LookupOutcome, StreamResolver};
use crate::sealer::{SealedBlob, Sealer};

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub matches: usize,
    pub stream_links: usize,
    pub elapsed: Duration,
}

/// Enrich every match with its resolved stream links, in input order.
///
/// Emits exactly one enriched match per input match, even when every
/// lookup for it fails. One resolver (and so one pacing gate) serves the
/// whole batch, keeping lookups paced across match boundaries too.
pub async fn enrich(
    client: &FeedClient,
    lookup_interval: Duration,
    matches: Vec<MatchRecord>,
) -> Result<Vec<EnrichedMatch>, EnrichError> {
    let mut resolver = StreamResolver::new(client, lookup_interval);
    let mut enriched = Vec::with_capacity(matches.len());

    for record in matches {
        let room_numbers = record.room_numbers();
        let outcomes = resolver.resolve(&room_numbers).await;
        if outcomes.len() != room_numbers.len() {
            return Err(EnrichError::SlotMismatch {
                expected: room_numbers.len(),
                got: outcomes.len(),
            });
        }
        let stream_links: Vec<String> = outcomes
            .into_iter()
            .flat_map(LookupOutcome::into_urls)
            .collect();

        enriched.push(EnrichedMatch {
            sub_cate_name: record.sub_cate_name,
            host_name: record.host_name,
            host_icon: record.host_icon,
            guest_name: record.guest_name,
            guest_icon: record.guest_icon,
            match_time: record.match_time,
            room_numbers,
            stream_links,
        });
    }

    Ok(enriched)
}

/// Run the full pipeline once for one configured source.
///
/// Publish happens exactly once per run, with the fully enriched list, or
/// not at all: any failure outside per-key lookups aborts before the
/// publish step.
pub async fn run(
    config: &Config,
    secrets: &Secrets,
    source: FeedSource,
) -> Result<RunReport, PipelineError> {
    let src = config.source(source);
    let start = Instant::now();
    info!(source = %source, base_url = %src.base_url, "starting feed run");

    let client = FeedClient::new(&src.base_url);
    let raw = client.fetch_matches().await?;
    info!(bytes = raw.len(), "fetched match listing");

    let records = decode_matches(&raw, &src.category)?;
    info!(matches = records.len(), category = %src.category, "decoded match listing");

    let enriched = enrich(&client, config.pacing.lookup_interval(), records).await?;
    let stream_links: usize = enriched.iter().map(|m| m.stream_links.len()).sum();
    info!(matches = enriched.len(), stream_links, "enriched matches with stream links");

    let sealer = Sealer::new(secrets.seal_key.as_bytes())?;
    let blob = SealedBlob {
        content: sealer.seal(&enriched)?,
        destination: src.gist_id.clone(),
        description: src.description.clone(),
    };

    let publisher = GistPublisher::new(&config.publish.api_base, &secrets.gist_token);
    publisher.publish(&blob).await?;
    info!(destination = %blob.destination, "published sealed feed");

    Ok(RunReport {
        matches: enriched.len(),
        stream_links,
        elapsed: start.elapsed(),
    })
}
