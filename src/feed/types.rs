//! Data transfer types for the upstream match and detail feeds.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scheduled match from the listing feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub sub_cate_name: String,
    pub host_name: String,
    pub host_icon: String,
    pub guest_name: String,
    pub guest_icon: String,
    /// Scheduled kick-off, epoch seconds.
    pub match_time: i64,
    #[serde(default)]
    pub anchors: Vec<AnchorEntry>,
}

impl MatchRecord {
    /// Ordered room numbers for this match, one per anchor feed.
    #[must_use]
    pub fn room_numbers(&self) -> Vec<String> {
        self.anchors
            .iter()
            .map(|entry| entry.anchor.room_num.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnchorEntry {
    pub anchor: AnchorInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorInfo {
    pub room_num: String,
}

/// Inner payload of the `matches(...)` listing: category id to matches.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingPayload {
    pub data: HashMap<String, Vec<MatchRecord>>,
}

/// Inner payload of the `detail(...)` feed for one room. The `stream`
/// object is required; a detail response without it is a parse failure.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailPayload {
    pub data: DetailData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailData {
    pub stream: StreamVariants,
}

/// Stream URL variants for one room. Either quality may be absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StreamVariants {
    pub m3u8: Option<String>,
    pub hd_m3u8: Option<String>,
}

/// A match augmented with its resolved room keys and stream links.
///
/// Serialized with the listing feed's camelCase field names so downstream
/// consumers see one consistent shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMatch {
    pub sub_cate_name: String,
    pub host_name: String,
    pub host_icon: String,
    pub guest_name: String,
    pub guest_icon: String,
    pub match_time: i64,
    pub room_numbers: Vec<String>,
    pub stream_links: Vec<String>,
}
