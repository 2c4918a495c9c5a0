//! Decoder for the wrapped match listing payload.

use crate::envelope::strip_envelope;
use crate::error::DecodeError;

use super::types::{ListingPayload, MatchRecord};

/// Callback name wrapping the match listing payload.
pub const MATCHES_CALLBACK: &str = "matches";

/// Decode a wrapped listing payload and select one category's matches.
///
/// Any failure here aborts the run; there is no partial list.
pub fn decode_matches(raw: &str, category: &str) -> Result<Vec<MatchRecord>, DecodeError> {
    let inner = strip_envelope(raw, MATCHES_CALLBACK)?;
    let mut listing: ListingPayload = serde_json::from_str(inner)?;
    listing
        .data
        .remove(category)
        .ok_or_else(|| DecodeError::MissingCategory {
            category: category.to_string(),
        })
}
