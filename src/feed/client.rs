//! Upstream feed HTTP client.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

use crate::error::{check_response, FetchError};

/// Shared HTTP client for all feed requests (connection pooling).
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("failed to build shared feed HTTP client")
});

/// HTTP client for one upstream feed host.
///
/// Returns raw wrapped response bodies; envelope stripping and JSON
/// parsing belong to the decoder and resolver.
pub struct FeedClient {
    base_url: String,
    client: Client,
}

impl FeedClient {
    /// Create a client for one feed host (reuses the shared connection pool).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: SHARED_CLIENT.clone(),
        }
    }

    /// Current feed host.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw wrapped match listing.
    pub async fn fetch_matches(&self) -> Result<String, FetchError> {
        let url = format!("{}/matches.json", self.base_url);
        let resp = check_response(self.client.get(&url).send().await?)?;
        Ok(resp.text().await?)
    }

    /// Fetch the raw wrapped detail payload for one room.
    pub async fn fetch_room_detail(&self, room: &str) -> Result<String, FetchError> {
        let url = format!("{}/room/{}/detail.json", self.base_url, room);
        let resp = check_response(self.client.get(&url).send().await?)?;
        Ok(resp.text().await?)
    }
}
