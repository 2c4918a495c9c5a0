//! Publishing sealed blobs to the remote gist store.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::json;

use crate::error::PublishError;
use crate::sealer::SealedBlob;

/// Default API base for the gist store.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Shared HTTP client for all publish requests (connection pooling).
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build shared publish HTTP client")
});

/// Publishes sealed blobs to gists under a bearer credential.
pub struct GistPublisher {
    api_base: String,
    token: String,
    client: Client,
}

impl GistPublisher {
    /// Create a publisher (reuses the shared connection pool).
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            client: SHARED_CLIENT.clone(),
        }
    }

    fn build_headers(&self) -> Result<HeaderMap, PublishError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))?,
        );
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Replace the destination gist's `data.json` with the sealed content.
    ///
    /// Any non-success response fails the run; retries are left to the
    /// scheduler that re-invokes the whole pipeline.
    pub async fn publish(&self, blob: &SealedBlob) -> Result<(), PublishError> {
        let url = format!("{}/gists/{}", self.api_base, blob.destination);
        let body = json!({
            "description": blob.description,
            "files": { "data.json": { "content": blob.content } },
        });

        let resp = self
            .client
            .patch(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PublishError::Http {
                status,
                url: resp.url().to_string(),
            });
        }
        Ok(())
    }
}
