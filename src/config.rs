//! Configuration for the feed pipeline.
//!
//! Layered sources: built-in defaults, then an optional config file, then
//! `MATCHFEED_*` environment overrides (highest priority). Secrets are
//! environment-only and never pass through the layered sources.

use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::publisher::DEFAULT_API_BASE;

/// Environment variable holding the gist bearer credential.
pub const GIST_TOKEN_VAR: &str = "MATCHFEED_GIST_TOKEN";

/// Environment variable holding the 32-byte seal key.
pub const SEAL_KEY_VAR: &str = "MATCHFEED_SEAL_KEY";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pacing: PacingConfig,
    pub publish: PublishConfig,
    pub logging: LoggingConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Minimum pause between successive room lookups, in milliseconds.
    pub lookup_interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            lookup_interval_ms: 150,
        }
    }
}

impl PacingConfig {
    #[must_use]
    pub fn lookup_interval(&self) -> Duration {
        Duration::from_millis(self.lookup_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Gist store API base URL.
    pub api_base: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or "pretty".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// The two built-in upstream feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub viet: SourceConfig,
    pub china: SourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            viet: SourceConfig {
                base_url: "https://json.vnres.co".to_string(),
                category: "1".to_string(),
                gist_id: String::new(),
                description: "rock it...".to_string(),
            },
            china: SourceConfig {
                base_url: "https://json.xuean.xyz".to_string(),
                category: "1".to_string(),
                gist_id: String::new(),
                description: "lalaland...".to_string(),
            },
        }
    }
}

/// Per-source settings for one upstream feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    /// Category id whose matches are selected from the listing.
    pub category: String,
    /// Destination gist for the sealed feed.
    pub gist_id: String,
    /// Label stored alongside the published blob.
    pub description: String,
}

/// Data-source selector: which upstream feed a run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeedSource {
    Viet,
    China,
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Viet => "viet",
            Self::China => "china",
        };
        f.write_str(name)
    }
}

impl Config {
    /// Load configuration from layered sources with priority:
    /// 1. Environment variables (highest)
    /// 2. Config file (if provided and present)
    /// 3. Defaults (lowest)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (MATCHFEED_SOURCES__VIET__GIST_ID, etc.)
        builder = builder.add_source(
            Environment::with_prefix("MATCHFEED")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from a file path.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Per-source settings for a selector.
    #[must_use]
    pub fn source(&self, source: FeedSource) -> &SourceConfig {
        match source {
            FeedSource::Viet => &self.sources.viet,
            FeedSource::China => &self.sources.china,
        }
    }

    /// Fail fast on misconfigurations before any network work.
    pub fn validate(&self, source: FeedSource) -> Result<(), ConfigError> {
        let src = self.source(source);
        if src.base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl {
                src: source.to_string(),
            });
        }
        if src.category.is_empty() {
            return Err(ConfigError::MissingCategory {
                src: source.to_string(),
            });
        }
        if src.gist_id.is_empty() {
            return Err(ConfigError::MissingDestination {
                src: source.to_string(),
            });
        }
        Ok(())
    }
}

/// Secrets required before a run may start. Absence of either is a
/// startup precondition failure, not a per-run error.
#[derive(Clone)]
pub struct Secrets {
    pub gist_token: String,
    pub seal_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("gist_token", &"[REDACTED]")
            .field("seal_key", &"[REDACTED]")
            .finish()
    }
}

impl Secrets {
    /// Load both secrets from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gist_token: require_var(GIST_TOKEN_VAR)?,
            seal_key: require_var(SEAL_KEY_VAR)?,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingSecret { name })
}
