//! Runtime settings loaded via OrthoConfig.
//!
//! Every key is optional; accessors apply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::anilist::ANILIST_ENDPOINT;

const STORE_DIR_NAME: &str = "anicomplete";

fn default_user_agent() -> String {
    format!("anicomplete/{}", env!("CARGO_PKG_VERSION"))
}

fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|data| data.join(STORE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(STORE_DIR_NAME))
}

/// Output format for diagnostic logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Settings for the catalog client, identity store, and logging.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ANICOMPLETE")]
pub struct TrackerSettings {
    /// GraphQL endpoint override.
    pub endpoint: Option<String>,
    /// Directory holding the stored identity.
    pub store_dir: Option<PathBuf>,
    /// Client timeout for catalog requests, in seconds. Unset means none.
    pub request_timeout_secs: Option<u64>,
    /// `User-Agent` header override.
    pub user_agent: Option<String>,
    /// `text` or `json`.
    pub log_format: Option<String>,
}

impl TrackerSettings {
    /// Return the configured endpoint, falling back to the public AniList API.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the override is not a valid URL.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.endpoint.as_deref().unwrap_or(ANILIST_ENDPOINT))
    }

    /// Return the configured store directory, falling back to the user data dir.
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(default_store_dir)
    }

    /// Return the request timeout; zero is treated as unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Return the configured user agent, falling back to `anicomplete/<version>`.
    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }

    /// Return the log format; anything other than `json` means text.
    pub fn log_format(&self) -> LogFormat {
        match self.log_format.as_deref().map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}
