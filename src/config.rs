//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the tutoring service connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the tutoring service
    pub api_url: String,
    /// Bearer token handed to the auth gate
    pub api_token: Option<String>,
    /// Per-request timeout; a timeout takes the same fallback path as any failure
    pub timeout: Duration,
    /// Where exported transcripts are written
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            export_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep defaults
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("TUTOR_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_url),
            api_token: lookup("TUTOR_API_TOKEN").filter(|v| !v.trim().is_empty()),
            timeout: lookup("TUTOR_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map_or(defaults.timeout, Duration::from_secs),
            export_dir: lookup("TUTOR_EXPORT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.export_dir, PathBuf::from),
        }
    }
}
