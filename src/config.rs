//! Configuration file parser for ~/.config/pagekit/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning so typos
//! don't go unnoticed.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Live search endpoint. Absolute URL; the query is appended as `q`.
    pub search_endpoint: String,

    /// Quiet period after the last keystroke before a search is sent.
    pub search_debounce_ms: u64,

    /// Queries shorter than this (in characters, after trimming) clear the results.
    pub search_min_chars: usize,

    /// Per-request timeout for the live search endpoint.
    pub search_timeout_secs: u64,

    /// Drop a search response when a newer search has been issued since.
    /// Off by default: the last response to arrive is rendered.
    pub discard_stale_search_results: bool,

    /// Navigate to the next page when the pagination block scrolls into view.
    pub infinite_scroll: bool,

    /// User-facing strings.
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_endpoint: "http://localhost:8000/api/live-search/".to_string(),
            search_debounce_ms: 300,
            search_min_chars: 2,
            search_timeout_secs: 10,
            discard_stale_search_results: false,
            infinite_scroll: false,
            messages: Messages::default(),
        }
    }
}

/// Labels, empty states and confirmation dialogs shown to readers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Theme toggle label while the light theme is active.
    pub switch_to_dark: String,
    /// Theme toggle label while the dark theme is active.
    pub switch_to_light: String,
    pub no_results: String,
    pub link_copied: String,
    pub article_saved: String,
    pub article_removed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            switch_to_dark: "Switch to dark theme".to_string(),
            switch_to_light: "Switch to light theme".to_string(),
            no_results: "Nothing found".to_string(),
            link_copied: "Link copied to clipboard!".to_string(),
            article_saved: "Article saved!".to_string(),
            article_removed: "Article removed from saved".to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: &'static [&'static str] = &[
        "search_endpoint",
        "search_debounce_ms",
        "search_min_chars",
        "search_timeout_secs",
        "discard_stale_search_results",
        "infinite_scroll",
        "messages",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        tracing::info!(
            endpoint = %config.search_endpoint,
            debounce_ms = config.search_debounce_ms,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = url::Url::parse(&self.search_endpoint).map_err(|e| ConfigError::Invalid {
            key: "search_endpoint",
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "search_endpoint",
                reason: format!("unsupported scheme '{}'", endpoint.scheme()),
            });
        }
        if self.search_min_chars == 0 {
            return Err(ConfigError::Invalid {
                key: "search_min_chars",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "search_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
