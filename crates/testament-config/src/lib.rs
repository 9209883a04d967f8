#![deny(unsafe_code)]

//! Configuration loading and validation for Testament.
//!
//! Loads TOML configuration files and validates them. Provides the
//! [`AppConfig`] type as the central configuration structure. Every field has
//! a default, so an empty file (or no file at all) is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat command handling.
    #[serde(default)]
    pub bot: BotConfig,

    /// Passage output formatting.
    #[serde(default)]
    pub output: OutputConfig,

    /// Verse corpus location.
    #[serde(default)]
    pub store: StoreConfig,

    /// Reference validation rules.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat command handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Single character that starts a verse reference.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    /// Single character that starts a utility command (`!ping`).
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Word after the sentinel that requests a random verse.
    #[serde(default = "default_random_keyword")]
    pub random_keyword: String,

    /// Reply sent when a reference cannot be resolved.
    #[serde(default = "default_failure_message")]
    pub failure_message: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            command_prefix: default_command_prefix(),
            random_keyword: default_random_keyword(),
            failure_message: default_failure_message(),
        }
    }
}

impl BotConfig {
    /// The sentinel as a character. Falls back to `$` on an unvalidated
    /// empty value.
    pub fn sentinel_char(&self) -> char {
        self.sentinel.chars().next().unwrap_or('$')
    }

    /// The command prefix as a character. Falls back to `!` on an
    /// unvalidated empty value.
    pub fn command_prefix_char(&self) -> char {
        self.command_prefix.chars().next().unwrap_or('!')
    }
}

fn default_sentinel() -> String {
    "$".to_string()
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_random_keyword() -> String {
    "random".to_string()
}

fn default_failure_message() -> String {
    "Could not resolve that reference.".to_string()
}

/// Passage output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Characters of passage text kept before truncation.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Delimiter placed on its own line before and after the passage.
    #[serde(default = "default_envelope")]
    pub envelope: String,

    /// Marker appended to a truncated passage.
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            envelope: default_envelope(),
            ellipsis: default_ellipsis(),
        }
    }
}

fn default_max_length() -> usize {
    1900
}

fn default_envelope() -> String {
    "```".to_string()
}

fn default_ellipsis() -> String {
    "...".to_string()
}

/// Verse corpus location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON corpus file.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
        }
    }
}

fn default_corpus_path() -> String {
    "files/corpus.json".to_string()
}

/// Reference validation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Verse upper bound: "per-chapter" (each chapter's own verse count) or
    /// "global" (286 for every chapter).
    #[serde(default = "default_verse_bound")]
    pub verse_bound: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            verse_bound: default_verse_bound(),
        }
    }
}

fn default_verse_bound() -> String {
    "per-chapter".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn single_symbol(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if !c.is_alphanumeric() && !c.is_whitespace()
    )
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !single_symbol(&self.bot.sentinel) {
            return Err(ConfigError::Validation(format!(
                "bot.sentinel must be a single non-alphanumeric character, got {:?}",
                self.bot.sentinel
            )));
        }
        if !single_symbol(&self.bot.command_prefix) {
            return Err(ConfigError::Validation(format!(
                "bot.command_prefix must be a single non-alphanumeric character, got {:?}",
                self.bot.command_prefix
            )));
        }
        if self.bot.sentinel == self.bot.command_prefix {
            return Err(ConfigError::Validation(
                "bot.sentinel and bot.command_prefix must differ".to_string(),
            ));
        }
        // Digits and separators would be read as part of a reference.
        if matches!(self.bot.sentinel.as_str(), ":" | "-") {
            return Err(ConfigError::Validation(format!(
                "bot.sentinel must not be a reference separator, got {:?}",
                self.bot.sentinel
            )));
        }
        if self.bot.random_keyword.is_empty()
            || !self.bot.random_keyword.chars().all(char::is_alphanumeric)
            || self.bot.random_keyword.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::Validation(format!(
                "bot.random_keyword must be a non-numeric alphanumeric word, got {:?}",
                self.bot.random_keyword
            )));
        }
        if self.bot.failure_message.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bot.failure_message must not be empty".to_string(),
            ));
        }

        if self.output.max_length == 0 {
            return Err(ConfigError::Validation(
                "output.max_length must be at least 1".to_string(),
            ));
        }

        if self.store.corpus_path.is_empty() {
            return Err(ConfigError::Validation(
                "store.corpus_path must not be empty".to_string(),
            ));
        }

        let valid_bounds = ["per-chapter", "global"];
        if !valid_bounds.contains(&self.validation.verse_bound.as_str()) {
            return Err(ConfigError::Validation(format!(
                "validation.verse_bound must be one of {:?}, got {:?}",
                valid_bounds, self.validation.verse_bound
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
