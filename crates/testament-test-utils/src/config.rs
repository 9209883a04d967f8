//! Configuration builders for tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use testament_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .sentinel("#")
///     .max_length(40)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn sentinel(mut self, sentinel: &str) -> Self {
        self.config.bot.sentinel = sentinel.to_string();
        self
    }

    pub fn command_prefix(mut self, prefix: &str) -> Self {
        self.config.bot.command_prefix = prefix.to_string();
        self
    }

    pub fn failure_message(mut self, message: &str) -> Self {
        self.config.bot.failure_message = message.to_string();
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.output.max_length = max_length;
        self
    }

    pub fn envelope(mut self, envelope: &str) -> Self {
        self.config.output.envelope = envelope.to_string();
        self
    }

    pub fn global_verse_bound(mut self) -> Self {
        self.config.validation.verse_bound = "global".to_string();
        self
    }

    pub fn corpus_path(mut self, path: &Path) -> Self {
        self.config.store.corpus_path = path.display().to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A TOML config file in a temporary directory, removed on drop.
pub struct TempConfigFile {
    pub path: PathBuf,
    _dir: TempDir,
}

impl TempConfigFile {
    /// Write `toml_content` to `testament.toml` in a fresh temp directory.
    pub async fn with_toml(toml_content: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("testament.toml");
        tokio::fs::write(&path, toml_content)
            .await
            .expect("failed to write test config");
        Self { path, _dir: dir }
    }
}
