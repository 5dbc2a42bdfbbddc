use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::recall::persistence::DEFAULT_INDEX_FILE;
use crate::recall::recommend::DEFAULT_MAX_RECOMMENDATIONS;
use crate::recall::session::DEFAULT_CLEANUP_THRESHOLD;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MemdirConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub files: FilesConfig,
    pub recall: RecallConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_dir: String,
    pub index_file: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilesConfig {
    pub max_response_chars: usize,
    pub large_file_threshold: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecallConfig {
    pub max_recommendations: usize,
    pub session_cleanup_threshold: u64,
    pub exclude_session_paths: bool,
    pub skip_missing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8765,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let memory_dir = default_memdir_dir()
            .join("memories")
            .to_string_lossy()
            .into_owned();
        Self {
            memory_dir,
            index_file: DEFAULT_INDEX_FILE.into(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_response_chars: 50_000,
            large_file_threshold: 10_000,
        }
    }
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            session_cleanup_threshold: DEFAULT_CLEANUP_THRESHOLD,
            exclude_session_paths: false,
            skip_missing: true,
        }
    }
}

/// Returns `~/.memdir/`
pub fn default_memdir_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memdir")
}

/// Returns the default config file path: `~/.memdir/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memdir_dir().join("config.toml")
}

impl MemdirConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemdirConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MEMORY_DIR, MEMORY_MAX_RESPONSE_CHARS,
    /// MEMORY_LARGE_FILE_THRESHOLD, MEMORY_COVIS_MAX_RECOMMENDATIONS, MEMDIR_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMORY_DIR") {
            self.storage.memory_dir = val;
        }
        if let Some(val) = env_number("MEMORY_MAX_RESPONSE_CHARS") {
            self.files.max_response_chars = val;
        }
        if let Some(val) = env_number("MEMORY_LARGE_FILE_THRESHOLD") {
            self.files.large_file_threshold = val;
        }
        if let Some(val) = env_number("MEMORY_COVIS_MAX_RECOMMENDATIONS") {
            self.recall.max_recommendations = val;
        }
        if let Ok(val) = std::env::var("MEMDIR_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the memory root, expanding `~` if needed.
    pub fn resolved_memory_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.memory_dir)
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring non-numeric environment override");
            None
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
