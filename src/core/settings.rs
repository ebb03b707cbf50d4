//! Analyzer settings and their persistence
//!
//! Saves and loads [`AnalyzerSettings`] to/from a JSON file so engine path,
//! strength and retry policy survive between runs.
//!
//! # File Location
//!
//! Settings are stored as `settings.json` in the platform configuration
//! directory, e.g. `~/.config/xfchess-analyzer/settings.json` on Linux.
//! When no such directory can be resolved the file lives in the working
//! directory instead.
//!
//! # Error Handling
//!
//! [`load_or_default`] never fails: a missing file, unreadable file or
//! invalid JSON is logged and defaults are used. The explicit
//! [`AnalyzerSettings::load_from`] and [`AnalyzerSettings::save_to`] return
//! [`ConfigError`] for callers that need to know.
//!
//! # Precedence
//!
//! File values are the baseline; command-line flags override them field by
//! field (see `main.rs`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stockfish_bridge::settings::MAX_SKILL_LEVEL;
use stockfish_bridge::{EngineSettings, SessionTimings};
use tracing::{info, warn};

use super::error::{ConfigError, ConfigResult};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Everything the host needs to run analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Engine executable, looked up on `PATH` when relative
    pub engine_path: PathBuf,
    /// Per-request search settings
    pub engine: EngineSettings,
    /// Bound on one handshake attempt
    pub init_timeout_secs: u64,
    /// Handshake attempts before giving up
    pub init_attempts: u32,
    /// First retry delay; doubles after each failed attempt
    pub retry_backoff_ms: u64,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Fixed seed for opening-book choices, random when unset
    pub book_seed: Option<u64>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from("stockfish"),
            engine: EngineSettings::default(),
            init_timeout_secs: 60,
            init_attempts: 3,
            retry_backoff_ms: 500,
            log_level: "info".to_string(),
            book_seed: None,
        }
    }
}

impl AnalyzerSettings {
    /// Default settings file location
    ///
    /// Returns `settings.json` in the user's configuration directory, or in
    /// the working directory if the platform offers none.
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "xfchess-analyzer") {
            proj_dirs.config_dir().join(SETTINGS_FILENAME)
        } else {
            PathBuf::from(SETTINGS_FILENAME)
        }
    }

    /// Read and validate settings from `path`
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings to `path` as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("[SETTINGS] Saved settings to {:?}", path);
        Ok(())
    }

    /// Reject values the analyzer cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.engine.skill_level > MAX_SKILL_LEVEL {
            return Err(ConfigError::InvalidValue {
                field: "engine.skill_level",
                message: format!("{} exceeds {}", self.engine.skill_level, MAX_SKILL_LEVEL),
            });
        }
        if self.init_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "init_attempts",
                message: "at least one attempt is required".to_string(),
            });
        }
        if self.init_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "init_timeout_secs",
                message: "timeout must be positive".to_string(),
            });
        }
        if self.engine_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "engine_path",
                message: "path is empty".to_string(),
            });
        }
        Ok(())
    }

    /// Session timings derived from these settings
    pub fn session_timings(&self) -> SessionTimings {
        SessionTimings {
            init_timeout: Duration::from_secs(self.init_timeout_secs),
            ..SessionTimings::default()
        }
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Load settings from `path`, falling back to defaults on any problem
///
/// Problems are logged at `warn`; a missing file only at `info`, since that
/// is the normal first-run case.
pub fn load_or_default(path: &Path) -> AnalyzerSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return AnalyzerSettings::default();
    }

    match AnalyzerSettings::load_from(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            AnalyzerSettings::default()
        }
    }
}
