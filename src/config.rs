//! Configuration loading and management.
//!
//! Loads rotary configuration from the platform config directory (or
//! `$ROTARY_CONFIG_PATH`, or `--config`). Environment variables override
//! file values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

// ── Top-level config ────────────────────────────────────────────

/// Top-level rotary configuration loaded from TOML.
///
/// Every key has a working default, so a missing config file is not an
/// error: a fresh install runs entirely on defaults under the profile
/// directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RotaryConfig {
    /// Filesystem paths for the platform stores and rotary's own state.
    pub paths: PathsConfig,
    /// Call hand-off settings.
    pub dialer: DialerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Terminal UI settings.
    pub ui: UiConfig,
}

impl RotaryConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// The file is `override_path` when given (the CLI `--config` flag),
    /// otherwise the resolved [`RotaryConfig::config_path`]. A missing file
    /// yields defaults.
    pub fn load_with_path(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path(),
        };
        let mut config = Self::load_from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from the TOML file only, no env overrides.
    fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: RotaryConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(RotaryConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve the config file path.
    ///
    /// `$ROTARY_CONFIG_PATH` wins, then `config.toml` under the platform
    /// config directory, then `./config.toml`.
    pub fn config_path() -> PathBuf {
        Self::config_path_with(|key| std::env::var(key).ok())
    }

    /// Resolve the config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("ROTARY_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        match directories::ProjectDirs::from("", "", "rotary") {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => PathBuf::from("config.toml"),
        }
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var`
    /// in tests).
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        // Paths.
        if let Some(v) = env("ROTARY_CALL_LOG_DB") {
            self.paths.call_log_db = v;
        }
        if let Some(v) = env("ROTARY_CONTACTS_DB") {
            self.paths.contacts_db = v;
        }
        if let Some(v) = env("ROTARY_GRANT_LEDGER") {
            self.paths.grant_ledger = v;
        }
        if let Some(v) = env("ROTARY_LOG_DIR") {
            self.paths.log_dir = v;
        }

        // Dialer. The handler is a whitespace-separated command line.
        if let Some(v) = env("ROTARY_DIAL_HANDLER") {
            let argv: Vec<String> = v.split_whitespace().map(str::to_owned).collect();
            if argv.is_empty() {
                tracing::warn!(
                    var = "ROTARY_DIAL_HANDLER",
                    "ignoring empty env override"
                );
            } else {
                self.dialer.handler = argv;
            }
        }

        // Logging.
        if let Some(v) = env("ROTARY_LOG_LEVEL") {
            self.logging.level = v;
        }

        // UI.
        if let Some(v) = env("ROTARY_TICK_MS") {
            match v.parse() {
                Ok(n) => self.ui.tick_ms = n,
                Err(_) => tracing::warn!(
                    var = "ROTARY_TICK_MS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }

    /// Parse a TOML string into config (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: RotaryConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

/// Profile directory for rotary state: the platform data dir, or `.rotary`
/// under the working directory when the platform dirs cannot be resolved.
pub fn default_profile_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "rotary")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".rotary"))
}

// ── Paths config ────────────────────────────────────────────────

/// Filesystem paths for the platform stores and rotary's own state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Call-log store (SQLite, owned by the telephony stack).
    pub call_log_db: String,
    /// Contacts store (SQLite, owned by the address book).
    pub contacts_db: String,
    /// Permission grant ledger (TOML, owned by rotary's platform layer).
    pub grant_ledger: String,
    /// Directory for rotary's own JSON log files.
    pub log_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let base = default_profile_dir();
        Self {
            call_log_db: base.join("calllog.db").display().to_string(),
            contacts_db: base.join("contacts.db").display().to_string(),
            grant_ledger: base.join("grants.toml").display().to_string(),
            log_dir: base.join("logs").display().to_string(),
        }
    }
}

// ── Dialer config ───────────────────────────────────────────────

/// Call hand-off settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialerConfig {
    /// Handler command line; the `tel:` URI is appended as the final
    /// argument at dispatch time.
    pub handler: Vec<String>,
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            handler: vec!["xdg-open".to_string()],
        }
    }
}

// ── Logging config ──────────────────────────────────────────────

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing log level filter (overridden by `RUST_LOG` when set).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ── UI config ───────────────────────────────────────────────────

/// Terminal UI settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event poll interval for the UI loop, in milliseconds.
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

// ── Tests ───────────────────────────────────────────────────────
