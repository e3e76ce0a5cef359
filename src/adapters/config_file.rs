//! JSON file configuration store.
//!
//! Implements [`ConfigPort`] over a single JSON file. A missing file means
//! defaults; a present file is parsed, then the `BACKEND_URL` and
//! `LOG_LEVEL` environment overrides are applied, then the result is
//! validated. `save` validates first and writes pretty JSON.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

use super::http::Endpoint;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DESPERTADOR_CONFIG";
/// Used when neither `--config` nor [`CONFIG_ENV`] is given.
pub const DEFAULT_CONFIG_PATH: &str = "despertador.json";

pub struct FileConfigStore {
    path: PathBuf,
    apply_env: bool,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            apply_env: true,
        }
    }

    /// `--config` wins over [`CONFIG_ENV`], which wins over the default.
    pub fn resolve(cli_path: Option<PathBuf>) -> Self {
        let path = cli_path
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::new(path)
    }

    /// Skip the environment overrides (tests, `init-config`).
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Apply `BACKEND_URL` / `LOG_LEVEL` from `lookup`.
pub fn apply_env_overrides(cfg: &mut SystemConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("BACKEND_URL") {
        cfg.backend_url = url;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        cfg.log_level = level.to_ascii_lowercase();
    }
}

/// Validate all config fields are within safe operating ranges.
pub fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if Endpoint::parse(&cfg.backend_url).is_none() {
        return Err(ConfigError::ValidationFailed(
            "backend_url must be http://host[:port]",
        ));
    }
    if cfg.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
    }
    if cfg.gesture_poll_interval_ms == 0 || cfg.gesture_poll_interval_ms > 1000 {
        return Err(ConfigError::ValidationFailed(
            "gesture_poll_interval_ms must be 1–1000",
        ));
    }
    if cfg.debounce_ms == 0 {
        return Err(ConfigError::ValidationFailed("debounce_ms must be > 0"));
    }
    if cfg.settle_ms == 0 || cfg.settle_ms >= cfg.debounce_ms {
        return Err(ConfigError::ValidationFailed(
            "settle_ms must be > 0 and < debounce_ms",
        ));
    }
    if cfg.gesture_cooldown_ms == 0 {
        return Err(ConfigError::ValidationFailed("gesture_cooldown_ms must be > 0"));
    }
    if !(cfg.hand_span_ratio > 0.0 && cfg.hand_span_ratio < 1.0) {
        return Err(ConfigError::ValidationFailed(
            "hand_span_ratio must be in (0, 1)",
        ));
    }
    let timeouts = [
        (cfg.status_timeout_ms, "status_timeout_ms must be 500–10000"),
        (
            cfg.button_notify_timeout_ms,
            "button_notify_timeout_ms must be 500–10000",
        ),
        (
            cfg.gesture_notify_timeout_ms,
            "gesture_notify_timeout_ms must be 500–10000",
        ),
        (cfg.shutdown_timeout_ms, "shutdown_timeout_ms must be 500–10000"),
    ];
    for (value, msg) in timeouts {
        if !(500..=10_000).contains(&value) {
            return Err(ConfigError::ValidationFailed(msg));
        }
    }
    if cfg.edge_sample_ms == 0 || cfg.edge_sample_ms >= cfg.settle_ms {
        return Err(ConfigError::ValidationFailed(
            "edge_sample_ms must be > 0 and < settle_ms",
        ));
    }
    if cfg.light_gpio == cfg.button_gpio {
        return Err(ConfigError::ValidationFailed(
            "light_gpio and button_gpio must differ",
        ));
    }
    if cfg.log_level.parse::<log::LevelFilter>().is_err() {
        return Err(ConfigError::ValidationFailed(
            "log_level must be off, error, warn, info, debug or trace",
        ));
    }
    Ok(())
}

impl ConfigPort for FileConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut cfg = match std::fs::read(&self.path) {
            Ok(bytes) => {
                let cfg: SystemConfig =
                    serde_json::from_slice(&bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("config loaded from {}", self.path.display());
                cfg
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no config at {}, using defaults", self.path.display());
                SystemConfig::default()
            }
            Err(e) => {
                warn!("config {} unreadable: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        if self.apply_env {
            apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
        }
        validate_config(&cfg)?;
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let mut body = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        body.push(b'\n');
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|_| ConfigError::IoError)?;
        }
        std::fs::write(&self.path, body).map_err(|_| ConfigError::IoError)?;
        info!("config written to {}", self.path.display());
        Ok(())
    }
}
