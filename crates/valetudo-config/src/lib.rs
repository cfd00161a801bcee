//! Shared configuration for Valetudo tools.
//!
//! TOML profiles layered with `VALETUDO_*` environment overrides, and
//! translation to `valetudo_core::VacuumConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use valetudo_core::{FanPreset, PowerControl, RefreshPolicy, Spot, VacuumConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no address configured for profile '{profile}'")]
    MissingAddress { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named vacuum profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Wait after a command before re-reading status, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Refresh budget while the vacuum is active, in seconds.
    #[serde(default = "default_active_interval")]
    pub active_interval: u64,

    /// Refresh budget while idle or charging, in seconds.
    #[serde(default = "default_idle_interval")]
    pub idle_interval: u64,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            settle_delay_ms: default_settle_delay_ms(),
            active_interval: default_active_interval(),
            idle_interval: default_idle_interval(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_settle_delay_ms() -> u64 {
    3000
}
fn default_active_interval() -> u64 {
    10
}
fn default_idle_interval() -> u64 {
    120
}

/// A named vacuum profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Host, `host:port`, or full URL of the vacuum.
    #[serde(default, alias = "ip", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Fan presets for the high-speed and mop toggles.
    #[serde(
        rename = "power-control",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub power_control: Option<PowerControlSettings>,

    /// Named spots for spot cleaning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spots: Vec<Spot>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

fn default_name() -> String {
    "Vacuum".into()
}

impl Profile {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: Some(address.into()),
            power_control: None,
            spots: Vec::new(),
            timeout: None,
            insecure: None,
        }
    }
}

/// `[profiles.X.power-control]` as written in the file. Preset names are
/// resolved when the profile is turned into a `VacuumConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PowerControlSettings {
    #[serde(default = "default_speed")]
    pub default_speed: String,

    #[serde(default = "high_speed")]
    pub high_speed: String,

    #[serde(default)]
    pub mop_enabled: bool,
}

fn default_speed() -> String {
    "quiet".into()
}
fn high_speed() -> String {
    "turbo".into()
}

impl PowerControlSettings {
    fn resolve(&self) -> Result<PowerControl, ConfigError> {
        Ok(PowerControl {
            default_speed: parse_preset("power-control.default-speed", &self.default_speed)?,
            high_speed: parse_preset("power-control.high-speed", &self.high_speed)?,
            mop_enabled: self.mop_enabled,
        })
    }
}

fn parse_preset(field: &str, value: &str) -> Result<FanPreset, ConfigError> {
    FanPreset::from_str(value).map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!(
            "unknown preset '{value}' (expected quiet, balanced, turbo, max, or mop)"
        ),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "valetudo", "valetudo").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("valetudo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered sources: built-in defaults, then the TOML file, then
/// `VALETUDO_*` environment variables (`__` separates nesting levels, e.g.
/// `VALETUDO_DEFAULTS__TIMEOUT=5`).
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VALETUDO_").split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from an explicit file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to the engine config ────────────────────────────────

/// Build a `VacuumConfig` from a profile and the global defaults.
///
/// Background refresh is left on; one-shot consumers switch it off.
pub fn profile_to_vacuum_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<VacuumConfig, ConfigError> {
    let address = profile
        .address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingAddress {
            profile: profile_name.into(),
        })?;

    let mut config = VacuumConfig::new(address).map_err(|e| ConfigError::Validation {
        field: "address".into(),
        reason: e.to_string(),
    })?;

    if defaults.active_interval == 0 || defaults.idle_interval == 0 {
        return Err(ConfigError::Validation {
            field: "defaults.active_interval / defaults.idle_interval".into(),
            reason: "refresh intervals must be at least one second".into(),
        });
    }

    config.name.clone_from(&profile.name);
    config.power = profile
        .power_control
        .as_ref()
        .map(PowerControlSettings::resolve)
        .transpose()?;
    config.spots.clone_from(&profile.spots);
    config.policy = RefreshPolicy {
        active: Duration::from_secs(defaults.active_interval),
        idle: Duration::from_secs(defaults.idle_interval),
    };
    config.settle_delay = Duration::from_millis(defaults.settle_delay_ms);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.accept_invalid_certs = profile.insecure.unwrap_or(defaults.insecure);

    Ok(config)
}
