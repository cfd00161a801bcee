// ── Runtime engine configuration ──
//
// These types describe *what* to talk to and *how often*. They never touch
// disk: the CLI (via valetudo-config) builds a `VacuumConfig` and hands it in.

use std::time::Duration;

use url::Url;
use valetudo_api::TransportConfig;

use crate::error::CoreError;
use crate::model::{FanPreset, Spot};
use crate::store::RefreshPolicy;

/// Fan presets used by the high-speed and mop toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    /// Preset restored when high-speed or mop mode is switched off.
    pub default_speed: FanPreset,
    /// Preset that counts as "high speed".
    pub high_speed: FanPreset,
    /// Expose the mop toggle.
    pub mop_enabled: bool,
}

impl Default for PowerControl {
    fn default() -> Self {
        Self {
            default_speed: FanPreset::Quiet,
            high_speed: FanPreset::Turbo,
            mop_enabled: false,
        }
    }
}

/// Configuration for a single vacuum.
#[derive(Debug, Clone)]
pub struct VacuumConfig {
    /// Display name.
    pub name: String,
    /// Device root URL, e.g. `http://192.168.1.50`.
    pub url: Url,
    /// High-speed / mop support. `None` disables both toggles.
    pub power: Option<PowerControl>,
    /// Named spots for spot cleaning.
    pub spots: Vec<Spot>,
    /// Staleness budgets for the cache and background timer.
    pub policy: RefreshPolicy,
    /// Wait after a state-changing command before re-reading status.
    pub settle_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Keep re-arming the refresh timer after every fetch. Off for one-shot
    /// CLI invocations.
    pub background_refresh: bool,
    /// Accept self-signed certificates (HTTPS reverse proxies).
    pub accept_invalid_certs: bool,
}

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl VacuumConfig {
    /// Build a configuration with default tuning for the given address.
    ///
    /// Accepts a bare host (`192.168.1.50`, `robot.lan:8080`) or a full URL.
    pub fn new(address: &str) -> Result<Self, CoreError> {
        Ok(Self {
            name: "Vacuum".into(),
            url: parse_address(address)?,
            power: None,
            spots: Vec::new(),
            policy: RefreshPolicy::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            timeout: DEFAULT_TIMEOUT,
            background_refresh: true,
            accept_invalid_certs: false,
        })
    }

    /// Transport settings derived from this config.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }

    /// Look up a spot by name, ignoring case.
    pub fn spot(&self, name: &str) -> Option<&Spot> {
        self.spots
            .iter()
            .find(|spot| spot.name.eq_ignore_ascii_case(name))
    }
}

/// Normalize a configured address into a base URL.
pub fn parse_address(address: &str) -> Result<Url, CoreError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Config {
            message: "vacuum address is empty".into(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| CoreError::Config {
        message: format!("invalid vacuum address '{trimmed}': {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::Config {
            message: format!("unsupported scheme '{}' in '{trimmed}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = parse_address("192.168.1.50").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50/");
    }

    #[test]
    fn full_url_is_kept() {
        let url = parse_address("https://proxy.lan/vacuum").unwrap();
        assert_eq!(url.as_str(), "https://proxy.lan/vacuum");
    }

    #[test]
    fn empty_and_bad_addresses_are_rejected() {
        assert!(matches!(parse_address("  "), Err(CoreError::Config { .. })));
        assert!(matches!(
            parse_address("ftp://robot"),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn spot_lookup_ignores_case() {
        let mut config = VacuumConfig::new("robot.lan").unwrap();
        config.spots.push(Spot {
            name: "Kitchen".into(),
            x: 25_500,
            y: 25_500,
        });
        assert!(config.spot("kitchen").is_some());
        assert!(config.spot("hallway").is_none());
    }
}
