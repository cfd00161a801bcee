#![allow(clippy::unwrap_used)]
// Loading, validation, and translation of TOML profiles.

use std::io::Write;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use valetudo_config::{
    Config, ConfigError, Defaults, PowerControlSettings, Profile, load_config_from,
    profile_to_vacuum_config, save_config_to,
};
use valetudo_core::{FanPreset, PowerControl, Spot};

const FULL: &str = r#"
default_profile = "downstairs"

[defaults]
timeout = 5
settle_delay_ms = 1500
active_interval = 15
idle_interval = 300

[profiles.downstairs]
name = "Rocky"
ip = "192.168.1.50"

[profiles.downstairs.power-control]
default-speed = "balanced"
high-speed = "max"
mop-enabled = true

[[profiles.downstairs.spots]]
name = "Kitchen"
x = 25500
y = 25500

[profiles.upstairs]
address = "https://proxy.lan/vacuum"
timeout = 20
insecure = true
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn full_file_translates_to_vacuum_config() {
    let file = write_config(FULL);
    let config = load_config_from(file.path()).unwrap();

    let (name, profile) = config.profile(None).unwrap();
    assert_eq!(name, "downstairs");

    let vacuum = profile_to_vacuum_config(profile, name, &config.defaults).unwrap();
    assert_eq!(vacuum.name, "Rocky");
    assert_eq!(vacuum.url.as_str(), "http://192.168.1.50/");
    assert_eq!(
        vacuum.power,
        Some(PowerControl {
            default_speed: FanPreset::Balanced,
            high_speed: FanPreset::Max,
            mop_enabled: true,
        })
    );
    assert_eq!(
        vacuum.spots,
        vec![Spot {
            name: "Kitchen".into(),
            x: 25_500,
            y: 25_500,
        }]
    );
    assert_eq!(vacuum.timeout, Duration::from_secs(5));
    assert_eq!(vacuum.settle_delay, Duration::from_millis(1500));
    assert_eq!(vacuum.policy.active, Duration::from_secs(15));
    assert_eq!(vacuum.policy.idle, Duration::from_secs(300));
    assert!(vacuum.background_refresh);
}

#[test]
fn profile_overrides_win_over_defaults() {
    let file = write_config(FULL);
    let config = load_config_from(file.path()).unwrap();

    let (name, profile) = config.profile(Some("upstairs")).unwrap();
    let vacuum = profile_to_vacuum_config(profile, name, &config.defaults).unwrap();

    assert_eq!(vacuum.name, "Vacuum");
    assert_eq!(vacuum.timeout, Duration::from_secs(20));
    assert!(vacuum.accept_invalid_certs);
    assert!(vacuum.power.is_none());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults, Defaults::default());
    assert!(config.profiles.is_empty());
}

#[test]
fn unknown_profile_is_reported() {
    let config = Config::default();
    let err = config.profile(Some("garage")).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "garage"));
}

#[test]
fn missing_address_is_rejected() {
    let profile = Profile {
        address: None,
        ..Profile::new("Vacuum", "")
    };
    let err = profile_to_vacuum_config(&profile, "default", &Defaults::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingAddress { ref profile } if profile == "default"));

    let blank = Profile::new("Vacuum", "   ");
    let err = profile_to_vacuum_config(&blank, "default", &Defaults::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingAddress { .. }));
}

#[test]
fn unknown_preset_is_rejected() {
    let mut profile = Profile::new("Vacuum", "robot.lan");
    profile.power_control = Some(PowerControlSettings {
        default_speed: "quiet".into(),
        high_speed: "hurricane".into(),
        mop_enabled: false,
    });

    let err = profile_to_vacuum_config(&profile, "default", &Defaults::default()).unwrap_err();
    match err {
        ConfigError::Validation { field, reason } => {
            assert_eq!(field, "power-control.high-speed");
            assert!(reason.contains("hurricane"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn power_control_fields_default_sensibly() {
    let file = write_config(
        r#"
[profiles.default]
address = "robot.lan"
[profiles.default.power-control]
mop-enabled = true
"#,
    );
    let config = load_config_from(file.path()).unwrap();
    let (name, profile) = config.profile(None).unwrap();
    let vacuum = profile_to_vacuum_config(profile, name, &config.defaults).unwrap();

    assert_eq!(
        vacuum.power,
        Some(PowerControl {
            default_speed: FanPreset::Quiet,
            high_speed: FanPreset::Turbo,
            mop_enabled: true,
        })
    );
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    let mut profile = Profile::new("Rocky", "192.168.1.50");
    profile.spots.push(Spot {
        name: "Hallway".into(),
        x: 27_000,
        y: 24_000,
    });
    config.profiles.insert("default".into(), profile);

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded, config);
}
