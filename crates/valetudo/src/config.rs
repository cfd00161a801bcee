//! Flag-aware profile resolution on top of `valetudo-config`.
//!
//! Global flags win over the profile, which wins over `[defaults]`.

use valetudo_config::{Config, Profile, profile_to_vacuum_config};
use valetudo_core::VacuumConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use valetudo_config::{config_path, load_config, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the engine config for this invocation.
///
/// Without a matching profile, `--address` alone is enough. One-shot
/// commands pass `background = false` so the process can exit as soon as
/// the command returns.
pub fn build_vacuum_config(global: &GlobalOpts, background: bool) -> Result<VacuumConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), global.address.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(address)) => Profile::new("Vacuum", address),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global);

    let mut vacuum = profile_to_vacuum_config(&profile, &profile_name, &cfg.defaults)?;
    vacuum.background_refresh = background;
    Ok(vacuum)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(address) = &global.address {
        profile.address = Some(address.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
}

/// Comma-separated, sorted profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
